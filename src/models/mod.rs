pub mod catalog;
pub mod profile;
pub mod title;

pub use catalog::{GridPage, MovieDetail, MovieTab, SearchPage, ShowDetail, ShowTab, TimeWindow};
pub use profile::{Profile, ProfileRequest, ProfileResponse};
pub use title::{MediaType, MultiSearchItem, SearchResult};
