pub mod catalog;
pub mod fallback;
pub mod search;
pub mod tmdb;

pub use fallback::ResponseShape;
pub use search::{SearchBackend, SearchSession, SearchState, SearchView};
pub use tmdb::TmdbClient;
