pub mod cache;
pub mod profiles;

pub use cache::{CacheKey, TtlCache};
pub use profiles::{InMemoryProfileStore, PostgrestProfileStore, ProfileStore};
