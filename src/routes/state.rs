use std::sync::Arc;

use crate::{
    config::Config,
    db::{InMemoryProfileStore, PostgrestProfileStore, ProfileStore, TtlCache},
    services::TmdbClient,
};

/// Shared application state
///
/// Each metadata client owns its own cache instance: the public proxy, the
/// reference-data endpoints (long TTL) and the catalog helper never share entries.
pub struct AppState {
    pub proxy: TmdbClient,
    pub reference: TmdbClient,
    pub catalog: TmdbClient,
    pub profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    /// Builds the state from configuration, choosing the profile store by available credentials
    pub fn from_config(config: &Config) -> Self {
        let profiles: Arc<dyn ProfileStore> = match config.backend_credentials() {
            Some((url, key)) => Arc::new(PostgrestProfileStore::new(url, key.to_string())),
            None => {
                tracing::warn!("Backend credentials missing, profiles are kept in memory");
                Arc::new(InMemoryProfileStore::new())
            }
        };

        Self::with_profile_store(config, profiles)
    }

    pub fn with_profile_store(config: &Config, profiles: Arc<dyn ProfileStore>) -> Self {
        let client = |ttl| {
            TmdbClient::new(
                config.tmdb_api_url.clone(),
                config.tmdb_api_key.clone(),
                &config.tmdb_user_agent,
                config.upstream_timeout(),
                Arc::new(TtlCache::new(ttl, config.cache_capacity)),
            )
        };

        tracing::info!(
            api_url = %config.tmdb_api_url,
            cache_ttl_secs = config.cache_ttl_secs,
            reference_cache_ttl_secs = config.reference_cache_ttl_secs,
            profile_store = profiles.name(),
            "Application state initialized"
        );

        Self {
            proxy: client(config.cache_ttl()),
            reference: client(config.reference_cache_ttl()),
            catalog: client(config.cache_ttl()),
            profiles,
        }
    }
}
