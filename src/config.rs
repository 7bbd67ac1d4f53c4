use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Metadata API key, injected server-side into every upstream call
    pub tmdb_api_key: String,

    /// Metadata API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// User-Agent sent to the metadata API
    #[serde(default = "default_user_agent")]
    pub tmdb_user_agent: String,

    /// Backend-as-a-service project URL (PostgREST lives under `/rest/v1`)
    #[serde(default)]
    pub supabase_url: Option<String>,

    /// Privileged backend key, used only by the profile endpoint
    #[serde(default)]
    pub supabase_service_role_key: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// TTL of the proxy and fetch-helper caches, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// TTL of the reference-data cache (countries, languages, genres, providers)
    #[serde(default = "default_reference_cache_ttl_secs")]
    pub reference_cache_ttl_secs: u64,

    /// Maximum number of entries held by each cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Upstream request timeout in milliseconds
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,

    /// Debounce window of the incremental search client in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Comma-separated CORS origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_user_agent() -> String {
    concat!("catalog-api/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_reference_cache_ttl_secs() -> u64 {
    86_400
}

fn default_cache_capacity() -> usize {
    1000
}

fn default_upstream_timeout_ms() -> u64 {
    8000
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Configuration pointing at the given upstream, with defaults everywhere else
    pub fn for_upstream(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            tmdb_api_key: api_key.into(),
            tmdb_api_url: api_url.into(),
            tmdb_user_agent: default_user_agent(),
            supabase_url: None,
            supabase_service_role_key: None,
            host: default_host(),
            port: default_port(),
            cache_ttl_secs: default_cache_ttl_secs(),
            reference_cache_ttl_secs: default_reference_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            search_debounce_ms: default_search_debounce_ms(),
            allowed_origins: Vec::new(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn reference_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.reference_cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Backend credentials, when both the project URL and privileged key are set
    pub fn backend_credentials(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_service_role_key) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => {
                Some((url.as_str(), key.as_str()))
            }
            _ => None,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
