//! Metadata API client
//!
//! Every call goes through an injected [`TtlCache`]. Identical requests that are
//! in flight at the same time share one upstream call. Each upstream call runs as
//! its own task, so callers that give up do not strand the shared request. The
//! timeout wraps the whole request future, so a timed-out call is cancelled rather
//! than left to write the cache later.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client as HttpClient, Url};
use serde_json::Value;

use crate::{
    db::{CacheKey, TtlCache},
    error::FetchError,
    services::fallback::ResponseShape,
};

type InFlight = Shared<BoxFuture<'static, Result<Value, FetchError>>>;

const API_KEY_PARAM: &str = "api_key";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    timeout: Duration,
    cache: Arc<TtlCache>,
    in_flight: Arc<DashMap<CacheKey, InFlight>>,
}

impl TmdbClient {
    pub fn new(
        api_url: String,
        api_key: String,
        user_agent: &str,
        timeout: Duration,
        cache: Arc<TtlCache>,
    ) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(agent) = HeaderValue::from_str(user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                HttpClient::new()
            });

        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
            cache,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    /// Fetches an endpoint, surfacing failures to the caller
    ///
    /// Checks the cache first; on a miss joins or starts the in-flight request for
    /// the same key. Successful bodies are written to the cache.
    pub async fn fetch_raw<K, V>(
        &self,
        endpoint: &str,
        params: &[(K, V)],
    ) -> Result<Value, FetchError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = forwarded_params(params);
        let key = CacheKey::request(endpoint, &params);

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(hit);
        }

        let flight = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(existing) => {
                tracing::debug!(key = %key, "Joining in-flight request");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                tracing::debug!(key = %key, "Cache miss");
                let url = self.request_url(endpoint, &params)?;
                let task = tokio::spawn(Self::request(
                    self.http_client.clone(),
                    url,
                    self.timeout,
                    key.clone(),
                    self.cache.clone(),
                    self.in_flight.clone(),
                ));
                let flight = async move {
                    task.await.unwrap_or_else(|e| {
                        Err(FetchError::Transport(format!("request task failed: {}", e)))
                    })
                }
                .boxed()
                .shared();
                slot.insert(flight.clone());
                flight
            }
        };

        flight.await
    }

    /// Fetches an endpoint, never failing
    ///
    /// On error the last cached payload for the key is returned even if expired;
    /// without one, the placeholder for `shape`.
    pub async fn fetch_as<K, V>(
        &self,
        endpoint: &str,
        params: &[(K, V)],
        shape: ResponseShape,
    ) -> Value
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        match self.fetch_raw(endpoint, params).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(endpoint = %endpoint, error = %e, "Error fetching metadata");

                let key = CacheKey::request(endpoint, &forwarded_params(params));
                if let Some(stale) = self.cache.get_stale(&key) {
                    tracing::warn!(key = %key, "Serving stale cache entry");
                    return stale;
                }

                tracing::warn!(
                    endpoint = %endpoint,
                    shape = ?shape,
                    "Serving placeholder response"
                );
                shape.placeholder()
            }
        }
    }

    /// Like [`TmdbClient::fetch_as`], with the shape inferred from the endpoint path
    pub async fn fetch<K, V>(&self, endpoint: &str, params: &[(K, V)]) -> Value
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.fetch_as(endpoint, params, ResponseShape::classify(endpoint))
            .await
    }

    /// Raw multi-search results (movies, shows and people) for the first page
    pub async fn search_multi(&self, query: &str) -> Result<Vec<Value>, FetchError> {
        let body = self
            .fetch_raw("search/multi", &[("query", query), ("page", "1")])
            .await?;

        match body.get("results") {
            Some(Value::Array(results)) => Ok(results.clone()),
            _ => Err(FetchError::Decode("missing results array".to_string())),
        }
    }

    fn request_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
        let raw = format!("{}/{}", self.api_url, endpoint.trim_matches('/'));
        let mut url =
            Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair(API_KEY_PARAM, &self.api_key);
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn request(
        http_client: HttpClient,
        url: Url,
        timeout: Duration,
        key: CacheKey,
        cache: Arc<TtlCache>,
        in_flight: Arc<DashMap<CacheKey, InFlight>>,
    ) -> Result<Value, FetchError> {
        let call = async {
            let response = http_client.get(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body: Value = response.json().await?;
            Ok(body)
        };

        let outcome = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        if let Ok(body) = &outcome {
            cache.set(key.clone(), body.clone());
        }
        in_flight.remove(&key);

        outcome
    }
}

/// Caller parameters minus any attempt to override the server-held API key
fn forwarded_params<K, V>(params: &[(K, V)]) -> Vec<(&str, &str)>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .filter(|(k, _)| *k != API_KEY_PARAM)
        .collect()
}
