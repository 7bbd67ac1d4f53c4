use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::MediaType,
    routes::AppState,
};

const INVALID_TYPE: &str = "Invalid type. Must be 'movie' or 'tv'";
const DEFAULT_WATCH_REGION: &str = "US";

/// What a `/api/tmdb/{...path}` request resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyRoute {
    Countries,
    Languages,
    Genres(MediaType),
    WatchProviders { media_type: MediaType, region: String },
    Passthrough(String),
}

impl ProxyRoute {
    /// Resolves the path, rejecting an invalid `{type}` segment on reference-data routes
    pub fn parse(path: &str, params: &[(String, String)]) -> AppResult<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let media_type = |raw: &str| {
            MediaType::from_path(raw)
                .ok_or_else(|| AppError::InvalidInput(INVALID_TYPE.to_string()))
        };

        let route = match segments.as_slice() {
            ["configuration", "countries"] => ProxyRoute::Countries,
            ["configuration", "languages"] => ProxyRoute::Languages,
            ["genre", kind, "list"] => ProxyRoute::Genres(media_type(*kind)?),
            ["watch", "providers", kind] => {
                let region = params
                    .iter()
                    .find(|(key, _)| key == "watch_region")
                    .map(|(_, value)| value.clone())
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| DEFAULT_WATCH_REGION.to_string());
                ProxyRoute::WatchProviders {
                    media_type: media_type(*kind)?,
                    region,
                }
            }
            _ => ProxyRoute::Passthrough(segments.join("/")),
        };

        Ok(route)
    }
}

/// Handler for the metadata proxy
///
/// Reference data (countries, languages, genres, watch providers) is served from
/// the long-lived cache; every other path is forwarded verbatim. Upstream failures
/// become a 500 with an error payload.
pub async fn proxy(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<Value>> {
    let params: Vec<(String, String)> = query
        .as_deref()
        .map(|raw| url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let route = ProxyRoute::parse(&path, &params)?;
    tracing::debug!(route = ?route, "Resolved proxy route");

    let body = match route {
        ProxyRoute::Countries => {
            reference(
                &state,
                "configuration/countries",
                &[],
                "Failed to fetch countries",
            )
            .await?
        }
        ProxyRoute::Languages => {
            reference(
                &state,
                "configuration/languages",
                &[],
                "Failed to fetch languages",
            )
            .await?
        }
        ProxyRoute::Genres(media_type) => {
            let endpoint = format!("genre/{}/list", media_type.as_str());
            reference(&state, &endpoint, &[], "Failed to fetch genres").await?
        }
        ProxyRoute::WatchProviders { media_type, region } => {
            let endpoint = format!("watch/providers/{}", media_type.as_str());
            reference(
                &state,
                &endpoint,
                &[("watch_region", region.as_str())],
                "Failed to fetch providers",
            )
            .await?
        }
        ProxyRoute::Passthrough(endpoint) => {
            state.proxy.fetch_raw(&endpoint, &params).await.map_err(|e| {
                tracing::error!(endpoint = %endpoint, error = %e, "Error in metadata proxy");
                AppError::upstream_with_reason("Failed to fetch data", &e)
            })?
        }
    };

    Ok(Json(body))
}

async fn reference(
    state: &AppState,
    endpoint: &str,
    params: &[(&str, &str)],
    label: &'static str,
) -> AppResult<Value> {
    state.reference.fetch_raw(endpoint, params).await.map_err(|e| {
        tracing::error!(endpoint = %endpoint, error = %e, "{}", label);
        AppError::upstream(label)
    })
}
