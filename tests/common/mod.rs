#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};

use catalog_api::{
    config::Config,
    db::{InMemoryProfileStore, TtlCache},
    routes::AppState,
    services::TmdbClient,
};

pub const API_KEY: &str = "test-key";

/// Stand-in for the metadata API, counting calls per path
#[derive(Clone, Default)]
pub struct FakeUpstream {
    calls: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeUpstream {
    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Starts the fake on an ephemeral port and returns its `/3` base URL
    pub async fn start(&self) -> String {
        let app = Router::new()
            .fallback(respond)
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/3", addr)
    }
}

async fn respond(
    State(fake): State<FakeUpstream>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().trim_start_matches("/3/").to_string();
    let call_number = {
        let mut calls = fake.calls.lock().unwrap();
        let count = calls.entry(path.clone()).or_insert(0);
        *count += 1;
        *count
    };

    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        let body = json!({ "status_message": "Invalid API key" });
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }

    let page: u64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);

    let body = match path.as_str() {
        "movie/550" => json!({ "id": 550, "title": "Fight Club", "genres": [{ "id": 18, "name": "Drama" }] }),
        "movie/550/credits" => json!({ "id": 550, "cast": [{ "name": "Edward Norton" }], "crew": [] }),
        "movie/550/videos" => json!({ "id": 550, "results": [{ "key": "qtRKdVHc-cE" }] }),
        "movie/popular" | "trending/all/day" => json!({
            "page": page,
            "results": [{ "id": page * 100 + 1 }, { "id": page * 100 + 2 }],
            "total_pages": 45,
        }),
        "tv/1399" => json!({ "id": 1399, "name": "Game of Thrones", "seasons": [] }),
        "tv/1399/season/2" => json!({ "season_number": 2, "episodes": [{ "episode_number": 1 }] }),
        "genre/movie/list" => json!({ "genres": [{ "id": 28, "name": "Action" }] }),
        "configuration/countries" => json!([{ "iso_3166_1": "US", "english_name": "United States of America" }]),
        "watch/providers/tv" => json!({ "region": params.get("watch_region").cloned().unwrap_or_default(), "results": [] }),
        "search/multi" => json!({
            "page": 1,
            "results": [
                { "id": 603, "media_type": "movie", "title": "The Matrix", "poster_path": "/m.jpg", "release_date": "1999-03-31", "vote_average": 8.2 },
                { "id": 6384, "media_type": "person", "name": "Keanu Reeves", "profile_path": "/k.jpg" },
                { "id": 1, "media_type": "tv", "name": "No Art" },
            ],
        }),
        "movie/flaky" if call_number == 1 => json!({ "id": 3, "title": "First Answer" }),
        "movie/slow" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            json!({ "id": 1, "title": "Slow" })
        }
        "movie/stuck" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            json!({ "id": 2, "title": "Too Late" })
        }
        _ => {
            let body = json!({ "status_message": "Unavailable" });
            return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
        }
    };

    Json::<Value>(body).into_response()
}

pub fn config_for(api_url: &str) -> Config {
    let mut config = Config::for_upstream(api_url, API_KEY);
    config.upstream_timeout_ms = 500;
    config
}

pub fn app_state(api_url: &str) -> Arc<AppState> {
    Arc::new(AppState::with_profile_store(
        &config_for(api_url),
        Arc::new(InMemoryProfileStore::new()),
    ))
}

pub fn client(api_url: &str, timeout: Duration) -> TmdbClient {
    TmdbClient::new(
        api_url.to_string(),
        API_KEY.to_string(),
        "catalog-api-test",
        timeout,
        Arc::new(TtlCache::new(Duration::from_secs(300), 100)),
    )
}
