use crate::{
    models::{GridPage, MovieDetail, SearchPage, SearchResult, ShowDetail},
    services::{fallback::ResponseShape, tmdb::TmdbClient},
};

/// Upstream pages folded into one logical grid page
const UPSTREAM_PAGES_PER_PAGE: u32 = 2;

/// The upstream serves at most 500 pages of any listing
pub const MAX_GRID_PAGE: u32 = 250;

/// Fetches logical grid page `page` of a listing endpoint
///
/// Upstream pages `2N-1` and `2N` are requested concurrently and concatenated in
/// order. Each call carries its own fallback, so one failing page leaves the other's
/// results intact. `page` is clamped to `1..=MAX_GRID_PAGE`.
pub async fn fetch_grid_page(client: &TmdbClient, endpoint: &str, page: u32) -> GridPage {
    let page = page.clamp(1, MAX_GRID_PAGE);
    let first_page = (page * UPSTREAM_PAGES_PER_PAGE - 1).to_string();
    let second_page = (page * UPSTREAM_PAGES_PER_PAGE).to_string();

    let first_params = [("page", first_page.as_str())];
    let second_params = [("page", second_page.as_str())];

    let (first, second) = tokio::join!(
        client.fetch_as(endpoint, &first_params, ResponseShape::List),
        client.fetch_as(endpoint, &second_params, ResponseShape::List),
    );

    let mut results = Vec::new();
    for body in [&first, &second] {
        if let Some(items) = body.get("results").and_then(|r| r.as_array()) {
            results.extend(items.iter().cloned());
        }
    }

    let upstream_total = first
        .get("total_pages")
        .and_then(|t| t.as_u64())
        .filter(|t| *t > 0)
        .unwrap_or(1);

    GridPage {
        page,
        total_pages: logical_total_pages(upstream_total),
        results,
    }
}

/// `ceil(upstream_total / 2)`
pub fn logical_total_pages(upstream_total: u64) -> u32 {
    let total = upstream_total.div_ceil(UPSTREAM_PAGES_PER_PAGE as u64);
    u32::try_from(total).unwrap_or(u32::MAX)
}

/// Movie, credits and videos for a detail page
pub async fn fetch_movie_detail(client: &TmdbClient, id: u64) -> MovieDetail {
    let movie_endpoint = format!("movie/{}", id);
    let credits_endpoint = format!("movie/{}/credits", id);
    let videos_endpoint = format!("movie/{}/videos", id);

    let (movie, credits, videos) = tokio::join!(
        client.fetch_as::<&str, &str>(&movie_endpoint, &[], ResponseShape::MovieDetail),
        client.fetch_as::<&str, &str>(&credits_endpoint, &[], ResponseShape::Credits),
        client.fetch_as::<&str, &str>(&videos_endpoint, &[], ResponseShape::Videos),
    );

    MovieDetail {
        movie,
        credits,
        videos,
    }
}

/// Show, credits, videos and one season for a detail page
pub async fn fetch_show_detail(client: &TmdbClient, id: u64, season: u32) -> ShowDetail {
    let show_endpoint = format!("tv/{}", id);
    let credits_endpoint = format!("tv/{}/credits", id);
    let videos_endpoint = format!("tv/{}/videos", id);

    let (show, credits, videos, season) = tokio::join!(
        client.fetch_as::<&str, &str>(&show_endpoint, &[], ResponseShape::ShowDetail),
        client.fetch_as::<&str, &str>(&credits_endpoint, &[], ResponseShape::Credits),
        client.fetch_as::<&str, &str>(&videos_endpoint, &[], ResponseShape::Videos),
        fetch_season(client, id, season),
    );

    ShowDetail {
        show,
        credits,
        videos,
        season,
    }
}

pub async fn fetch_season(client: &TmdbClient, show_id: u64, season: u32) -> serde_json::Value {
    let endpoint = format!("tv/{}/season/{}", show_id, season);
    client
        .fetch_as::<&str, &str>(&endpoint, &[], ResponseShape::Season)
        .await
}

/// Full search results page: filtered like the suggestions, but not capped
pub async fn search(client: &TmdbClient, query: &str) -> SearchPage {
    let query = query.trim();
    if query.is_empty() {
        return SearchPage {
            query: String::new(),
            results: Vec::new(),
        };
    }

    let body = client
        .fetch_as("search/multi", &[("query", query)], ResponseShape::List)
        .await;

    let results = body
        .get("results")
        .and_then(|r| r.as_array())
        .map(|items| SearchResult::collect(items, None))
        .unwrap_or_default();

    tracing::info!(query = %query, results = results.len(), "Search completed");

    SearchPage {
        query: query.to_string(),
        results,
    }
}
