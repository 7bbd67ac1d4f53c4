use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{GridPage, MovieDetail, MovieTab, SearchPage, ShowDetail, ShowTab, TimeWindow},
    routes::AppState,
    services::catalog,
};

/// The trending grid never offers more pages than this
const MAX_TRENDING_PAGES: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    tab: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    time: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShowQuery {
    season: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Lenient numeric query parameter: missing, malformed or zero means 1
fn page_or_first(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1)
}

/// Handler for the movie grid
pub async fn movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GridQuery>,
) -> AppResult<Json<GridPage>> {
    let tab_name = params.tab.as_deref().unwrap_or("popular");
    let tab = MovieTab::parse(tab_name)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid tab: {}", tab_name)))?;

    let page = page_or_first(params.page.as_deref());
    Ok(Json(catalog::fetch_grid_page(&state.catalog, tab.endpoint(), page).await))
}

/// Handler for the show grid
pub async fn shows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GridQuery>,
) -> AppResult<Json<GridPage>> {
    let tab_name = params.tab.as_deref().unwrap_or("popular");
    let tab = ShowTab::parse(tab_name)
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid tab: {}", tab_name)))?;

    let page = page_or_first(params.page.as_deref());
    Ok(Json(catalog::fetch_grid_page(&state.catalog, tab.endpoint(), page).await))
}

/// Handler for the trending grid
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> Json<GridPage> {
    let window = TimeWindow::parse(params.time.as_deref());
    let page = page_or_first(params.page.as_deref());

    let mut grid = catalog::fetch_grid_page(&state.catalog, window.endpoint(), page).await;
    grid.total_pages = grid.total_pages.min(MAX_TRENDING_PAGES);
    Json(grid)
}

/// Handler for the movie detail page
pub async fn movie_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Json<MovieDetail> {
    Json(catalog::fetch_movie_detail(&state.catalog, id).await)
}

/// Handler for the show detail page, defaulting to the first season
pub async fn show_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Query(params): Query<ShowQuery>,
) -> Json<ShowDetail> {
    let season = page_or_first(params.season.as_deref());
    Json(catalog::fetch_show_detail(&state.catalog, id, season).await)
}

/// Handler for the full search results page
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<SearchPage> {
    Json(catalog::search(&state.catalog, &params.q).await)
}
