use serde::Serialize;
use serde_json::Value;

use super::SearchResult;

/// Listing tab of the movie grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieTab {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieTab {
    pub fn parse(tab: &str) -> Option<Self> {
        match tab {
            "popular" => Some(MovieTab::Popular),
            "top-rated" => Some(MovieTab::TopRated),
            "now-playing" => Some(MovieTab::NowPlaying),
            "upcoming" => Some(MovieTab::Upcoming),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            MovieTab::Popular => "movie/popular",
            MovieTab::TopRated => "movie/top_rated",
            MovieTab::NowPlaying => "movie/now_playing",
            MovieTab::Upcoming => "movie/upcoming",
        }
    }
}

/// Listing tab of the show grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTab {
    Popular,
    TopRated,
    AiringToday,
    OnTheAir,
}

impl ShowTab {
    pub fn parse(tab: &str) -> Option<Self> {
        match tab {
            "popular" => Some(ShowTab::Popular),
            "top-rated" => Some(ShowTab::TopRated),
            "airing-today" => Some(ShowTab::AiringToday),
            "on-the-air" => Some(ShowTab::OnTheAir),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ShowTab::Popular => "tv/popular",
            ShowTab::TopRated => "tv/top_rated",
            ShowTab::AiringToday => "tv/airing_today",
            ShowTab::OnTheAir => "tv/on_the_air",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    /// Anything other than `week` means `day`
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("week") => TimeWindow::Week,
            _ => TimeWindow::Day,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            TimeWindow::Day => "trending/all/day",
            TimeWindow::Week => "trending/all/week",
        }
    }
}

/// One logical grid page assembled from two upstream pages
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridPage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDetail {
    pub movie: Value,
    pub credits: Value,
    pub videos: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShowDetail {
    pub show: Value,
    pub credits: Value,
    pub videos: Value,
    pub season: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchPage {
    pub query: String,
    pub results: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_tab_endpoints() {
        assert_eq!(MovieTab::parse("top-rated").map(|t| t.endpoint()), Some("movie/top_rated"));
        assert_eq!(MovieTab::parse("now-playing").map(|t| t.endpoint()), Some("movie/now_playing"));
        assert_eq!(MovieTab::parse("trending"), None);
    }

    #[test]
    fn test_show_tab_endpoints() {
        assert_eq!(ShowTab::parse("airing-today").map(|t| t.endpoint()), Some("tv/airing_today"));
        assert_eq!(ShowTab::parse("on-the-air").map(|t| t.endpoint()), Some("tv/on_the_air"));
        assert_eq!(ShowTab::parse("upcoming"), None);
    }

    #[test]
    fn test_time_window_defaults_to_day() {
        assert_eq!(TimeWindow::parse(None), TimeWindow::Day);
        assert_eq!(TimeWindow::parse(Some("month")), TimeWindow::Day);
        assert_eq!(TimeWindow::parse(Some("week")).endpoint(), "trending/all/week");
    }
}
