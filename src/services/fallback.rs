use serde_json::{json, Value};

/// Expected response shape of a metadata endpoint
///
/// Callers attach the shape they expect so that a failed request can be answered
/// with a placeholder the rendering side already knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Season,
    Credits,
    Videos,
    MovieDetail,
    ShowDetail,
    List,
}

impl ResponseShape {
    /// Infers the shape from the endpoint path; the first matching rule wins
    pub fn classify(endpoint: &str) -> Self {
        let is_related_list =
            endpoint.contains("/similar") || endpoint.contains("/recommendations");

        if endpoint.contains("season") {
            ResponseShape::Season
        } else if endpoint.contains("credits") {
            ResponseShape::Credits
        } else if endpoint.contains("videos") {
            ResponseShape::Videos
        } else if endpoint.contains("movie/") && !is_related_list {
            ResponseShape::MovieDetail
        } else if endpoint.contains("tv/") && !is_related_list {
            ResponseShape::ShowDetail
        } else {
            ResponseShape::List
        }
    }

    /// Placeholder object substituted when no real data is available
    pub fn placeholder(self) -> Value {
        match self {
            ResponseShape::Season => json!({ "episodes": [] }),
            ResponseShape::Credits => json!({ "cast": [], "crew": [] }),
            ResponseShape::Videos | ResponseShape::List => json!({ "results": [] }),
            ResponseShape::MovieDetail => json!({
                "title": "Movie information unavailable",
                "overview": "Could not load movie details at this time.",
                "genres": [],
                "release_date": "",
                "poster_path": "",
                "backdrop_path": "",
            }),
            ResponseShape::ShowDetail => json!({
                "name": "Show information unavailable",
                "overview": "Could not load show details at this time.",
                "genres": [],
                "seasons": [],
                "first_air_date": "",
                "poster_path": "",
                "backdrop_path": "",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_endpoints_win_over_everything() {
        for endpoint in [
            "tv/1399/season/1",
            "tv/1399/season/2/credits",
            "tv/1399/season/3/videos",
        ] {
            assert_eq!(ResponseShape::classify(endpoint), ResponseShape::Season);
            assert_eq!(
                ResponseShape::classify(endpoint).placeholder(),
                json!({ "episodes": [] })
            );
        }
    }

    #[test]
    fn test_credits_and_videos() {
        assert_eq!(ResponseShape::classify("movie/550/credits"), ResponseShape::Credits);
        assert_eq!(
            ResponseShape::Credits.placeholder(),
            json!({ "cast": [], "crew": [] })
        );
        assert_eq!(ResponseShape::classify("tv/1399/videos"), ResponseShape::Videos);
        assert_eq!(ResponseShape::Videos.placeholder(), json!({ "results": [] }));
    }

    #[test]
    fn test_movie_detail_never_yields_show_placeholder() {
        let shape = ResponseShape::classify("movie/550");
        assert_eq!(shape, ResponseShape::MovieDetail);

        let placeholder = shape.placeholder();
        assert_eq!(placeholder["title"], "Movie information unavailable");
        assert!(placeholder.get("name").is_none());
        assert!(placeholder.get("seasons").is_none());
        assert_eq!(placeholder["genres"], json!([]));
        assert_eq!(placeholder["poster_path"], "");
    }

    #[test]
    fn test_show_detail_never_yields_movie_placeholder() {
        let shape = ResponseShape::classify("tv/1399");
        assert_eq!(shape, ResponseShape::ShowDetail);

        let placeholder = shape.placeholder();
        assert_eq!(placeholder["name"], "Show information unavailable");
        assert!(placeholder.get("title").is_none());
        assert_eq!(placeholder["seasons"], json!([]));
    }

    #[test]
    fn test_related_lists_fall_through_to_list() {
        assert_eq!(ResponseShape::classify("movie/550/similar"), ResponseShape::List);
        assert_eq!(
            ResponseShape::classify("tv/1399/recommendations"),
            ResponseShape::List
        );
    }

    #[test]
    fn test_generic_endpoints_are_lists() {
        assert_eq!(ResponseShape::classify("trending/all/day"), ResponseShape::List);
        assert_eq!(ResponseShape::classify("search/multi"), ResponseShape::List);
        assert_eq!(ResponseShape::List.placeholder(), json!({ "results": [] }));
    }
}
