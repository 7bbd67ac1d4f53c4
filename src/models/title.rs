use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Parses the `{type}` path parameter of the reference-data endpoints
    pub fn from_path(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

/// Raw multi-search item as returned by the metadata API
#[derive(Debug, Clone, Deserialize)]
pub struct MultiSearchItem {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// A movie or show suggested by search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    pub media_type: MediaType,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
}

impl SearchResult {
    /// Converts a raw search item, keeping only movies and shows that carry an image
    pub fn from_search_item(item: &Value) -> Option<Self> {
        let item: MultiSearchItem = serde_json::from_value(item.clone()).ok()?;

        let media_type = item.media_type.as_deref().and_then(MediaType::from_path)?;

        let poster_path = item.poster_path.filter(|p| !p.is_empty());
        let backdrop_path = item.backdrop_path.filter(|p| !p.is_empty());
        if poster_path.is_none() && backdrop_path.is_none() {
            return None;
        }

        Some(SearchResult {
            id: item.id,
            title: item.title.or(item.name).unwrap_or_default(),
            media_type,
            poster_path,
            backdrop_path,
            release_date: item
                .release_date
                .or(item.first_air_date)
                .filter(|d| !d.is_empty()),
            vote_average: item.vote_average.unwrap_or_default(),
        })
    }

    /// Filters raw search items down to displayable results, at most `limit` when given
    pub fn collect(items: &[Value], limit: Option<usize>) -> Vec<Self> {
        let results = items.iter().filter_map(Self::from_search_item);
        match limit {
            Some(limit) => results.take(limit).collect(),
            None => results.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_type_from_path() {
        assert_eq!(MediaType::from_path("movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::from_path("tv"), Some(MediaType::Tv));
        assert_eq!(MediaType::from_path("radio"), None);
    }

    #[test]
    fn test_movie_item_conversion() {
        let item = json!({
            "id": 550,
            "media_type": "movie",
            "title": "Fight Club",
            "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
            "release_date": "1999-10-15",
            "vote_average": 8.4
        });

        let result = SearchResult::from_search_item(&item).unwrap();
        assert_eq!(result.id, 550);
        assert_eq!(result.title, "Fight Club");
        assert_eq!(result.media_type, MediaType::Movie);
        assert_eq!(result.release_date.as_deref(), Some("1999-10-15"));
    }

    #[test]
    fn test_show_item_uses_name_and_air_date() {
        let item = json!({
            "id": 1399,
            "media_type": "tv",
            "name": "Game of Thrones",
            "backdrop_path": "/suopoADq0k8YZr4dQXcU6pToj6s.jpg",
            "first_air_date": "2011-04-17",
            "vote_average": 8.5
        });

        let result = SearchResult::from_search_item(&item).unwrap();
        assert_eq!(result.title, "Game of Thrones");
        assert_eq!(result.media_type, MediaType::Tv);
        assert_eq!(result.poster_path, None);
        assert_eq!(result.release_date.as_deref(), Some("2011-04-17"));
    }

    #[test]
    fn test_people_and_imageless_items_are_dropped() {
        let person = json!({ "id": 287, "media_type": "person", "name": "Brad Pitt", "profile_path": "/x.jpg" });
        let bare = json!({ "id": 1, "media_type": "movie", "title": "No Art", "poster_path": null });
        let empty = json!({ "id": 2, "media_type": "movie", "title": "Empty", "poster_path": "" });

        assert!(SearchResult::from_search_item(&person).is_none());
        assert!(SearchResult::from_search_item(&bare).is_none());
        assert!(SearchResult::from_search_item(&empty).is_none());
    }

    #[test]
    fn test_collect_caps_results_in_order() {
        let items: Vec<Value> = (1..=8)
            .map(|id| {
                json!({
                    "id": id,
                    "media_type": "movie",
                    "title": format!("M{}", id),
                    "poster_path": "/p.jpg",
                })
            })
            .collect();

        let capped = SearchResult::collect(&items, Some(5));
        assert_eq!(capped.len(), 5);
        assert_eq!(capped.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);

        assert_eq!(SearchResult::collect(&items, None).len(), 8);
    }
}
