use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile row in the backend's `profiles` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// New profile for `user_id`, deriving a username when none is supplied
    pub fn new(user_id: &str, username: Option<String>, full_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: user_id.to_string(),
            username: username
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| default_username(user_id)),
            full_name: full_name.filter(|name| !name.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// First eight characters of the user id
pub fn default_username(user_id: &str) -> String {
    user_id.chars().take(8).collect()
}

/// Body of `POST /api/profile`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub message: &'static str,
}
