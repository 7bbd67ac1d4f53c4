use std::collections::HashMap;

use reqwest::Client as HttpClient;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::Profile,
};

/// Storage for user profiles
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Looks up a profile by user id
    async fn find(&self, user_id: &str) -> AppResult<Option<Profile>>;

    /// Inserts the profile, replacing a row with the same id
    async fn upsert(&self, profile: Profile) -> AppResult<Profile>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

/// Profile store backed by the backend-as-a-service REST interface (PostgREST)
///
/// Uses the privileged service key, which bypasses row-level security. Only the
/// server ever holds this key.
pub struct PostgrestProfileStore {
    http_client: HttpClient,
    rest_url: String,
    service_key: String,
}

impl PostgrestProfileStore {
    pub fn new(project_url: &str, service_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            rest_url: format!("{}/rest/v1/profiles", project_url.trim_end_matches('/')),
            service_key,
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Accept", "application/json")
    }

    async fn rows(response: reqwest::Response) -> AppResult<Vec<Profile>> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "Backend returned status {}: {}",
                status, body
            )));
        }

        let rows: Vec<Profile> = response.json().await?;
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl ProfileStore for PostgrestProfileStore {
    async fn find(&self, user_id: &str) -> AppResult<Option<Profile>> {
        let filter = format!("eq.{}", user_id);
        let response = self
            .authorized(self.http_client.get(&self.rest_url))
            .query(&[("id", filter.as_str()), ("select", "*")])
            .send()
            .await?;

        let rows = Self::rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert(&self, profile: Profile) -> AppResult<Profile> {
        let response = self
            .authorized(self.http_client.post(&self.rest_url))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&profile)
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Backend("Upsert returned no rows".to_string()))
    }

    fn name(&self) -> &'static str {
        "postgrest"
    }
}

/// Process-local profile store, used when no backend is configured
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find(&self, user_id: &str) -> AppResult<Option<Profile>> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }

    async fn upsert(&self, profile: Profile) -> AppResult<Profile> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
