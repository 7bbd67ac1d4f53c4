use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Profile, ProfileRequest, ProfileResponse},
    routes::AppState,
};

/// Handler for profile create-or-fetch
///
/// Returns the stored profile when one exists; otherwise creates it with a
/// username derived from the user id.
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProfileRequest>, JsonRejection>,
) -> AppResult<Json<ProfileResponse>> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    let user_id = request
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("User ID is required".to_string()))?;

    if let Some(profile) = state.profiles.find(&user_id).await.map_err(|e| {
        tracing::error!(user_id = %user_id, error = %e, "Error checking for existing profile");
        e
    })? {
        return Ok(Json(ProfileResponse {
            profile,
            message: "Profile already exists",
        }));
    }

    let profile = Profile::new(&user_id, request.username, request.full_name);
    let profile = state.profiles.upsert(profile).await.map_err(|e| {
        tracing::error!(user_id = %user_id, error = %e, "Error creating profile");
        e
    })?;

    tracing::info!(user_id = %user_id, username = %profile.username, "Profile created");

    Ok(Json(ProfileResponse {
        profile,
        message: "Profile created successfully",
    }))
}
