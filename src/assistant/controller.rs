use crate::assistant::{AssistantError, TravelAssistant};
use crate::auth::middleware::AuthUser;
use crate::controller::{error_response, ErrorResponse};
use crate::post::service::PostService;
use crate::user::service::UserService;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AssistantState {
    pub assistant: Option<Arc<dyn TravelAssistant>>,
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub interests: Vec<String>,
    pub visited_locations: Vec<String>,
    /// Free-text suggestions from the model
    pub recommendations: String,
}

/// Suggest destinations from the caller's interests and past locations
#[utoipa::path(
    get,
    path = "/api/ai/recommendations",
    responses(
        (status = 200, description = "Travel recommendations", body = RecommendationsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Profile not found", body = ErrorResponse),
        (status = 503, description = "AI assistant not configured", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ai"
)]
pub async fn get_recommendations(user: AuthUser, State(state): State<AssistantState>) -> Response {
    let Some(assistant) = state.assistant.clone() else {
        return error_response(AssistantError::NotConfigured);
    };

    let interests = match state.users.interests(&user.uid).await {
        Ok(interests) => interests,
        Err(e) => return error_response(e),
    };
    let visited_locations = match state.posts.visited_locations(&user.uid).await {
        Ok(locations) => locations,
        Err(e) => return error_response(e),
    };

    info!(
        "Generating recommendations for user {} ({} interests, {} locations)",
        user.uid,
        interests.len(),
        visited_locations.len()
    );

    match assistant
        .travel_recommendations(&interests, &visited_locations)
        .await
    {
        Ok(recommendations) => (
            StatusCode::OK,
            Json(RecommendationsResponse {
                interests,
                visited_locations,
                recommendations,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
