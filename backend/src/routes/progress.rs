//! Progress API routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use fitness_progress_shared::types::{
    DeleteWorkoutResponse, ProgressMutation, ProgressMutationResponse, ProgressQuery,
    ProgressResponse,
};
use uuid::Uuid;

/// Create progress routes
pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_progress).post(mutate_progress))
        .route("/workouts/:id", delete(delete_workout))
}

/// GET /api/v1/progress - Dashboard view
///
/// Creates the record on first access unless `?create=false` is given,
/// in which case a user without a record gets 404.
async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Json<ProgressResponse>> {
    let create = query.create.unwrap_or(true);
    let response = state.progress().get_progress(auth.user_id, create).await?;
    Ok(Json(response))
}

/// POST /api/v1/progress - Apply a `{ "type", "data" }` mutation
///
/// Workouts and body metrics answer 201 with the stored entry; goal updates
/// answer 200 with the merged goals.
async fn mutate_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ProgressMutationResponse>)> {
    let mutation = parse_mutation(&body)?;
    let response = state.progress().apply(auth.user_id, mutation).await?;

    let status = match response {
        ProgressMutationResponse::Goal(_) => StatusCode::OK,
        _ => StatusCode::CREATED,
    };
    Ok((status, Json(response)))
}

/// DELETE /api/v1/progress/workouts/:id - Remove a logged workout
async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
) -> ApiResult<Json<DeleteWorkoutResponse>> {
    if !state.progress().remove_workout(auth.user_id, workout_id).await? {
        return Err(ApiError::NotFound(format!("Workout {} not found", workout_id)));
    }
    Ok(Json(DeleteWorkoutResponse { deleted: true }))
}

/// Decode the tagged mutation, reporting shape errors as validation failures
fn parse_mutation(body: &[u8]) -> ApiResult<ProgressMutation> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Malformed JSON body: {}", e)))?;

    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Validation("Missing mutation type".to_string()))?;
    if !matches!(kind.as_str(), "workout" | "metrics" | "goal") {
        return Err(ApiError::Validation(format!(
            "Unknown mutation type '{}'; expected workout, metrics or goal",
            kind
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| ApiError::Validation(format!("Invalid {} payload: {}", kind, e)))
}
