use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use canopy_catalog::project::ProjectFeedback;
use canopy_store::project_repo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateFeedbackRequest {
    pub client_name: String,
    pub client_photo: Option<String>,
    pub feedback_description: String,
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub client_name: String,
    pub client_photo: Option<String>,
    pub feedback_description: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ProjectFeedback> for FeedbackResponse {
    fn from(feedback: ProjectFeedback) -> Self {
        Self {
            id: feedback.id,
            project_id: feedback.project_id,
            client_name: feedback.client_name,
            client_photo: feedback.client_photo,
            feedback_description: feedback.feedback_description,
            rating: feedback.rating,
            created_at: feedback.created_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/projects/{id}/feedbacks",
            get(list_feedbacks).post(create_feedback),
        )
        .route(
            "/admin/projects/feedbacks/{feedback_id}",
            delete(delete_feedback),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/projects/{id}/feedbacks
/// Attach client feedback to a project
async fn create_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    if !ProjectFeedback::rating_in_range(req.rating) {
        return Err(AppError::ValidationError(format!(
            "Rating must be between {} and {}",
            ProjectFeedback::MIN_RATING,
            ProjectFeedback::MAX_RATING
        )));
    }
    if req.client_name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Client name must not be empty".to_string(),
        ));
    }

    let feedback = ProjectFeedback {
        id: Uuid::new_v4(),
        project_id: id,
        client_name: req.client_name,
        client_photo: req.client_photo,
        feedback_description: req.feedback_description,
        rating: req.rating,
        created_at: Utc::now(),
    };

    let mut conn = state.db.acquire().await?;
    project_repo::create_feedback(&mut conn, &feedback).await?;

    Ok((StatusCode::CREATED, Json(feedback.into())))
}

/// GET /admin/projects/{id}/feedbacks
/// Newest first; 404 if the project itself is gone
async fn list_feedbacks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let feedbacks = project_repo::list_feedbacks(&mut conn, id).await?;
    Ok(Json(
        feedbacks.into_iter().map(FeedbackResponse::from).collect(),
    ))
}

/// DELETE /admin/projects/feedbacks/{feedback_id}
async fn delete_feedback(
    State(state): State<AppState>,
    Path(feedback_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut conn = state.db.acquire().await?;
    project_repo::delete_feedback(&mut conn, feedback_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
