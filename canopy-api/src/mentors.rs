use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use canopy_catalog::reference::{Mentor, MentorPatch};
use canopy_store::mentor_repo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateMentorRequest {
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMentorRequest {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MentorResponse {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}

impl From<Mentor> for MentorResponse {
    fn from(mentor: Mentor) -> Self {
        Self {
            id: mentor.id,
            name: mentor.name,
            photo_url: mentor.photo_url,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/mentors", post(create_mentor).get(list_mentors))
        .route("/admin/mentors/{id}", get(get_mentor).put(update_mentor))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/mentors
/// Register a mentor; the name is stored trimmed and lowercased
async fn create_mentor(
    State(state): State<AppState>,
    Json(req): Json<CreateMentorRequest>,
) -> Result<(StatusCode, Json<MentorResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }

    let mut conn = state.db.acquire().await?;
    let mentor = mentor_repo::create_mentor(
        &mut conn,
        Uuid::new_v4(),
        &req.name,
        req.photo_url.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(mentor.into())))
}

/// GET /admin/mentors
/// All mentors, ordered by name
async fn list_mentors(
    State(state): State<AppState>,
) -> Result<Json<Vec<MentorResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let mentors = mentor_repo::list_mentors(&mut conn).await?;
    Ok(Json(mentors.into_iter().map(MentorResponse::from).collect()))
}

/// GET /admin/mentors/{id}
async fn get_mentor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MentorResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let mentor = mentor_repo::get_mentor(&mut conn, id).await?;
    Ok(Json(mentor.into()))
}

/// PUT /admin/mentors/{id}
/// Apply the provided fields; a new name is re-normalized and re-checked
/// for uniqueness
async fn update_mentor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMentorRequest>,
) -> Result<Json<MentorResponse>, AppError> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Name must not be empty".to_string(),
            ));
        }
    }

    let patch = MentorPatch {
        name: req.name,
        photo_url: req.photo_url,
    };

    let mut conn = state.db.acquire().await?;
    let mentor = mentor_repo::update_mentor(&mut conn, id, &patch).await?;
    Ok(Json(mentor.into()))
}
