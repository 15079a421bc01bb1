use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use canopy_catalog::project::{Project, ProjectDetail, ProjectPatch};
use canopy_store::project_repo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feedback::FeedbackResponse;
use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub project_link: Option<String>,
    #[serde(default)]
    pub tech_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub project_link: Option<String>,
    pub tech_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub photo_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub project_link: Option<String>,
    pub techs: Vec<String>,
    pub feedbacks: Vec<FeedbackResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectDetail> for ProjectResponse {
    fn from(detail: ProjectDetail) -> Self {
        let project = detail.project;
        Self {
            id: project.id,
            photo_url: project.photo_url,
            title: project.title,
            description: project.description,
            project_link: project.project_link,
            techs: detail.techs.into_iter().map(|t| t.name).collect(),
            feedbacks: detail
                .feedbacks
                .into_iter()
                .map(FeedbackResponse::from)
                .collect(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/projects", post(create_project).get(list_projects))
        .route(
            "/admin/projects/{id}",
            get(get_project)
                .patch(update_project)
                .delete(delete_project),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/projects
/// Create a project with its tech links in one transaction
async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Title must not be empty".to_string(),
        ));
    }

    let now = Utc::now();
    let project = Project {
        id: Uuid::new_v4(),
        photo_url: req.photo_url,
        title: req.title,
        description: req.description,
        project_link: req.project_link,
        created_at: now,
        updated_at: now,
    };

    let mut tx = state.db.begin().await?;
    let detail = project_repo::create_project(&mut tx, &project, &req.tech_ids).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// GET /admin/projects
async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let projects = project_repo::list_projects(&mut conn).await?;
    Ok(Json(
        projects.into_iter().map(ProjectResponse::from).collect(),
    ))
}

/// GET /admin/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let detail = project_repo::get_project(&mut conn, id).await?;
    Ok(Json(detail.into()))
}

/// PATCH /admin/projects/{id}
/// Partial scalar update plus optional replacement of the tech link set
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }
    }

    let patch = ProjectPatch {
        photo_url: req.photo_url,
        title: req.title,
        description: req.description,
        project_link: req.project_link,
    };

    let mut tx = state.db.begin().await?;
    project_repo::update_project(&mut tx, id, &patch, req.tech_ids.as_deref()).await?;
    tx.commit().await?;

    let mut conn = state.db.acquire().await?;
    let detail = project_repo::get_project(&mut conn, id).await?;
    Ok(Json(detail.into()))
}

/// DELETE /admin/projects/{id}
/// Feedback rows cascade with the project
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;
    project_repo::delete_project(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
