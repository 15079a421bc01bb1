use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use canopy_store::reference_repo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTechRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TechResponse {
    pub id: Uuid,
    pub name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/service-techs", post(create_tech).get(list_techs))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/service-techs
/// Register a technology services and projects can be tagged with
async fn create_tech(
    State(state): State<AppState>,
    Json(req): Json<CreateTechRequest>,
) -> Result<(StatusCode, Json<TechResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }

    let mut conn = state.db.acquire().await?;
    let tech = reference_repo::create_tech(&mut conn, Uuid::new_v4(), &req.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(TechResponse {
            id: tech.id,
            name: tech.name,
        }),
    ))
}

/// GET /admin/service-techs
async fn list_techs(State(state): State<AppState>) -> Result<Json<Vec<TechResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let techs = reference_repo::list_techs(&mut conn).await?;
    Ok(Json(
        techs
            .into_iter()
            .map(|t| TechResponse {
                id: t.id,
                name: t.name,
            })
            .collect(),
    ))
}
