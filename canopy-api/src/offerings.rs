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
pub struct CreateOfferingRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct OfferingResponse {
    pub id: Uuid,
    pub name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/admin/service-offerings",
        post(create_offering).get(list_offerings),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/service-offerings
/// Register a deliverable services can include
async fn create_offering(
    State(state): State<AppState>,
    Json(req): Json<CreateOfferingRequest>,
) -> Result<(StatusCode, Json<OfferingResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }

    let mut conn = state.db.acquire().await?;
    let offering = reference_repo::create_offering(&mut conn, Uuid::new_v4(), &req.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(OfferingResponse {
            id: offering.id,
            name: offering.name,
        }),
    ))
}

/// GET /admin/service-offerings
async fn list_offerings(
    State(state): State<AppState>,
) -> Result<Json<Vec<OfferingResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let offerings = reference_repo::list_offerings(&mut conn).await?;
    Ok(Json(
        offerings
            .into_iter()
            .map(|o| OfferingResponse {
                id: o.id,
                name: o.name,
            })
            .collect(),
    ))
}
