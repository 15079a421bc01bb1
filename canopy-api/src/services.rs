use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use canopy_catalog::pricing::DiscountType;
use canopy_catalog::service::{Service, ServiceDetail, ServicePatch};
use canopy_store::service_repo;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub title: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub base_price: Decimal,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    #[serde(default)]
    pub tech_ids: Vec<Uuid>,
    #[serde(default)]
    pub offering_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub base_price: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub tech_ids: Option<Vec<Uuid>>,
    pub offering_ids: Option<Vec<Uuid>>,
}

/// The wire shape carries the computed price next to the base price; the
/// discount fields themselves stay internal.
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: Uuid,
    pub photo_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub techs: Vec<String>,
    pub offerings: Vec<String>,
    pub base_price: Decimal,
    pub effective_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceDetail> for ServiceResponse {
    fn from(detail: ServiceDetail) -> Self {
        let effective_price = detail.service.effective_price();
        let service = detail.service;
        Self {
            id: service.id,
            photo_url: service.photo_url,
            title: service.title,
            description: service.description,
            techs: detail.techs.into_iter().map(|t| t.name).collect(),
            offerings: detail.offerings.into_iter().map(|o| o.name).collect(),
            base_price: service.base_price,
            effective_price,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/services", post(create_service).get(list_services))
        .route(
            "/admin/services/{id}",
            get(get_service)
                .patch(update_service)
                .delete(delete_service),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/services
/// Create a service with its tech and offering links in one transaction
async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    // 1. Validate scalars before touching the store
    if req.title.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Title must not be empty".to_string(),
        ));
    }
    if req.base_price < Decimal::ZERO {
        return Err(AppError::ValidationError(
            "Base price must not be negative".to_string(),
        ));
    }

    let now = Utc::now();
    let service = Service {
        id: Uuid::new_v4(),
        photo_url: req.photo_url,
        title: req.title,
        description: req.description,
        base_price: req.base_price,
        discount_type: req.discount_type,
        discount_value: req.discount_value,
        created_at: now,
        updated_at: now,
    };

    // 2. Owner row and both link sets land together or not at all
    let mut tx = state.db.begin().await?;
    let detail =
        service_repo::create_service(&mut tx, &service, &req.tech_ids, &req.offering_ids).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// GET /admin/services
async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let services = service_repo::list_services(&mut conn).await?;
    Ok(Json(
        services.into_iter().map(ServiceResponse::from).collect(),
    ))
}

/// GET /admin/services/{id}
async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let detail = service_repo::get_service(&mut conn, id).await?;
    Ok(Json(detail.into()))
}

/// PATCH /admin/services/{id}
/// Partial scalar update plus optional replacement of either link set
async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }
    }
    if let Some(base_price) = req.base_price {
        if base_price < Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Base price must not be negative".to_string(),
            ));
        }
    }

    let patch = ServicePatch {
        photo_url: req.photo_url,
        title: req.title,
        description: req.description,
        base_price: req.base_price,
        discount_type: req.discount_type,
        discount_value: req.discount_value,
    };

    let mut tx = state.db.begin().await?;
    service_repo::update_service(
        &mut tx,
        id,
        &patch,
        req.tech_ids.as_deref(),
        req.offering_ids.as_deref(),
    )
    .await?;
    tx.commit().await?;

    // Reshape from committed state so the response carries the final
    // timestamps and link sets.
    let mut conn = state.db.acquire().await?;
    let detail = service_repo::get_service(&mut conn, id).await?;
    Ok(Json(detail.into()))
}

/// DELETE /admin/services/{id}
async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;
    service_repo::delete_service(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
