use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use canopy_catalog::pricing::DiscountType;
use canopy_catalog::training::{Training, TrainingDetail, TrainingPatch};
use canopy_store::training_repo;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTrainingRequest {
    pub title: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub base_price: Decimal,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub mentor_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTrainingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo_url: Option<String>,
    pub base_price: Option<Decimal>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<Decimal>,
    pub benefits: Option<Vec<String>>,
    pub mentor_ids: Option<Vec<Uuid>>,
}

/// Mentors appear in training payloads as display data, not references.
#[derive(Debug, Serialize)]
pub struct TrainingMentorResponse {
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrainingResponse {
    pub id: Uuid,
    pub photo_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub benefits: Vec<String>,
    pub mentors: Vec<TrainingMentorResponse>,
    pub base_price: Decimal,
    pub effective_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TrainingDetail> for TrainingResponse {
    fn from(detail: TrainingDetail) -> Self {
        let effective_price = detail.training.effective_price();
        let training = detail.training;
        Self {
            id: training.id,
            photo_url: training.photo_url,
            title: training.title,
            description: training.description,
            benefits: detail.benefits,
            mentors: detail
                .mentors
                .into_iter()
                .map(|m| TrainingMentorResponse {
                    name: m.name,
                    photo_url: m.photo_url,
                })
                .collect(),
            base_price: training.base_price,
            effective_price,
            created_at: training.created_at,
            updated_at: training.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/trainings", post(create_training).get(list_trainings))
        .route(
            "/admin/trainings/{id}",
            get(get_training)
                .patch(update_training)
                .delete(delete_training),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/trainings
/// Create a training with its benefit list and mentor links
async fn create_training(
    State(state): State<AppState>,
    Json(req): Json<CreateTrainingRequest>,
) -> Result<(StatusCode, Json<TrainingResponse>), AppError> {
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
    let training = Training {
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

    // 2. Owner row, benefits and mentor links land together or not at all
    let mut tx = state.db.begin().await?;
    let detail =
        training_repo::create_training(&mut tx, &training, &req.benefits, &req.mentor_ids).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// GET /admin/trainings
async fn list_trainings(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainingResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let trainings = training_repo::list_trainings(&mut conn).await?;
    Ok(Json(
        trainings.into_iter().map(TrainingResponse::from).collect(),
    ))
}

/// GET /admin/trainings/{id}
async fn get_training(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let detail = training_repo::get_training(&mut conn, id).await?;
    Ok(Json(detail.into()))
}

/// PATCH /admin/trainings/{id}
/// Partial scalar update; a supplied benefit list replaces the stored one
/// wholesale, mentor ids follow replace semantics
async fn update_training(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTrainingRequest>,
) -> Result<Json<TrainingResponse>, AppError> {
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

    let patch = TrainingPatch {
        photo_url: req.photo_url,
        title: req.title,
        description: req.description,
        base_price: req.base_price,
        discount_type: req.discount_type,
        discount_value: req.discount_value,
    };

    let mut tx = state.db.begin().await?;
    training_repo::update_training(
        &mut tx,
        id,
        &patch,
        req.benefits.as_deref(),
        req.mentor_ids.as_deref(),
    )
    .await?;
    tx.commit().await?;

    let mut conn = state.db.acquire().await?;
    let detail = training_repo::get_training(&mut conn, id).await?;
    Ok(Json(detail.into()))
}

/// DELETE /admin/trainings/{id}
async fn delete_training(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut tx = state.db.begin().await?;
    training_repo::delete_training(&mut tx, id).await?;
    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
