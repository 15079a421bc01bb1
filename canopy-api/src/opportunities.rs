use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use canopy_catalog::opportunity::{
    InternshipDetails, JobDetails, Opportunity, OpportunityDetails, OpportunityPatch,
    OpportunityType,
};
use canopy_store::opportunity_repo::{self, OpportunityFilter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOpportunityRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub opportunity_type: OpportunityType,
    pub job_details: Option<JobDetails>,
    pub internship_details: Option<InternshipDetails>,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOpportunityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_details: Option<JobDetails>,
    pub internship_details: Option<InternshipDetails>,
    pub requirements: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListOpportunitiesQuery {
    #[serde(rename = "type")]
    pub opportunity_type: Option<OpportunityType>,
    pub location: Option<String>,
    pub search: Option<String>,
}

/// Exactly one of the detail payloads is non-null, matching `type`.
#[derive(Debug, Serialize)]
pub struct OpportunityResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub opportunity_type: OpportunityType,
    pub job_details: Option<JobDetails>,
    pub internship_details: Option<InternshipDetails>,
    pub requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Opportunity> for OpportunityResponse {
    fn from(opportunity: Opportunity) -> Self {
        let opportunity_type = opportunity.details.kind();
        let (job_details, internship_details) = match opportunity.details {
            OpportunityDetails::Job(details) => (Some(details), None),
            OpportunityDetails::Internship(details) => (None, Some(details)),
        };
        Self {
            id: opportunity.id,
            title: opportunity.title,
            description: opportunity.description,
            location: opportunity.location,
            opportunity_type,
            job_details,
            internship_details,
            requirements: opportunity.requirements,
            created_at: opportunity.created_at,
            updated_at: opportunity.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/opportunities",
            post(create_opportunity).get(list_opportunities),
        )
        .route(
            "/api/admin/opportunities/{id}",
            get(get_opportunity)
                .patch(update_opportunity)
                .delete(delete_opportunity),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/admin/opportunities
/// Create a posting; only the detail payload matching `type` is stored
async fn create_opportunity(
    State(state): State<AppState>,
    Json(req): Json<CreateOpportunityRequest>,
) -> Result<(StatusCode, Json<OpportunityResponse>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Title must not be empty".to_string(),
        ));
    }

    let details = match req.opportunity_type {
        OpportunityType::Job => OpportunityDetails::Job(req.job_details.unwrap_or_default()),
        OpportunityType::Internship => {
            OpportunityDetails::Internship(req.internship_details.unwrap_or_default())
        }
    };

    let now = Utc::now();
    let opportunity = Opportunity {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        location: req.location,
        details,
        requirements: req.requirements,
        created_at: now,
        updated_at: now,
    };

    let mut tx = state.db.begin().await?;
    opportunity_repo::create_opportunity(&mut tx, &opportunity).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(opportunity.into())))
}

/// GET /api/admin/opportunities?type=&location=&search=
/// Newest first; filters combine
async fn list_opportunities(
    State(state): State<AppState>,
    Query(query): Query<ListOpportunitiesQuery>,
) -> Result<Json<Vec<OpportunityResponse>>, AppError> {
    let filter = OpportunityFilter {
        opportunity_type: query.opportunity_type,
        location: query.location,
        search: query.search,
    };

    let mut conn = state.db.acquire().await?;
    let opportunities = opportunity_repo::list_opportunities(&mut conn, &filter).await?;
    Ok(Json(
        opportunities
            .into_iter()
            .map(OpportunityResponse::from)
            .collect(),
    ))
}

/// GET /api/admin/opportunities/{id}
async fn get_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OpportunityResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let opportunity = opportunity_repo::get_opportunity(&mut conn, id).await?;
    Ok(Json(opportunity.into()))
}

/// PATCH /api/admin/opportunities/{id}
/// Scalars patch individually; a detail payload applies only when it
/// matches the row's type, and a supplied requirement list replaces the
/// stored one wholesale. The type itself never changes.
async fn update_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOpportunityRequest>,
) -> Result<Json<OpportunityResponse>, AppError> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title must not be empty".to_string(),
            ));
        }
    }

    let patch = OpportunityPatch {
        title: req.title,
        description: req.description,
        location: req.location,
    };

    let mut tx = state.db.begin().await?;
    opportunity_repo::update_opportunity(
        &mut tx,
        id,
        &patch,
        req.job_details.as_ref(),
        req.internship_details.as_ref(),
        req.requirements.as_deref(),
    )
    .await?;
    tx.commit().await?;

    let mut conn = state.db.acquire().await?;
    let opportunity = opportunity_repo::get_opportunity(&mut conn, id).await?;
    Ok(Json(opportunity.into()))
}

/// DELETE /api/admin/opportunities/{id}
/// Detail and requirement rows cascade
async fn delete_opportunity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let mut conn = state.db.acquire().await?;
    opportunity_repo::delete_opportunity(&mut conn, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
