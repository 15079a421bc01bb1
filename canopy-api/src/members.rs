use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use canopy_catalog::member::{Member, MemberPatch, MemberRole, SocialMedia};
use canopy_store::member_repo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub role: MemberRole,
    pub photo_url: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub role: Option<MemberRole>,
    pub photo_url: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: Uuid,
    pub name: String,
    pub role: MemberRole,
    pub photo_url: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            role: member.role,
            photo_url: member.photo_url,
            position: member.position,
            bio: member.bio,
            social_media: member.social_media,
            is_visible: member.is_visible,
            created_at: member.created_at,
            updated_at: member.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/members", post(create_member).get(list_members))
        .route("/admin/members/teams", get(list_teams))
        .route("/admin/members/interns", get(list_interns))
        .route("/admin/members/team/{id}", get(get_team_member))
        .route("/admin/members/intern/{id}", get(get_intern))
        .route("/admin/members/{id}", get(get_member).patch(update_member))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /admin/members
async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Name must not be empty".to_string(),
        ));
    }

    let now = Utc::now();
    let member = Member {
        id: Uuid::new_v4(),
        name: req.name,
        role: req.role,
        photo_url: req.photo_url,
        position: req.position,
        bio: req.bio,
        social_media: req.social_media,
        is_visible: req.is_visible,
        created_at: now,
        updated_at: now,
    };

    let mut conn = state.db.acquire().await?;
    member_repo::create_member(&mut conn, &member).await?;

    Ok((StatusCode::CREATED, Json(member.into())))
}

/// GET /admin/members
/// Every member regardless of role or visibility
async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let members = member_repo::list_members(&mut conn).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /admin/members/teams
/// Visible members on the team roster
async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let members = member_repo::list_visible_by_role(&mut conn, MemberRole::Team).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /admin/members/interns
/// Visible members on the intern roster
async fn list_interns(
    State(state): State<AppState>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let mut conn = state.db.acquire().await?;
    let members = member_repo::list_visible_by_role(&mut conn, MemberRole::Intern).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// GET /admin/members/team/{id}
/// 404s unless the member is on the team roster
async fn get_team_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let member = member_repo::get_member_with_role(&mut conn, id, MemberRole::Team).await?;
    Ok(Json(member.into()))
}

/// GET /admin/members/intern/{id}
/// 404s unless the member is on the intern roster
async fn get_intern(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let member = member_repo::get_member_with_role(&mut conn, id, MemberRole::Intern).await?;
    Ok(Json(member.into()))
}

/// GET /admin/members/{id}
/// Any role
async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, AppError> {
    let mut conn = state.db.acquire().await?;
    let member = member_repo::get_member(&mut conn, id).await?;
    Ok(Json(member.into()))
}

/// PATCH /admin/members/{id}
/// Partial update; a supplied social_media object replaces the stored one
/// wholesale
async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Name must not be empty".to_string(),
            ));
        }
    }

    let patch = MemberPatch {
        name: req.name,
        role: req.role,
        photo_url: req.photo_url,
        position: req.position,
        bio: req.bio,
        social_media: req.social_media,
        is_visible: req.is_visible,
    };

    let mut conn = state.db.acquire().await?;
    let member = member_repo::update_member(&mut conn, id, &patch).await?;
    Ok(Json(member.into()))
}
