use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use canopy_store::admin_repo;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::AdminClaims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_active: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Verify credentials and mint a bearer token
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // 1. Look up the account. Unknown email, wrong password and an
    //    inactive account all answer identically.
    let mut conn = state.db.acquire().await?;
    let user = admin_repo::find_by_email(&mut conn, &req.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    // 2. Verify the password against the stored bcrypt hash
    let valid = bcrypt::verify(&req.password, &user.password_hash).map_err(|e| {
        AppError::InternalServerError(format!("Password verification failed: {}", e))
    })?;
    if !valid || !user.is_active {
        return Err(invalid_credentials());
    }

    // 3. Mint the token
    let claims = AdminClaims {
        sub: user.id.to_string(),
        email: user.email,
        role: user.role,
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    Ok(Json(LoginResponse {
        access_token: token,
    }))
}

/// GET /auth/me
/// Resolve the current principal from its token claims
async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
) -> Result<Json<MeResponse>, AppError> {
    let id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| stale_principal())?;

    let mut conn = state.db.acquire().await?;
    let user = admin_repo::find_by_id(&mut conn, id)
        .await?
        .ok_or_else(stale_principal)?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        role: user.role,
        is_active: user.is_active,
    }))
}

fn invalid_credentials() -> AppError {
    AppError::AuthenticationError("Invalid credentials".to_string())
}

/// The token was valid but its subject no longer resolves to an account.
fn stale_principal() -> AppError {
    AppError::AuthenticationError("Could not validate credentials".to_string())
}
