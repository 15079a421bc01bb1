use std::net::SocketAddr;

use canopy_api::{
    app,
    state::{AppState, AuthConfig},
};
use canopy_store::{admin_repo, app_config::Config, Database};
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "canopy_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Canopy API on port {}", config.server.port);

    let db = Database::connect(&config.database.url).await?;
    db.migrate().await?;

    bootstrap_admin(&db, &config).await?;

    let state = AppState {
        db,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Creates the configured admin account if its email is unused. An
/// existing account is left alone so restarts never clobber a live
/// password.
async fn bootstrap_admin(db: &Database, config: &Config) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        config.auth.bootstrap_email.as_deref(),
        config.auth.bootstrap_password.as_deref(),
    ) else {
        return Ok(());
    };

    let mut conn = db.acquire().await?;
    if admin_repo::find_by_email(&mut conn, email).await?.is_some() {
        tracing::debug!("Bootstrap admin {} already exists", email);
        return Ok(());
    }

    let user = admin_repo::AdminUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: bcrypt::hash(password, bcrypt::DEFAULT_COST)?,
        role: "ADMIN".to_string(),
        is_active: true,
        created_at: Utc::now(),
    };
    admin_repo::insert(&mut conn, &user).await?;
    tracing::info!("Bootstrap admin {} created", email);
    Ok(())
}
