use axum::{http::Method, middleware::from_fn_with_state, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod feedback;
pub mod health;
pub mod members;
pub mod mentors;
pub mod middleware;
pub mod offerings;
pub mod opportunities;
pub mod projects;
pub mod services;
pub mod state;
pub mod techs;
pub mod trainings;

pub use state::AppState;

/// Assembles the full router. Everything except `/` and `/auth/login` sits
/// behind the admin token gate.
pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let admin = Router::new()
        .merge(auth::protected_routes())
        .merge(health::protected_routes())
        .merge(techs::routes())
        .merge(offerings::routes())
        .merge(mentors::routes())
        .merge(services::routes())
        .merge(trainings::routes())
        .merge(members::routes())
        .merge(projects::routes())
        .merge(feedback::routes())
        .merge(opportunities::routes())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth_middleware,
        ));

    Router::new()
        .merge(auth::routes())
        .merge(health::routes())
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
