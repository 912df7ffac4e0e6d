//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /              - Submission form
//! POST /              - Submit a request
//! GET  /login         - Admin login page
//! POST /login         - Admin login action
//! GET  /logout        - Logout (link)
//! POST /logout        - Logout (form)
//! GET  /admin         - Submission list (requires admin)
//! POST /delete/{id}   - Delete a submission (requires admin)
//! GET  /health        - Liveness
//! GET  /health/ready  - Readiness (database)
//! GET  /static/*      - Stylesheet assets
//! ```

pub mod admin;
pub mod auth;
pub mod health;
pub mod submit;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(submit::form).post(submit::submit))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/admin", get(admin::list))
        .route("/delete/{id}", post(admin::delete))
}

/// Build the full application router with its middleware stack.
///
/// Sentry layers are added by the binary so that tests can drive this
/// router without a Sentry client.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.session_store().clone(), state.config());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}
