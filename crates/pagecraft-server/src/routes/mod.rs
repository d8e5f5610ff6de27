//! HTTP routes.
//!
//! [`build_router`] assembles the full application: owner routes behind the
//! session middleware, public capture and page routes, the stateless tool
//! endpoints, and the shared tracing, CORS and security-header layers.

pub mod capture;
pub mod pages;
pub mod public;
pub mod sys;
pub mod tools;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware as axum_mw;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::session_middleware;
use crate::state::AppState;

/// Concurrent AI generation requests allowed per process.
pub const GENERATION_CONCURRENCY: usize = 4;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Owner routes go through the session middleware layer.
    let owner_routes = Router::new()
        .nest("/v1/pages", pages::router())
        .route_layer(axum_mw::from_fn_with_state(
            Arc::clone(&state),
            session_middleware,
        ));

    // Visitors post from published pages on any origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/v1/sys", sys::router())
        .merge(owner_routes)
        .merge(capture::router())
        .merge(public::router())
        .nest("/v1/tools", tools::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}
