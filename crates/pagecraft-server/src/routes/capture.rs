//! Visitor capture routes: `POST /v1/events`, `POST /v1/leads`
//!
//! Unauthenticated; called from published pages. The client IP is taken from
//! proxy headers or the socket and hashed by the core before storage.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;

use pagecraft_core::{EventSubmission, LeadSubmission};

use crate::error::AppError;
use crate::middleware::ClientIp;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/events", post(record_event))
        .route("/v1/leads", post(capture_lead))
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
    pub created_at: String,
}

/// Record one analytics event.
async fn record_event(
    State(state): State<Arc<AppState>>,
    ClientIp(client_ip): ClientIp,
    headers: HeaderMap,
    Json(mut body): Json<EventSubmission>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    body.client_ip = client_ip;
    if body.user_agent.is_none() {
        body.user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
    }

    let event = state.capture.record_event(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: event.id.to_string(),
            created_at: event.created_at.to_rfc3339(),
        }),
    ))
}

/// Store a lead form submission.
async fn capture_lead(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LeadSubmission>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let lead = state.capture.capture_lead(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: lead.id.to_string(),
            created_at: lead.created_at.to_rfc3339(),
        }),
    ))
}
