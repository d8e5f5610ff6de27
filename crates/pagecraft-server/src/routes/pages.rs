//! Owner page routes: `/v1/pages/*`
//!
//! Generate, list, read, and edit pages, plus per-page leads and stats. Every
//! handler runs behind the session middleware and sees only the caller's own
//! pages.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tower::limit::ConcurrencyLimitLayer;

use pagecraft_core::pages::parse_page_id;
use pagecraft_core::{LandingPageConfig, OwnerId, Page, PageStats};
use pagecraft_storage::Lead;

use crate::error::AppError;
use crate::routes::GENERATION_CONCURRENCY;
use crate::state::AppState;

/// Build the `/v1/pages` router.
///
/// Paths:
/// - `POST /v1/pages/generate` — generate and persist a page
/// - `GET  /v1/pages` — list own pages
/// - `GET  /v1/pages/{id}` — read one page
/// - `PUT  /v1/pages/{id}/config` — replace the config
/// - `GET  /v1/pages/{id}/leads` — captured leads
/// - `GET  /v1/pages/{id}/stats` — event counts and conversion
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/generate",
            post(generate_page).layer(ConcurrencyLimitLayer::new(GENERATION_CONCURRENCY)),
        )
        .route("/", get(list_pages))
        .route("/{id}", get(get_page))
        .route("/{id}/config", put(update_config))
        .route("/{id}/leads", get(list_leads))
        .route("/{id}/stats", get(page_stats))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub url: String,
    pub config: LandingPageConfig,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub url: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct PageListResponse {
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
}

fn page_response(state: &AppState, page: Page) -> PageResponse {
    PageResponse {
        id: page.id.to_string(),
        url: state.page_url(&page.slug),
        slug: page.slug,
        title: page.title,
        config: page.config,
        created_at: page.created_at.to_rfc3339(),
        updated_at: page.updated_at.to_rfc3339(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Generate a config from a prompt and save it as a new page.
async fn generate_page(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Json(body): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<PageResponse>), AppError> {
    let page = state.pages.generate_page(&owner, &body.prompt).await?;
    Ok((StatusCode::CREATED, Json(page_response(&state, page))))
}

/// List the caller's pages, newest first.
async fn list_pages(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Json<PageListResponse>, AppError> {
    let pages = state
        .pages
        .list_pages(&owner)
        .await?
        .into_iter()
        .map(|p| PageSummary {
            id: p.id.to_string(),
            url: state.page_url(&p.slug),
            slug: p.slug,
            title: p.title,
            created_at: p.created_at.to_rfc3339(),
        })
        .collect();
    Ok(Json(PageListResponse { pages }))
}

async fn get_page(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Result<Json<PageResponse>, AppError> {
    let page = state.pages.get_page(&owner, parse_page_id(&id)?).await?;
    Ok(Json(page_response(&state, page)))
}

/// Replace a page's config. The body is the raw config document.
async fn update_config(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<PageResponse>, AppError> {
    let page = state
        .pages
        .update_config(&owner, parse_page_id(&id)?, raw)
        .await?;
    Ok(Json(page_response(&state, page)))
}

async fn list_leads(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Result<Json<LeadListResponse>, AppError> {
    let leads = state.pages.list_leads(&owner, parse_page_id(&id)?).await?;
    Ok(Json(LeadListResponse { leads }))
}

async fn page_stats(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
) -> Result<Json<PageStats>, AppError> {
    let stats = state.pages.page_stats(&owner, parse_page_id(&id)?).await?;
    Ok(Json(stats))
}
