//! Public page routes.
//!
//! - `GET /v1/public/pages/{slug}` — config, resolved theme, classes and CSS
//!   variables as JSON, for client-side renderers
//! - `GET /p/{slug}` — the server-rendered HTML page

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use pagecraft_core::theme::{CssVariable, ThemeClasses};
use pagecraft_core::{LandingPageConfig, Theme, classes_for, css_variables_for, render_page};

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/public/pages/{slug}", get(public_page))
        .route("/p/{slug}", get(rendered_page))
}

/// Reject slugs that could never have been generated.
///
/// - Only lowercase alphanumerics and `-`.
/// - At most 64 characters.
fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > 64 {
        return Err(AppError::NotFound(format!("page not found: {slug}")));
    }
    if !slug
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(AppError::BadRequest(
            "slug may only contain lowercase letters, digits, and '-'".to_owned(),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PublicPageResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub config: LandingPageConfig,
    pub theme: Theme,
    pub classes: ThemeClasses,
    pub css_variables: Vec<CssVariable>,
}

async fn public_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PublicPageResponse>, AppError> {
    validate_slug(&slug)?;
    let page = state.pages.find_published(&slug).await?;
    let theme = page.config.theme.clone();
    Ok(Json(PublicPageResponse {
        id: page.id.to_string(),
        classes: classes_for(&theme),
        css_variables: css_variables_for(&theme),
        theme,
        slug: page.slug,
        title: page.title,
        config: page.config,
    }))
}

async fn rendered_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    validate_slug(&slug)?;
    let page = state.pages.find_published(&slug).await?;
    tracing::debug!(page_id = %page.id, "rendering public page");
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Html(render_page(&page)),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_validation() {
        assert!(validate_slug("crumb-co-a1b2c3").is_ok());
        assert!(matches!(validate_slug("Crumb"), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_slug("../etc"), Err(AppError::BadRequest(_))));
        assert!(matches!(validate_slug(&"a".repeat(65)), Err(AppError::NotFound(_))));
    }
}
