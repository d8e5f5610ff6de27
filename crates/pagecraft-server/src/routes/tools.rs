//! Stateless editor helpers: `/v1/tools/*`
//!
//! These back the page editor. None of them touch storage.

use std::sync::Arc;

use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use pagecraft_core::highlight::{cleanup_highlights, suggest_highlights, toggle_highlight};
use pagecraft_core::theme::{CssVariable, LegacyThemeColors, ThemeClasses};
use pagecraft_core::{Theme, classes_for, css_variables_for, resolve_theme, rgba};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/v1/tools` router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/highlights/suggest", post(suggest))
        .route("/highlights/toggle", post(toggle))
        .route("/highlights/cleanup", post(cleanup))
        .route("/theme", post(theme))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub word: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CleanupRequest {
    pub text: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HighlightsResponse {
    pub highlights: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    #[serde(default)]
    pub theme: Option<serde_json::Value>,
    #[serde(default, rename = "themeColors")]
    pub theme_colors: Option<LegacyThemeColors>,
    /// When set, the accent is also returned as `rgba(...)` at this opacity.
    #[serde(default)]
    pub opacity: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub classes: ThemeClasses,
    pub css_variables: Vec<CssVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent_rgba: Option<String>,
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn suggest(Json(body): Json<SuggestRequest>) -> Json<HighlightsResponse> {
    Json(HighlightsResponse {
        highlights: suggest_highlights(&body.text),
    })
}

async fn toggle(Json(body): Json<ToggleRequest>) -> Json<HighlightsResponse> {
    Json(HighlightsResponse {
        highlights: toggle_highlight(&body.word, &body.highlights),
    })
}

async fn cleanup(Json(body): Json<CleanupRequest>) -> Json<HighlightsResponse> {
    Json(HighlightsResponse {
        highlights: cleanup_highlights(&body.highlights, &body.text),
    })
}

/// Resolve a raw theme (or legacy colors) into the values a renderer needs.
async fn theme(Json(body): Json<ThemeRequest>) -> Result<Json<ThemeResponse>, AppError> {
    let theme = resolve_theme(body.theme.as_ref(), body.theme_colors.as_ref());
    let accent_rgba = body
        .opacity
        .map(|opacity| rgba(&theme.accent_color, opacity))
        .transpose()?;

    Ok(Json(ThemeResponse {
        classes: classes_for(&theme),
        css_variables: css_variables_for(&theme),
        accent_rgba,
        theme,
    }))
}
