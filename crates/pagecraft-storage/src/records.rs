//! Stored record shapes.
//!
//! These mirror the `landing_pages`, `leads`, and `analytics_events` columns
//! exactly. Page configs are kept as raw JSON here; the typed model lives in
//! `pagecraft-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Pages ────────────────────────────────────────────────────────────

/// A persisted landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::FromRow))]
pub struct PageRecord {
    pub id: Uuid,
    /// Opaque id of the authenticated owner.
    pub owner_id: String,
    /// Unique public path segment (`/p/{slug}`).
    pub slug: String,
    pub title: String,
    /// Normalized landing-page config document.
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Leads ────────────────────────────────────────────────────────────

/// A lead ready to be inserted. Ids and timestamps are assigned by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLead {
    pub page_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// A stored lead. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::FromRow))]
pub struct Lead {
    pub id: Uuid,
    pub page_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

// ── Analytics events ─────────────────────────────────────────────────

/// An analytics event ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub landing_page_id: Uuid,
    pub event_type: String,
    pub session_id: Option<String>,
    /// SHA-256 hex digest of the client IP. Raw IPs never reach storage.
    pub ip_hash: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
}

/// A stored analytics event. Immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::FromRow))]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub landing_page_id: Uuid,
    pub event_type: String,
    pub session_id: Option<String>,
    pub ip_hash: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Number of events of one type recorded for a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres-backend", derive(sqlx::FromRow))]
pub struct EventCount {
    pub event_type: String,
    pub count: i64,
}
