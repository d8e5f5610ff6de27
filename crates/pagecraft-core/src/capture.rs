//! Visitor interaction capture.
//!
//! Records analytics events and leads submitted from public pages. Raw client
//! IPs never reach storage: they are replaced by a SHA-256 hex digest before
//! the record is built.

use std::sync::Arc;

use pagecraft_storage::{AnalyticsEvent, Lead, NewEvent, NewLead, Repository};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::CaptureError;

/// Kinds of visitor interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    FormSubmit,
    CtaClick,
}

impl EventType {
    pub const ALL: [Self; 3] = [Self::PageView, Self::FormSubmit, Self::CtaClick];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::FormSubmit => "form_submit",
            Self::CtaClick => "cta_click",
        }
    }

    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as submitted by a visitor's browser.
///
/// Mandatory fields are optional here so their absence is reported as
/// [`CaptureError::MissingField`] rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventSubmission {
    pub landing_page_id: Option<String>,
    pub event_type: Option<String>,
    pub session_id: Option<String>,
    pub referrer: Option<String>,
    pub utm_source: Option<String>,
    pub user_agent: Option<String>,
    /// Filled from the connection or proxy headers, never from the body.
    #[serde(skip)]
    pub client_ip: Option<String>,
}

/// A lead form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadSubmission {
    pub page_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// SHA-256 hex digest of a client IP.
#[must_use]
pub fn hash_ip(ip: &str) -> String {
    hex::encode(Sha256::digest(ip.as_bytes()))
}

/// `Some(trimmed)` for a non-blank value.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, CaptureError> {
    present(value).ok_or(CaptureError::MissingField { field })
}

fn parse_page_id(raw: &str, field: &'static str) -> Result<Uuid, CaptureError> {
    Uuid::parse_str(raw).map_err(|e| CaptureError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

/// Blank lead details are not worth keeping.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Writes visitor events and leads through a [`Repository`].
#[derive(Clone)]
pub struct InteractionCapture {
    repo: Arc<dyn Repository>,
}

impl std::fmt::Debug for InteractionCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionCapture").finish_non_exhaustive()
    }
}

impl InteractionCapture {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Validate and store one analytics event.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::MissingField`] if `landing_page_id` or `event_type`
    ///   is absent or blank.
    /// - [`CaptureError::InvalidField`] if the page id is not a UUID or the
    ///   type is not one of `page_view`, `form_submit`, `cta_click`.
    /// - [`CaptureError::Storage`] if the write fails.
    pub async fn record_event(
        &self,
        submission: EventSubmission,
    ) -> Result<AnalyticsEvent, CaptureError> {
        let page_id = required(submission.landing_page_id.as_deref(), "landing_page_id")?;
        let event_type = required(submission.event_type.as_deref(), "event_type")?;

        let landing_page_id = parse_page_id(page_id, "landing_page_id")?;
        let event_type =
            EventType::parse(event_type).ok_or_else(|| CaptureError::InvalidField {
                field: "event_type",
                reason: format!("unknown event type '{event_type}'"),
            })?;

        let ip_hash = present(submission.client_ip.as_deref()).map(hash_ip);

        let event = self
            .repo
            .insert_event(NewEvent {
                landing_page_id,
                event_type: event_type.as_str().to_owned(),
                session_id: submission.session_id,
                ip_hash,
                user_agent: submission.user_agent,
                referrer: submission.referrer,
                utm_source: submission.utm_source,
            })
            .await?;

        tracing::debug!(
            page_id = %event.landing_page_id,
            event_type = %event.event_type,
            "analytics event recorded"
        );
        Ok(event)
    }

    /// Validate and store one lead.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::MissingField`] if `page_id` or `email` is absent or
    ///   blank.
    /// - [`CaptureError::InvalidField`] if the page id is not a UUID or the
    ///   email has no `@`.
    /// - [`CaptureError::Storage`] with the backend's message unchanged if
    ///   the write fails.
    pub async fn capture_lead(&self, submission: LeadSubmission) -> Result<Lead, CaptureError> {
        let page_id = required(submission.page_id.as_deref(), "page_id")?;
        let email = required(submission.email.as_deref(), "email")?;

        let page_id = parse_page_id(page_id, "page_id")?;
        if !email.contains('@') {
            return Err(CaptureError::InvalidField {
                field: "email",
                reason: "expected an address containing '@'".to_owned(),
            });
        }
        let email = email.to_owned();

        let lead = self
            .repo
            .insert_lead(NewLead {
                page_id,
                name: optional(submission.name),
                email,
                source: optional(submission.source),
                metadata: submission.metadata,
            })
            .await
            .map_err(|e| {
                tracing::warn!(%page_id, error = %e, "lead insert failed");
                CaptureError::Storage(e)
            })?;

        tracing::info!(%page_id, lead_id = %lead.id, "lead captured");
        Ok(lead)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pagecraft_storage::{MemoryRepository, PageRecord};

    async fn setup() -> (InteractionCapture, MemoryRepository, Uuid) {
        let repo = MemoryRepository::new();
        let now = Utc::now();
        let page = PageRecord {
            id: Uuid::new_v4(),
            owner_id: "owner-1".to_owned(),
            slug: "demo".to_owned(),
            title: "Demo".to_owned(),
            config: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };
        repo.save_page(&page).await.unwrap();
        (InteractionCapture::new(Arc::new(repo.clone())), repo, page.id)
    }

    fn view(page_id: Option<String>) -> EventSubmission {
        EventSubmission {
            landing_page_id: page_id,
            event_type: Some("page_view".to_owned()),
            ..EventSubmission::default()
        }
    }

    // ── hashing ──────────────────────────────────────────────────────

    #[test]
    fn hash_ip_is_sha256_hex() {
        let digest = hash_ip("203.0.113.7");
        assert_eq!(digest.len(), 64);
        assert!(digest.bytes().all(|b| b.is_ascii_hexdigit()));
        assert_eq!(digest, hash_ip("203.0.113.7"));
        assert_ne!(digest, hash_ip("203.0.113.8"));
    }

    #[test]
    fn event_type_parse() {
        assert_eq!(EventType::parse("cta_click"), Some(EventType::CtaClick));
        assert_eq!(EventType::parse("click"), None);
    }

    // ── record_event ─────────────────────────────────────────────────

    #[tokio::test]
    async fn event_without_page_id_is_missing_field() {
        let (capture, _, _) = setup().await;
        let err = capture.record_event(view(None)).await.unwrap_err();
        assert!(matches!(
            err,
            CaptureError::MissingField {
                field: "landing_page_id"
            }
        ));
    }

    #[tokio::test]
    async fn event_without_type_is_missing_field() {
        let (capture, _, page_id) = setup().await;
        let mut submission = view(Some(page_id.to_string()));
        submission.event_type = Some("  ".to_owned());
        let err = capture.record_event(submission).await.unwrap_err();
        assert!(matches!(err, CaptureError::MissingField { field: "event_type" }));
    }

    #[tokio::test]
    async fn unknown_event_type_is_invalid() {
        let (capture, _, page_id) = setup().await;
        let mut submission = view(Some(page_id.to_string()));
        submission.event_type = Some("scroll".to_owned());
        let err = capture.record_event(submission).await.unwrap_err();
        assert!(matches!(err, CaptureError::InvalidField { field: "event_type", .. }));
    }

    #[tokio::test]
    async fn event_stores_hashed_ip_only() {
        let (capture, repo, page_id) = setup().await;
        let mut submission = view(Some(page_id.to_string()));
        submission.client_ip = Some("198.51.100.4".to_owned());
        submission.utm_source = Some("newsletter".to_owned());

        let event = capture.record_event(submission).await.unwrap();
        assert_eq!(event.ip_hash.as_deref(), Some(hash_ip("198.51.100.4").as_str()));
        assert_ne!(event.ip_hash.as_deref(), Some("198.51.100.4"));
        assert_eq!(event.utm_source.as_deref(), Some("newsletter"));

        let counts = repo.count_events(page_id).await.unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 1);
    }

    #[tokio::test]
    async fn event_context_is_stored_verbatim() {
        let (capture, _, page_id) = setup().await;
        let mut submission = view(Some(page_id.to_string()));
        submission.session_id = Some(" s-1 ".to_owned());
        submission.referrer = Some(String::new());
        submission.utm_source = Some("  ".to_owned());
        submission.user_agent = Some(String::new());

        let event = capture.record_event(submission).await.unwrap();
        assert_eq!(event.session_id.as_deref(), Some(" s-1 "));
        assert_eq!(event.referrer.as_deref(), Some(""));
        assert_eq!(event.utm_source.as_deref(), Some("  "));
        assert_eq!(event.user_agent.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn event_without_ip_stores_none() {
        let (capture, _, page_id) = setup().await;
        let event = capture
            .record_event(view(Some(page_id.to_string())))
            .await
            .unwrap();
        assert_eq!(event.ip_hash, None);
    }

    #[tokio::test]
    async fn event_for_unknown_page_is_storage_error() {
        let (capture, _, _) = setup().await;
        let err = capture
            .record_event(view(Some(Uuid::new_v4().to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Storage(_)));
    }

    // ── capture_lead ─────────────────────────────────────────────────

    #[tokio::test]
    async fn lead_with_empty_email_is_missing_field() {
        let (capture, _, _) = setup().await;
        let err = capture
            .capture_lead(LeadSubmission {
                page_id: Some("p1".to_owned()),
                email: Some(String::new()),
                ..LeadSubmission::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::MissingField { field: "email" }));
    }

    #[tokio::test]
    async fn lead_without_page_id_is_missing_field() {
        let (capture, _, _) = setup().await;
        let err = capture
            .capture_lead(LeadSubmission {
                email: Some("a@b.co".to_owned()),
                ..LeadSubmission::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::MissingField { field: "page_id" }));
    }

    #[tokio::test]
    async fn lead_email_needs_at_sign() {
        let (capture, _, page_id) = setup().await;
        let err = capture
            .capture_lead(LeadSubmission {
                page_id: Some(page_id.to_string()),
                email: Some("not-an-email".to_owned()),
                ..LeadSubmission::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::InvalidField { field: "email", .. }));
    }

    #[tokio::test]
    async fn lead_is_stored() {
        let (capture, repo, page_id) = setup().await;
        let lead = capture
            .capture_lead(LeadSubmission {
                page_id: Some(page_id.to_string()),
                email: Some(" ada@example.com ".to_owned()),
                name: Some("Ada".to_owned()),
                source: Some("hero".to_owned()),
                metadata: Some(serde_json::json!({ "plan": "pro" })),
            })
            .await
            .unwrap();
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(repo.list_leads(page_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lead_storage_error_message_is_unchanged() {
        let (capture, _, _) = setup().await;
        let err = capture
            .capture_lead(LeadSubmission {
                page_id: Some(Uuid::new_v4().to_string()),
                email: Some("ada@example.com".to_owned()),
                ..LeadSubmission::default()
            })
            .await
            .unwrap_err();

        let CaptureError::Storage(inner) = &err else {
            panic!("expected storage error, got {err:?}");
        };
        assert_eq!(err.to_string(), inner.to_string());
    }
}
