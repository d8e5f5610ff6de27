//! Storage abstraction for Pagecraft.
//!
//! This crate defines the [`Repository`] trait, a narrow, entity-oriented
//! storage interface with one method per operation the application needs.
//! It knows nothing about page configuration semantics: configs are stored as
//! opaque JSON documents and validated by `pagecraft-core` before they get
//! here.
//!
//! Two implementations are provided:
//!
//! - [`PostgresRepository`] — production backend using `sqlx` (feature `postgres-backend`)
//! - [`MemoryRepository`] — in-memory, for tests and local development

mod error;
mod memory;
#[cfg(feature = "postgres-backend")]
mod postgres_backend;
mod records;

use uuid::Uuid;

pub use error::StorageError;
pub use memory::MemoryRepository;
#[cfg(feature = "postgres-backend")]
pub use postgres_backend::PostgresRepository;
pub use records::{AnalyticsEvent, EventCount, Lead, NewEvent, NewLead, PageRecord};

/// Collection names shared by every backend.
pub mod tables {
    pub const LANDING_PAGES: &str = "landing_pages";
    pub const LEADS: &str = "leads";
    pub const ANALYTICS_EVENTS: &str = "analytics_events";
}

/// A pluggable datastore for pages, leads, and analytics events.
///
/// Leads and events are append-only: the trait deliberately has no update or
/// delete for them. Consistency under concurrent writes (duplicate leads,
/// two saves of the same page) is the backend's concern.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Insert or replace a page, keyed by its id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`] if another page already uses the
    /// slug, or [`StorageError::Write`] if the backend fails.
    async fn save_page(&self, page: &PageRecord) -> Result<PageRecord, StorageError>;

    /// Look up a page by its public slug.
    ///
    /// Returns `Ok(None)` if no page has that slug.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend fails.
    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<PageRecord>, StorageError>;

    /// Look up a page by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend fails.
    async fn find_page_by_id(&self, id: Uuid) -> Result<Option<PageRecord>, StorageError>;

    /// List every page owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend fails.
    async fn list_pages_by_owner(&self, owner_id: &str) -> Result<Vec<PageRecord>, StorageError>;

    /// Append a lead.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingReference`] if the page does not exist,
    /// or [`StorageError::Write`] if the backend fails.
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead, StorageError>;

    /// List the leads captured for a page, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend fails.
    async fn list_leads(&self, page_id: Uuid) -> Result<Vec<Lead>, StorageError>;

    /// Append an analytics event.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingReference`] if the page does not exist,
    /// or [`StorageError::Write`] if the backend fails.
    async fn insert_event(&self, event: NewEvent) -> Result<AnalyticsEvent, StorageError>;

    /// Count a page's events grouped by event type.
    ///
    /// Types with no events are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend fails.
    async fn count_events(&self, page_id: Uuid) -> Result<Vec<EventCount>, StorageError>;
}
