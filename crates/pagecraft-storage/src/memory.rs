//! In-memory repository for testing and local development.
//!
//! All data lives in `BTreeMap`s behind a single `RwLock` and is lost when the
//! process exits. It enforces the same constraints as the `PostgreSQL` schema
//! (unique slugs, leads and events must reference an existing page) so tests
//! exercise the same failure paths as production.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::records::{AnalyticsEvent, EventCount, Lead, NewEvent, NewLead, PageRecord};
use crate::{Repository, StorageError, tables};

#[derive(Debug, Default)]
struct Collections {
    pages: BTreeMap<Uuid, PageRecord>,
    leads: Vec<Lead>,
    events: Vec<AnalyticsEvent>,
}

/// An in-memory [`Repository`].
///
/// Cloning is cheap and clones share the same underlying data.
///
/// # Examples
///
/// ```
/// # use pagecraft_storage::{MemoryRepository, Repository};
/// # #[tokio::main]
/// # async fn main() {
/// let repo = MemoryRepository::new();
/// let page = repo.find_page_by_slug("missing").await.unwrap();
/// assert!(page.is_none());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<Collections>>,
}

impl MemoryRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a page's stored events, oldest first.
    pub async fn events_for(&self, page_id: Uuid) -> Vec<AnalyticsEvent> {
        let data = self.data.read().await;
        data.events
            .iter()
            .filter(|e| e.landing_page_id == page_id)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    async fn save_page(&self, page: &PageRecord) -> Result<PageRecord, StorageError> {
        let mut data = self.data.write().await;

        let slug_taken = data
            .pages
            .values()
            .any(|existing| existing.slug == page.slug && existing.id != page.id);
        if slug_taken {
            return Err(StorageError::Conflict {
                table: tables::LANDING_PAGES,
                reason: format!("slug '{}' is already in use", page.slug),
            });
        }

        data.pages.insert(page.id, page.clone());
        Ok(page.clone())
    }

    async fn find_page_by_slug(&self, slug: &str) -> Result<Option<PageRecord>, StorageError> {
        let data = self.data.read().await;
        Ok(data.pages.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_page_by_id(&self, id: Uuid) -> Result<Option<PageRecord>, StorageError> {
        let data = self.data.read().await;
        Ok(data.pages.get(&id).cloned())
    }

    async fn list_pages_by_owner(&self, owner_id: &str) -> Result<Vec<PageRecord>, StorageError> {
        let data = self.data.read().await;
        let mut pages: Vec<PageRecord> = data
            .pages
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }

    async fn insert_lead(&self, lead: NewLead) -> Result<Lead, StorageError> {
        let mut data = self.data.write().await;
        if !data.pages.contains_key(&lead.page_id) {
            return Err(StorageError::MissingReference {
                table: tables::LEADS,
                reason: format!("page {} does not exist", lead.page_id),
            });
        }

        let stored = Lead {
            id: Uuid::new_v4(),
            page_id: lead.page_id,
            name: lead.name,
            email: lead.email,
            source: lead.source,
            metadata: lead.metadata,
            created_at: Utc::now(),
        };
        data.leads.push(stored.clone());
        Ok(stored)
    }

    async fn list_leads(&self, page_id: Uuid) -> Result<Vec<Lead>, StorageError> {
        let data = self.data.read().await;
        // Insertion order is chronological; reverse for newest first.
        Ok(data
            .leads
            .iter()
            .rev()
            .filter(|l| l.page_id == page_id)
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<AnalyticsEvent, StorageError> {
        let mut data = self.data.write().await;
        if !data.pages.contains_key(&event.landing_page_id) {
            return Err(StorageError::MissingReference {
                table: tables::ANALYTICS_EVENTS,
                reason: format!("page {} does not exist", event.landing_page_id),
            });
        }

        let stored = AnalyticsEvent {
            id: Uuid::new_v4(),
            landing_page_id: event.landing_page_id,
            event_type: event.event_type,
            session_id: event.session_id,
            ip_hash: event.ip_hash,
            user_agent: event.user_agent,
            referrer: event.referrer,
            utm_source: event.utm_source,
            created_at: Utc::now(),
        };
        data.events.push(stored.clone());
        Ok(stored)
    }

    async fn count_events(&self, page_id: Uuid) -> Result<Vec<EventCount>, StorageError> {
        let data = self.data.read().await;
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for event in data.events.iter().filter(|e| e.landing_page_id == page_id) {
            *counts.entry(event.event_type.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(event_type, count)| EventCount {
                event_type: event_type.to_owned(),
                count,
            })
            .collect())
    }
}
