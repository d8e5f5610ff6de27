//! Page management.
//!
//! [`PageService`] ties generation to persistence: it assigns slugs, scopes
//! every owner read to the caller, and derives per-page statistics. Pages
//! owned by someone else are reported as not found so ids never leak.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagecraft_storage::{EventCount, Lead, PageRecord, Repository};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::capture::EventType;
use crate::config::{LandingPageConfig, normalize};
use crate::error::PageError;
use crate::generator::PageGenerator;

/// Opaque id of an authenticated page owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OwnerId(String);

impl OwnerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted page with its typed config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: Uuid,
    pub owner_id: String,
    pub slug: String,
    pub title: String,
    pub config: LandingPageConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    fn from_record(record: PageRecord) -> Result<Self, PageError> {
        let config = normalize(record.config)?;
        Ok(Self {
            id: record.id,
            owner_id: record.owner_id,
            slug: record.slug,
            title: record.title,
            config,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn to_record(&self) -> Result<PageRecord, PageError> {
        Ok(PageRecord {
            id: self.id,
            owner_id: self.owner_id.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            config: self.config.to_value()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Event counts and conversion for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageStats {
    pub page_id: Uuid,
    pub page_views: i64,
    pub form_submits: i64,
    pub cta_clicks: i64,
    pub leads: usize,
    /// `form_submits / page_views`, or 0 with no views.
    pub conversion_rate: f64,
}

impl PageStats {
    #[allow(clippy::cast_precision_loss)]
    fn from_counts(page_id: Uuid, counts: &[EventCount], leads: usize) -> Self {
        let count = |kind: EventType| {
            counts
                .iter()
                .find(|c| c.event_type == kind.as_str())
                .map_or(0, |c| c.count)
        };
        let page_views = count(EventType::PageView);
        let form_submits = count(EventType::FormSubmit);
        let conversion_rate = if page_views > 0 {
            form_submits as f64 / page_views as f64
        } else {
            0.0
        };
        Self {
            page_id,
            page_views,
            form_submits,
            cta_clicks: count(EventType::CtaClick),
            leads,
            conversion_rate,
        }
    }
}

/// Lowercase ASCII slug: runs of anything else collapse to one `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    // Keep slugs short enough for a URL path segment.
    let mut cut = slug.chars().take(48).collect::<String>();
    while cut.ends_with('-') {
        cut.pop();
    }
    cut
}

fn unique_slug(base: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let suffix = &suffix[..6];
    let base = slugify(base);
    if base.is_empty() {
        format!("page-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}

/// Owner-facing page operations plus the public slug lookup.
#[derive(Clone)]
pub struct PageService {
    repo: Arc<dyn Repository>,
    generator: PageGenerator,
}

impl std::fmt::Debug for PageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageService").finish_non_exhaustive()
    }
}

impl PageService {
    #[must_use]
    pub fn new(repo: Arc<dyn Repository>, generator: PageGenerator) -> Self {
        Self { repo, generator }
    }

    /// Generate a config from `prompt` and persist it as a new page.
    ///
    /// Nothing is written unless generation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Generation`] if generation fails and
    /// [`PageError::Storage`] if the save fails.
    pub async fn generate_page(&self, owner: &OwnerId, prompt: &str) -> Result<Page, PageError> {
        let config = self.generator.generate(prompt).await?;

        let now = Utc::now();
        let title = config.title().to_owned();
        let page = Page {
            id: Uuid::new_v4(),
            owner_id: owner.as_str().to_owned(),
            slug: unique_slug(&title),
            title,
            config,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repo.save_page(&page.to_record()?).await?;
        tracing::info!(owner = %owner, page_id = %saved.id, slug = %saved.slug, "page created");
        Page::from_record(saved)
    }

    /// Read one of the owner's pages.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if the page does not exist or belongs
    /// to another owner.
    pub async fn get_page(&self, owner: &OwnerId, id: Uuid) -> Result<Page, PageError> {
        let record = self.owned_record(owner, id).await?;
        Page::from_record(record)
    }

    /// All of the owner's pages, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Storage`] if the read fails.
    pub async fn list_pages(&self, owner: &OwnerId) -> Result<Vec<Page>, PageError> {
        self.repo
            .list_pages_by_owner(owner.as_str())
            .await?
            .into_iter()
            .map(Page::from_record)
            .collect()
    }

    /// Replace a page's config with `raw`, re-normalized.
    ///
    /// The slug is kept; the title follows the new config.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] for pages the owner cannot see and
    /// [`PageError::Config`] if `raw` lacks `hero` or `features`.
    pub async fn update_config(
        &self,
        owner: &OwnerId,
        id: Uuid,
        raw: Value,
    ) -> Result<Page, PageError> {
        let record = self.owned_record(owner, id).await?;
        let config = normalize(raw)?;

        let page = Page {
            id: record.id,
            owner_id: record.owner_id,
            slug: record.slug,
            title: config.title().to_owned(),
            config,
            created_at: record.created_at,
            updated_at: Utc::now(),
        };
        let saved = self.repo.save_page(&page.to_record()?).await?;
        tracing::info!(owner = %owner, page_id = %saved.id, "page config updated");
        Page::from_record(saved)
    }

    /// Public read by slug.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if no page has that slug.
    pub async fn find_published(&self, slug: &str) -> Result<Page, PageError> {
        let record = self
            .repo
            .find_page_by_slug(slug)
            .await?
            .ok_or_else(|| PageError::NotFound {
                key: slug.to_owned(),
            })?;
        Page::from_record(record)
    }

    /// Leads captured on one of the owner's pages, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] for pages the owner cannot see.
    pub async fn list_leads(&self, owner: &OwnerId, id: Uuid) -> Result<Vec<Lead>, PageError> {
        self.owned_record(owner, id).await?;
        Ok(self.repo.list_leads(id).await?)
    }

    /// Event counts and conversion rate for one of the owner's pages.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] for pages the owner cannot see.
    pub async fn page_stats(&self, owner: &OwnerId, id: Uuid) -> Result<PageStats, PageError> {
        self.owned_record(owner, id).await?;
        let counts = self.repo.count_events(id).await?;
        let leads = self.repo.list_leads(id).await?.len();
        Ok(PageStats::from_counts(id, &counts, leads))
    }

    async fn owned_record(&self, owner: &OwnerId, id: Uuid) -> Result<PageRecord, PageError> {
        match self.repo.find_page_by_id(id).await {
            Ok(Some(record)) if record.owner_id == owner.as_str() => Ok(record),
            Ok(_) => Err(PageError::NotFound { key: id.to_string() }),
            Err(e) => Err(PageError::Storage(e)),
        }
    }
}

/// Parse a page id from a path segment.
///
/// # Errors
///
/// Returns [`PageError::InvalidReference`] if `raw` is not a UUID.
pub fn parse_page_id(raw: &str) -> Result<Uuid, PageError> {
    Uuid::parse_str(raw).map_err(|e| PageError::InvalidReference {
        reason: format!("'{raw}' is not a page id: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::generator::testing::ScriptedGenerator;
    use pagecraft_storage::{MemoryRepository, NewEvent};
    use serde_json::json;

    const REPLY: &str = r#"{
        "business": {"name": "Crumb & Co"},
        "hero": {"headline": "Fresh bread, Fast", "headlineHighlights": ["Fast"], "subheadline": "Daily", "cta": "Order"},
        "features": [{"title": "Sourdough", "description": "Slow risen"}]
    }"#;

    fn service(repo: &MemoryRepository, replies: Vec<Result<String, String>>) -> PageService {
        PageService::new(
            Arc::new(repo.clone()),
            PageGenerator::new(Arc::new(ScriptedGenerator::new(replies))),
        )
    }

    fn alice() -> OwnerId {
        OwnerId::new("alice")
    }

    // ── slugs ────────────────────────────────────────────────────────

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Crumb & Co"), "crumb-co");
        assert_eq!(slugify("  --Hello,   World!-- "), "hello-world");
        assert_eq!(slugify("Ünïcode"), "n-code");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn unique_slug_has_suffix() {
        let slug = unique_slug("Crumb & Co");
        assert!(slug.starts_with("crumb-co-"));
        assert_eq!(slug.len(), "crumb-co-".len() + 6);
        assert!(unique_slug("???").starts_with("page-"));
    }

    // ── generate ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn generate_persists_page() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok(REPLY.to_owned())]);

        let page = pages.generate_page(&alice(), "a bakery").await.unwrap();
        assert_eq!(page.title, "Crumb & Co");
        assert!(page.slug.starts_with("crumb-co-"));
        assert_eq!(page.owner_id, "alice");

        let found = pages.find_published(&page.slug).await.unwrap();
        assert_eq!(found.id, page.id);
        assert_eq!(found.config.hero.headline_highlights, vec!["Fast".to_owned()]);
    }

    #[tokio::test]
    async fn failed_generation_saves_nothing() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok("not json at all".to_owned())]);

        let err = pages.generate_page(&alice(), "a bakery").await.unwrap_err();
        assert!(matches!(err, PageError::Generation(_)));
        assert!(pages.list_pages(&alice()).await.unwrap().is_empty());
    }

    // ── ownership ────────────────────────────────────────────────────

    #[tokio::test]
    async fn other_owners_see_not_found() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok(REPLY.to_owned())]);
        let page = pages.generate_page(&alice(), "a bakery").await.unwrap();

        let bob = OwnerId::new("bob");
        assert!(matches!(
            pages.get_page(&bob, page.id).await.unwrap_err(),
            PageError::NotFound { .. }
        ));
        assert!(matches!(
            pages.page_stats(&bob, page.id).await.unwrap_err(),
            PageError::NotFound { .. }
        ));
        assert!(pages.list_pages(&bob).await.unwrap().is_empty());
        assert_eq!(pages.list_pages(&alice()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![]);
        assert!(matches!(
            pages.find_published("nope").await.unwrap_err(),
            PageError::NotFound { .. }
        ));
    }

    // ── update ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn update_config_renormalizes() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok(REPLY.to_owned())]);
        let page = pages.generate_page(&alice(), "a bakery").await.unwrap();

        let raw = json!({
            "hero": {"headline": "Bread at dawn", "headlineHighlights": ["Fast"]},
            "features": [],
            "themeColors": {"accentColor": "#22c55e"},
            "hiddenSections": ["faq"]
        });
        let updated = pages.update_config(&alice(), page.id, raw).await.unwrap();

        assert_eq!(updated.slug, page.slug);
        assert_eq!(updated.title, "Bread at dawn");
        assert_eq!(updated.config.theme.accent_color, "#22c55e");
        assert!(updated.config.hero.headline_highlights.is_empty());
        assert!(updated.config.is_hidden(crate::config::SectionId::Faq));

        let stored = repo.find_page_by_id(page.id).await.unwrap().unwrap();
        assert!(stored.config.get("themeColors").is_none());
    }

    #[tokio::test]
    async fn update_config_requires_hero() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok(REPLY.to_owned())]);
        let page = pages.generate_page(&alice(), "a bakery").await.unwrap();

        let err = pages
            .update_config(&alice(), page.id, json!({"features": []}))
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::Config(_)));
    }

    // ── stats ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn stats_compute_conversion() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok(REPLY.to_owned())]);
        let page = pages.generate_page(&alice(), "a bakery").await.unwrap();

        for kind in ["page_view", "page_view", "page_view", "page_view", "form_submit"] {
            repo.insert_event(NewEvent {
                landing_page_id: page.id,
                event_type: kind.to_owned(),
                session_id: None,
                ip_hash: None,
                user_agent: None,
                referrer: None,
                utm_source: None,
            })
            .await
            .unwrap();
        }

        let stats = pages.page_stats(&alice(), page.id).await.unwrap();
        assert_eq!(stats.page_views, 4);
        assert_eq!(stats.form_submits, 1);
        assert_eq!(stats.cta_clicks, 0);
        assert_eq!(stats.conversion_rate, 0.25);
    }

    #[tokio::test]
    async fn stats_without_views_are_zero() {
        let repo = MemoryRepository::new();
        let pages = service(&repo, vec![Ok(REPLY.to_owned())]);
        let page = pages.generate_page(&alice(), "a bakery").await.unwrap();

        let stats = pages.page_stats(&alice(), page.id).await.unwrap();
        assert_eq!(stats.conversion_rate, 0.0);
        assert_eq!(stats.leads, 0);
    }

    #[test]
    fn parse_page_id_rejects_garbage() {
        assert!(parse_page_id("not-a-uuid").is_err());
        assert!(parse_page_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
