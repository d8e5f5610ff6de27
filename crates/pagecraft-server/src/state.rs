//! Shared application state for the Pagecraft server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the page service, the interaction
//! capture service, and the session store.

use std::sync::Arc;

use pagecraft_core::{InteractionCapture, PageGenerator, PageService, TextGenerator};
use pagecraft_storage::Repository;

use crate::sessions::SessionStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Generation, owner reads and edits, public lookup.
    pub pages: PageService,
    /// Analytics events and leads.
    pub capture: InteractionCapture,
    /// Session token to owner mapping.
    pub sessions: SessionStore,
    /// Base URL for links to published pages.
    pub public_url: Option<String>,
}

impl AppState {
    /// Wire the services over one repository and one text generator.
    #[must_use]
    pub fn new(
        repo: Arc<dyn Repository>,
        generator: Arc<dyn TextGenerator>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            pages: PageService::new(Arc::clone(&repo), PageGenerator::new(generator)),
            capture: InteractionCapture::new(repo),
            sessions,
            public_url: None,
        }
    }

    #[must_use]
    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }

    /// Public link for a page slug.
    #[must_use]
    pub fn page_url(&self, slug: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{base}/p/{slug}"),
            None => format!("/p/{slug}"),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
