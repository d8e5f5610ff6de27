//! Session boundary.
//!
//! Maps opaque session tokens to owner ids. Tokens are held only as SHA-256
//! hex digests. The core only ever sees the resulting [`OwnerId`].

use std::collections::HashMap;

use pagecraft_core::OwnerId;
use sha2::{Digest, Sha256};

/// Name of the cookie that may carry a session token.
pub const SESSION_COOKIE: &str = "pagecraft_session";

/// Hash a token with SHA-256 for storage/lookup.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Known sessions, keyed by token hash.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: HashMap<String, OwnerId>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `user:token,user:token` list.
    ///
    /// Malformed entries (no `:`, blank user or token) are skipped with a
    /// warning.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        let mut store = Self::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.split_once(':') {
                Some((user, token)) if !user.trim().is_empty() && !token.trim().is_empty() => {
                    store.insert(OwnerId::new(user.trim()), token.trim());
                }
                _ => tracing::warn!("ignoring malformed session entry"),
            }
        }
        store
    }

    /// Register `token` for `owner`.
    pub fn insert(&mut self, owner: OwnerId, token: &str) {
        self.sessions.insert(hash_token(token), owner);
    }

    /// The owner a token belongs to, if any.
    #[must_use]
    pub fn authenticate(&self, token: &str) -> Option<OwnerId> {
        self.sessions.get(&hash_token(token)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_authenticate() {
        let store = SessionStore::parse("alice:tok-a, bob:tok-b");
        assert_eq!(store.len(), 2);
        assert_eq!(store.authenticate("tok-a"), Some(OwnerId::new("alice")));
        assert_eq!(store.authenticate("tok-b"), Some(OwnerId::new("bob")));
        assert_eq!(store.authenticate("tok-c"), None);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let store = SessionStore::parse("nocolon,:tok,carol:,dave:tok-d,,");
        assert_eq!(store.len(), 1);
        assert_eq!(store.authenticate("tok-d"), Some(OwnerId::new("dave")));
    }

    #[test]
    fn tokens_are_not_kept_in_plaintext() {
        let store = SessionStore::parse("alice:super-secret");
        assert!(!format!("{:?}", store.sessions).contains("super-secret"));
        assert_eq!(hash_token("super-secret").len(), 64);
    }

    #[test]
    fn empty_list() {
        assert!(SessionStore::parse("").is_empty());
    }
}
