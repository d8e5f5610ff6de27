//! Server configuration for Pagecraft.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `PAGECRAFT_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// Default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_AI_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Default model name sent to the AI endpoint.
pub const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
/// Default upper bound on a single generation call.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Storage backend type.
    pub storage_backend: StorageBackendType,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// AI provider settings.
    pub ai: AiConfig,
    /// Raw `user:token,...` session list.
    pub session_tokens: String,
    /// Externally visible base URL, used in page links.
    pub public_url: Option<String>,
}

/// Settings for the OpenAI-compatible generation endpoint.
#[derive(Clone)]
pub struct AiConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Supported storage backend types.
#[derive(Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (development only, data lost on restart).
    Memory,
    /// `PostgreSQL` persistent storage.
    Postgres { url: String },
}

impl std::fmt::Debug for StorageBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Postgres { .. } => f.write_str("Postgres { url: [redacted] }"),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `PAGECRAFT_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8300`)
    /// - `PAGECRAFT_STORAGE` — `memory` or `postgres` (default: `memory`)
    /// - `DATABASE_URL` — `PostgreSQL` connection string (used when `PAGECRAFT_STORAGE=postgres`)
    /// - `PAGECRAFT_LOG_LEVEL` — log filter (default: `info`)
    /// - `PAGECRAFT_AI_URL` — chat completions endpoint
    /// - `PAGECRAFT_AI_KEY` — bearer key for the AI endpoint
    /// - `PAGECRAFT_AI_MODEL` — model name
    /// - `PAGECRAFT_AI_TIMEOUT_SECS` — per-call timeout (default: `60`)
    /// - `PAGECRAFT_SESSION_TOKENS` — `user:token` pairs, comma separated
    /// - `PAGECRAFT_PUBLIC_URL` — base URL for links to published pages
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        // Priority: PAGECRAFT_BIND_ADDR > PORT > default 127.0.0.1:8300
        let default_addr = SocketAddr::from(([127, 0, 0, 1], 8300));
        let bind_addr = if let Some(addr) = var("PAGECRAFT_BIND_ADDR") {
            addr.parse().unwrap_or(default_addr)
        } else if let Some(port) = var("PORT") {
            SocketAddr::from(([0, 0, 0, 0], port.parse().unwrap_or(8300)))
        } else {
            default_addr
        };

        let storage_backend = match var("PAGECRAFT_STORAGE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StorageBackendType::Postgres {
                url: var("DATABASE_URL")
                    .unwrap_or_else(|| "postgres://localhost/pagecraft".to_owned()),
            },
            _ => StorageBackendType::Memory,
        };

        let timeout_secs = var("PAGECRAFT_AI_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_AI_TIMEOUT_SECS);

        let ai = AiConfig {
            url: var("PAGECRAFT_AI_URL").unwrap_or_else(|| DEFAULT_AI_URL.to_owned()),
            api_key: var("PAGECRAFT_AI_KEY").filter(|k| !k.is_empty()),
            model: var("PAGECRAFT_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_owned()),
            timeout: Duration::from_secs(timeout_secs),
        };

        Self {
            bind_addr,
            storage_backend,
            log_level: var("PAGECRAFT_LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
            ai,
            session_tokens: var("PAGECRAFT_SESSION_TOKENS").unwrap_or_default(),
            public_url: var("PAGECRAFT_PUBLIC_URL").map(|u| u.trim_end_matches('/').to_owned()),
        }
    }
}
