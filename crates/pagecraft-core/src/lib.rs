//! Core library for Pagecraft.
//!
//! Contains the landing-page config model, theme resolution, headline
//! highlight extraction, AI config generation, page management, server-side
//! rendering, and visitor interaction capture. This crate depends on
//! `pagecraft-storage` for the repository trait and knows nothing about HTTP
//! or any particular AI provider.

pub mod capture;
pub mod config;
pub mod error;
pub mod generator;
pub mod highlight;
pub mod pages;
pub mod render;
pub mod theme;

pub use capture::{EventSubmission, EventType, InteractionCapture, LeadSubmission, hash_ip};
pub use config::{LandingPageConfig, SectionId, normalize};
pub use error::{CaptureError, ConfigError, GenerationError, PageError, RETRY_GUIDANCE, ThemeError};
pub use generator::{PageGenerator, TextGenerator};
pub use pages::{OwnerId, Page, PageService, PageStats};
pub use render::render_page;
pub use theme::{Theme, ThemeMode, classes_for, css_variables_for, resolve_theme, rgba};
