//! AI config generation.
//!
//! [`PageGenerator`] turns a free-text product description into a normalized
//! [`LandingPageConfig`] by asking a [`TextGenerator`] for a JSON document.
//! Generation is single-shot: a failure is reported with retry guidance and
//! the caller decides whether to ask again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{LandingPageConfig, normalize};
use crate::error::GenerationError;
use crate::highlight::suggest_highlights;

/// Instructions sent with every generation request.
pub const SYSTEM_PROMPT: &str = r##"You write conversion-focused landing pages.
Reply with a single JSON object and nothing else. Use this shape (camelCase keys):
{
  "business": {"name": string},
  "hero": {"headline": string, "headlineHighlights": [string], "subheadline": string, "cta": string, "heroTag": string},
  "problemSection": {"title": string, "subtitle": string, "painPoints": [{"title": string, "description": string, "icon": string}]},
  "socialProof": {"title": string, "testimonials": [{"quote": string, "author": string, "role": string}], "stats": [{"value": string, "label": string}]},
  "features": [{"title": string, "description": string, "icon": string, "benefit": string}],
  "guarantees": {"title": string, "items": [{"title": string, "description": string, "icon": string}]},
  "faq": {"title": string, "items": [{"question": string, "answer": string}]},
  "ctaTitle": string, "ctaSubtitle": string, "urgency": string,
  "theme": {"mode": "white" | "black", "accentColor": "#RRGGBB"},
  "sectionOrder": ["hero", "problem", "socialProof", "features", "guarantees", "faq", "cta"]
}
"hero" and "features" are required. "headlineHighlights" must be up to three words copied exactly from the headline."##;

/// A single prompt-in, text-out call to an external model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` under the given system instructions.
    ///
    /// # Errors
    ///
    /// Implementations return [`GenerationError::Failed`] for transport
    /// errors, timeouts, and non-success responses.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Generates landing-page configs from prompts.
#[derive(Clone)]
pub struct PageGenerator {
    backend: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for PageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageGenerator").finish_non_exhaustive()
    }
}

impl PageGenerator {
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    /// Generate a normalized config for `prompt`.
    ///
    /// When the reply carries no usable headline highlights, up to three are
    /// suggested from the headline.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyPrompt`] for a blank prompt and
    /// [`GenerationError::Failed`] if the call fails or the reply is not a
    /// JSON object with `hero` and `features`.
    pub async fn generate(&self, prompt: &str) -> Result<LandingPageConfig, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }

        let reply = self.backend.complete(SYSTEM_PROMPT, prompt).await?;

        let raw = extract_json(&reply).ok_or_else(|| {
            tracing::warn!(reply_len = reply.len(), "generation reply was not a JSON object");
            GenerationError::Failed {
                detail: "the AI response was not valid JSON".to_owned(),
            }
        })?;

        let mut config = normalize(raw).map_err(|e| {
            tracing::warn!(error = %e, "generated config rejected");
            GenerationError::from(e)
        })?;

        if config.hero.headline_highlights.is_empty() {
            config.hero.headline_highlights = suggest_highlights(&config.hero.headline);
        }

        tracing::info!(
            features = config.features.len(),
            highlights = config.hero.headline_highlights.len(),
            "landing page config generated"
        );
        Ok(config)
    }
}

/// Pull a JSON object out of a model reply.
///
/// Accepts a bare object, or an object wrapped in prose or a Markdown code
/// fence (first `{` through last `}`).
#[must_use]
pub fn extract_json(reply: &str) -> Option<Value> {
    let trimmed = reply.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{GenerationError, TextGenerator, async_trait};

    /// Replays canned replies in order; `Err` entries simulate transport
    /// failures.
    pub(crate) struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, String>>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn new(mut replies: Vec<Result<String, String>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
            }
        }

        pub(crate) fn ok(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_owned())])
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
            #[allow(clippy::unwrap_used)]
            let next = self.replies.lock().unwrap().pop();
            match next {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(detail)) => Err(GenerationError::Failed { detail }),
                None => Err(GenerationError::Failed {
                    detail: "no scripted reply left".to_owned(),
                }),
            }
        }
    }
}
