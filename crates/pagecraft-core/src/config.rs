//! Landing-page config model.
//!
//! A [`LandingPageConfig`] is the JSON document the AI produces and the
//! renderer consumes. Only `hero` and `features` are required; every other
//! section is optional. [`normalize`] is the single entry point from raw JSON:
//! it checks the required sections, collapses `theme`/`themeColors` into one
//! canonical [`Theme`], canonicalizes the section order and drops stale
//! headline highlights.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::highlight::cleanup_highlights;
use crate::theme::{LegacyThemeColors, Theme, resolve_theme};

/// Identifier of a renderable page section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Hero,
    Problem,
    SocialProof,
    Features,
    Guarantees,
    Faq,
    Cta,
}

impl SectionId {
    /// Render order used when a config does not say otherwise.
    pub const DEFAULT_ORDER: [Self; 7] = [
        Self::Hero,
        Self::Problem,
        Self::SocialProof,
        Self::Features,
        Self::Guarantees,
        Self::Faq,
        Self::Cta,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Problem => "problem",
            Self::SocialProof => "socialProof",
            Self::Features => "features",
            Self::Guarantees => "guarantees",
            Self::Faq => "faq",
            Self::Cta => "cta",
        }
    }

    /// Parse a section identifier. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::DEFAULT_ORDER.into_iter().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Sections ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Business {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    #[serde(deserialize_with = "lenient_text")]
    pub headline: String,
    #[serde(deserialize_with = "lenient_words")]
    pub headline_highlights: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub subheadline: String,
    /// Call-to-action button label.
    #[serde(deserialize_with = "lenient_text")]
    pub cta: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub hero_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub hero_tag_icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PainPoint {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProblemSection {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub pain_points: Vec<PainPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(deserialize_with = "lenient_text")]
    pub quote: String,
    #[serde(deserialize_with = "lenient_text")]
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stat {
    /// Generated stats are sometimes bare numbers.
    #[serde(deserialize_with = "lenient_text")]
    pub value: String,
    #[serde(deserialize_with = "lenient_text")]
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialProof {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub testimonials: Vec<Testimonial>,
    #[serde(deserialize_with = "lenient_list")]
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Feature {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub benefit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guarantee {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Guarantees {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<Guarantee>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqItem {
    #[serde(deserialize_with = "lenient_text")]
    pub question: String,
    #[serde(deserialize_with = "lenient_text")]
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Faq {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub subtitle: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub items: Vec<FaqItem>,
}

// ── Lenient field readers ────────────────────────────────────────────
//
// Generated configs are loosely typed. Past the required `hero` and
// `features`, a value of the wrong type falls back to the field's default
// instead of failing the whole document.

/// Text field: strings as-is, numbers and booleans printed, anything else empty.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_opt_text(deserializer)?.unwrap_or_default())
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// List of words: non-string entries are skipped, a non-array is empty.
fn lenient_words<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// List of records: entries that are not objects are dropped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().filter_map(object_as).collect())
}

/// Optional section: `null` is absent, a value of the wrong shape is dropped.
fn lenient_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => Ok(object_as(value)),
    }
}

fn object_as<T: DeserializeOwned>(value: Value) -> Option<T> {
    if !value.is_object() {
        tracing::warn!(found = json_kind(&value), "dropping config entry that is not an object");
        return None;
    }
    serde_json::from_value(value)
        .map_err(|e| tracing::warn!(error = %e, "dropping unreadable config entry"))
        .ok()
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Config ───────────────────────────────────────────────────────────

/// The normalized configuration of one landing page.
///
/// Instances built through [`normalize`] always carry a resolved theme and a
/// complete `section_order` containing every [`SectionId`] exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_section")]
    pub business: Option<Business>,
    pub hero: Hero,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_section")]
    pub problem_section: Option<ProblemSection>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_section")]
    pub social_proof: Option<SocialProof>,
    #[serde(deserialize_with = "lenient_list")]
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_section")]
    pub guarantees: Option<Guarantees>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_section")]
    pub faq: Option<Faq>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub cta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub cta_subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_opt_text")]
    pub urgency: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub section_order: Vec<SectionId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_sections: Vec<SectionId>,
}

impl LandingPageConfig {
    /// Sections to render, in order, without the hidden ones.
    #[must_use]
    pub fn visible_sections(&self) -> Vec<SectionId> {
        self.section_order
            .iter()
            .copied()
            .filter(|s| !self.hidden_sections.contains(s))
            .collect()
    }

    #[must_use]
    pub fn is_hidden(&self, section: SectionId) -> bool {
        self.hidden_sections.contains(&section)
    }

    /// A human-readable page title: the business name, else the headline.
    #[must_use]
    pub fn title(&self) -> &str {
        self.business
            .as_ref()
            .map(|b| b.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.hero.headline.trim())
    }

    /// Serialize back to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if serialization fails.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })
    }
}

/// Validate and normalize a raw config document.
///
/// - `hero` must be an object and `features` an array.
/// - `theme` and the legacy `themeColors` collapse into one [`Theme`];
///   `themeColors` is not kept.
/// - Unknown names in `sectionOrder` and `hiddenSections` are dropped,
///   duplicates removed, and sections missing from the order appended in
///   [`SectionId::DEFAULT_ORDER`].
/// - `hero.headlineHighlights` keeps only words still present in the headline.
/// - Text fields set to `null` read as empty. An optional section or list
///   entry of the wrong shape is dropped with a warning.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when a required section is absent or
/// has the wrong JSON type, and [`ConfigError::Malformed`] when the document
/// is not an object.
pub fn normalize(raw: Value) -> Result<LandingPageConfig, ConfigError> {
    let Value::Object(mut map) = raw else {
        return Err(ConfigError::Malformed {
            reason: "config must be a JSON object".to_owned(),
        });
    };

    if !map.get("hero").is_some_and(Value::is_object) {
        return Err(ConfigError::MissingField { field: "hero" });
    }
    if !map.get("features").is_some_and(Value::is_array) {
        return Err(ConfigError::MissingField { field: "features" });
    }

    let legacy = map
        .remove("themeColors")
        .and_then(|v| serde_json::from_value::<LegacyThemeColors>(v).ok());
    let raw_theme = map.remove("theme");
    let theme = resolve_theme(raw_theme.as_ref(), legacy.as_ref());

    let order = section_list(&mut map, "sectionOrder");
    let hidden = section_list(&mut map, "hiddenSections");

    let mut config: LandingPageConfig =
        serde_json::from_value(Value::Object(map)).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })?;

    config.theme = theme;
    config.section_order = complete_order(order);
    config.hidden_sections = hidden;
    config.hero.headline_highlights =
        cleanup_highlights(&config.hero.headline_highlights, &config.hero.headline);

    Ok(config)
}

/// Take a section-id list out of `map`, keeping known ids once each.
fn section_list(map: &mut Map<String, Value>, key: &str) -> Vec<SectionId> {
    let mut sections = Vec::new();
    if let Some(Value::Array(items)) = map.remove(key) {
        for id in items.iter().filter_map(Value::as_str).filter_map(SectionId::parse) {
            if !sections.contains(&id) {
                sections.push(id);
            }
        }
    }
    sections
}

fn complete_order(mut order: Vec<SectionId>) -> Vec<SectionId> {
    for section in SectionId::DEFAULT_ORDER {
        if !order.contains(&section) {
            order.push(section);
        }
    }
    order
}
