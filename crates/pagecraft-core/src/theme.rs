//! Theme resolution and derived display values.
//!
//! A page's theme is a `{mode, accentColor}` pair. Generated and legacy
//! configs may describe it in several ways (a `theme` object, an older
//! `themeColors` palette, or nothing at all); [`resolve_theme`] collapses all
//! of them into exactly one canonical [`Theme`]. Everything else in this
//! module is a pure function of a resolved theme.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ThemeError;

/// Accent used whenever no valid accent color is available.
pub const DEFAULT_ACCENT: &str = "#6366f1";

/// Accent opacity steps as `(variable name, two-digit hex alpha)`.
///
/// Alpha is `round(255 * percent / 100)` for 10, 20, 30, 40 and 50 percent.
const ACCENT_STEPS: [(&str, &str); 5] = [
    ("--accent-10", "1a"),
    ("--accent-20", "33"),
    ("--accent-30", "4d"),
    ("--accent-40", "66"),
    ("--accent-50", "80"),
];

/// Light or dark palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    White,
    Black,
}

impl ThemeMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical theme of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub mode: ThemeMode,
    /// Always a valid `#RRGGBB` string once resolved.
    pub accent_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            mode: ThemeMode::White,
            accent_color: DEFAULT_ACCENT.to_owned(),
        }
    }
}

/// The older palette format some stored configs still carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyThemeColors {
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
}

/// Collapse a raw theme description into one canonical [`Theme`].
///
/// Precedence:
/// 1. `raw_theme`, if it is a JSON object. `mode` is `black` only on an exact
///    match; the accent passes through when it is a valid hex color.
/// 2. `legacy`, using its accent color, then its primary color.
/// 3. The default white theme with [`DEFAULT_ACCENT`].
#[must_use]
pub fn resolve_theme(raw_theme: Option<&Value>, legacy: Option<&LegacyThemeColors>) -> Theme {
    if let Some(Value::Object(map)) = raw_theme {
        let mode = match map.get("mode").and_then(Value::as_str) {
            Some("black") => ThemeMode::Black,
            _ => ThemeMode::White,
        };
        let accent_color = map
            .get("accentColor")
            .and_then(Value::as_str)
            .filter(|c| is_hex_color(c))
            .unwrap_or(DEFAULT_ACCENT)
            .to_owned();
        return Theme { mode, accent_color };
    }

    if let Some(legacy) = legacy {
        let accent_color = [&legacy.accent_color, &legacy.primary_color]
            .into_iter()
            .flatten()
            .find(|c| is_hex_color(c))
            .map_or_else(|| DEFAULT_ACCENT.to_owned(), Clone::clone);
        return Theme {
            mode: ThemeMode::White,
            accent_color,
        };
    }

    Theme::default()
}

/// Whether `color` is `#` followed by exactly six hex digits.
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
}

// ── Display roles ────────────────────────────────────────────────────

/// Semantic display roles mapped to CSS class names for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeClasses {
    pub background: &'static str,
    pub surface: &'static str,
    pub muted: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub border: &'static str,
    pub muted_text: &'static str,
}

impl ThemeClasses {
    /// All seven roles as `(role, class)` pairs, in declaration order.
    #[must_use]
    pub const fn roles(&self) -> [(&'static str, &'static str); 7] {
        [
            ("background", self.background),
            ("surface", self.surface),
            ("muted", self.muted),
            ("text", self.text),
            ("textSecondary", self.text_secondary),
            ("border", self.border),
            ("mutedText", self.muted_text),
        ]
    }
}

const WHITE_CLASSES: ThemeClasses = ThemeClasses {
    background: "bg-white",
    surface: "bg-gray-50",
    muted: "bg-gray-100",
    text: "text-gray-900",
    text_secondary: "text-gray-600",
    border: "border-gray-200",
    muted_text: "text-gray-500",
};

const BLACK_CLASSES: ThemeClasses = ThemeClasses {
    background: "bg-black",
    surface: "bg-zinc-900",
    muted: "bg-zinc-800",
    text: "text-white",
    text_secondary: "text-zinc-300",
    border: "border-zinc-800",
    muted_text: "text-zinc-400",
};

/// Map a theme to its display classes. Total over both modes.
#[must_use]
pub const fn classes_for(theme: &Theme) -> ThemeClasses {
    match theme.mode {
        ThemeMode::White => WHITE_CLASSES,
        ThemeMode::Black => BLACK_CLASSES,
    }
}

// ── CSS variables ────────────────────────────────────────────────────

/// A single CSS custom property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssVariable {
    pub name: &'static str,
    pub value: String,
}

const fn base_palette(mode: ThemeMode) -> [(&'static str, &'static str); 7] {
    match mode {
        ThemeMode::White => [
            ("--background", "#ffffff"),
            ("--surface", "#f9fafb"),
            ("--muted", "#f3f4f6"),
            ("--text", "#111827"),
            ("--text-secondary", "#4b5563"),
            ("--border", "#e5e7eb"),
            ("--muted-text", "#6b7280"),
        ],
        ThemeMode::Black => [
            ("--background", "#000000"),
            ("--surface", "#18181b"),
            ("--muted", "#27272a"),
            ("--text", "#ffffff"),
            ("--text-secondary", "#d4d4d8"),
            ("--border", "#27272a"),
            ("--muted-text", "#a1a1aa"),
        ],
    }
}

/// The fixed, ordered CSS variable set for a theme: the mode's base palette,
/// `--accent`, then the accent at 10–50% opacity as 8-digit hex.
#[must_use]
pub fn css_variables_for(theme: &Theme) -> Vec<CssVariable> {
    let mut vars: Vec<CssVariable> = base_palette(theme.mode)
        .into_iter()
        .map(|(name, value)| CssVariable {
            name,
            value: value.to_owned(),
        })
        .collect();

    vars.push(CssVariable {
        name: "--accent",
        value: theme.accent_color.clone(),
    });
    vars.extend(ACCENT_STEPS.iter().map(|&(name, alpha)| CssVariable {
        name,
        value: format!("{}{alpha}", theme.accent_color),
    }));
    vars
}

/// Render the theme's variables as a `:root { ... }` rule.
#[must_use]
pub fn css_block(theme: &Theme) -> String {
    let mut css = String::from(":root{");
    for var in css_variables_for(theme) {
        css.push_str(var.name);
        css.push(':');
        css.push_str(&var.value);
        css.push(';');
    }
    css.push('}');
    css
}

/// Convert a hex color to an `rgba(r, g, b, opacity)` string.
///
/// An opacity of exactly `1` returns `color` unchanged. The leading `#` is
/// optional.
///
/// # Errors
///
/// Returns [`ThemeError::InvalidColorFormat`] unless the color is exactly six
/// hex digits.
#[allow(clippy::float_cmp)]
pub fn rgba(color: &str, opacity: f64) -> Result<String, ThemeError> {
    if opacity == 1.0 {
        return Ok(color.to_owned());
    }

    let invalid = || ThemeError::InvalidColorFormat {
        color: color.to_owned(),
    };

    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
    };
    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    Ok(format!("rgba({r}, {g}, {b}, {opacity})"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    // ── resolve_theme ────────────────────────────────────────────────

    #[test]
    fn resolve_nothing_gives_default() {
        let theme = resolve_theme(None, None);
        assert_eq!(
            theme,
            Theme {
                mode: ThemeMode::White,
                accent_color: "#6366f1".to_owned()
            }
        );
    }

    #[test]
    fn resolve_black_only_on_exact_match() {
        let black = resolve_theme(Some(&json!({"mode": "black", "accentColor": "#ff0000"})), None);
        assert_eq!(black.mode, ThemeMode::Black);
        assert_eq!(black.accent_color, "#ff0000");

        let dark = resolve_theme(Some(&json!({"mode": "dark"})), None);
        assert_eq!(dark.mode, ThemeMode::White);

        let upper = resolve_theme(Some(&json!({"mode": "Black"})), None);
        assert_eq!(upper.mode, ThemeMode::White);
    }

    #[test]
    fn resolve_missing_or_invalid_accent_uses_default() {
        let missing = resolve_theme(Some(&json!({"mode": "black"})), None);
        assert_eq!(missing.accent_color, DEFAULT_ACCENT);

        let empty = resolve_theme(Some(&json!({"accentColor": ""})), None);
        assert_eq!(empty.accent_color, DEFAULT_ACCENT);

        let bogus = resolve_theme(Some(&json!({"accentColor": "blue"})), None);
        assert_eq!(bogus.accent_color, DEFAULT_ACCENT);
    }

    #[test]
    fn resolve_theme_object_wins_over_legacy() {
        let legacy = LegacyThemeColors {
            accent_color: Some("#00ff00".to_owned()),
            ..LegacyThemeColors::default()
        };
        let theme = resolve_theme(Some(&json!({"accentColor": "#123456"})), Some(&legacy));
        assert_eq!(theme.accent_color, "#123456");
    }

    #[test]
    fn resolve_non_object_theme_falls_through_to_legacy() {
        let legacy = LegacyThemeColors {
            primary_color: Some("#0000ff".to_owned()),
            ..LegacyThemeColors::default()
        };
        let theme = resolve_theme(Some(&json!("dark")), Some(&legacy));
        assert_eq!(theme.mode, ThemeMode::White);
        assert_eq!(theme.accent_color, "#0000ff");
    }

    #[test]
    fn resolve_legacy_prefers_accent_then_primary() {
        let both = LegacyThemeColors {
            primary_color: Some("#111111".to_owned()),
            secondary_color: Some("#222222".to_owned()),
            accent_color: Some("#333333".to_owned()),
        };
        assert_eq!(resolve_theme(None, Some(&both)).accent_color, "#333333");

        let primary_only = LegacyThemeColors {
            primary_color: Some("#111111".to_owned()),
            ..LegacyThemeColors::default()
        };
        assert_eq!(resolve_theme(None, Some(&primary_only)).accent_color, "#111111");

        assert_eq!(
            resolve_theme(None, Some(&LegacyThemeColors::default())).accent_color,
            DEFAULT_ACCENT
        );
    }

    // ── classes_for ──────────────────────────────────────────────────

    #[test]
    fn classes_complete_for_both_modes() {
        for mode in [ThemeMode::White, ThemeMode::Black] {
            let theme = Theme {
                mode,
                accent_color: DEFAULT_ACCENT.to_owned(),
            };
            let roles = classes_for(&theme).roles();
            assert_eq!(roles.len(), 7);
            assert!(roles.iter().all(|(_, class)| !class.is_empty()), "{mode}");
        }
    }

    #[test]
    fn classes_differ_between_modes() {
        let white = classes_for(&Theme::default());
        let black = classes_for(&Theme {
            mode: ThemeMode::Black,
            accent_color: DEFAULT_ACCENT.to_owned(),
        });
        assert_ne!(white.background, black.background);
    }

    // ── css variables ────────────────────────────────────────────────

    #[test]
    fn css_variables_include_accent_steps_in_order() {
        let theme = Theme {
            mode: ThemeMode::White,
            accent_color: "#ff8800".to_owned(),
        };
        let vars = css_variables_for(&theme);
        assert_eq!(vars.len(), 13);

        let tail: Vec<(&str, &str)> = vars[7..]
            .iter()
            .map(|v| (v.name, v.value.as_str()))
            .collect();
        assert_eq!(
            tail,
            vec![
                ("--accent", "#ff8800"),
                ("--accent-10", "#ff88001a"),
                ("--accent-20", "#ff880033"),
                ("--accent-30", "#ff88004d"),
                ("--accent-40", "#ff880066"),
                ("--accent-50", "#ff880080"),
            ]
        );
    }

    #[test]
    fn css_block_is_root_rule() {
        let css = css_block(&Theme::default());
        assert!(css.starts_with(":root{"));
        assert!(css.contains("--accent:#6366f1;"));
        assert!(css.ends_with('}'));
    }

    // ── rgba ─────────────────────────────────────────────────────────

    #[test]
    fn rgba_converts_hex() {
        assert_eq!(rgba("#ffffff", 0.5).unwrap(), "rgba(255, 255, 255, 0.5)");
        assert_eq!(rgba("6366f1", 0.25).unwrap(), "rgba(99, 102, 241, 0.25)");
    }

    #[test]
    fn rgba_full_opacity_returns_input() {
        assert_eq!(rgba("#abcdef", 1.0).unwrap(), "#abcdef");
    }

    #[test]
    fn rgba_rejects_malformed() {
        for bad in ["#fff", "#gggggg", "", "#1234567", "#ffé"] {
            let err = rgba(bad, 0.5).unwrap_err();
            assert!(matches!(err, ThemeError::InvalidColorFormat { .. }), "{bad}");
        }
    }

    #[test]
    fn hex_color_validation() {
        assert!(is_hex_color("#AbCdEf"));
        assert!(!is_hex_color("abcdef"));
        assert!(!is_hex_color("#abc"));
    }
}
