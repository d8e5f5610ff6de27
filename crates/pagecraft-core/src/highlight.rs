//! Headline highlight words.
//!
//! A highlight is a word in the hero headline that the renderer emphasises
//! with the accent color. Suggestions come from a keyword-similarity
//! heuristic; the owner can then toggle words on and off, and stale entries
//! are dropped whenever the headline text changes.

/// Maximum number of suggested highlights.
pub const MAX_SUGGESTIONS: usize = 3;

/// Impact words that make a headline token worth emphasising.
const IMPACT_KEYWORDS: [&str; 20] = [
    "AI",
    "Smart",
    "Fast",
    "Best",
    "Innovative",
    "Powerful",
    "Easy",
    "Simple",
    "Secure",
    "Instant",
    "Ultimate",
    "Premium",
    "Modern",
    "Revolutionary",
    "Reliable",
    "Automated",
    "Seamless",
    "Free",
    "Proven",
    "Trusted",
];

/// Keep only word characters (alphanumerics and `_`).
pub(crate) fn strip_non_word(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Keep word characters and whitespace, dropping punctuation.
fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

fn matches_keyword(cleaned: &str) -> bool {
    let lower = cleaned.to_lowercase();
    IMPACT_KEYWORDS.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        lower.contains(&keyword) || keyword.contains(&lower)
    })
}

fn is_exact_keyword(cleaned: &str) -> bool {
    IMPACT_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(cleaned))
}

/// Propose up to [`MAX_SUGGESTIONS`] words from `text` to highlight.
///
/// A token qualifies when it case-insensitively overlaps an impact keyword
/// (either contains it or is contained by it) and is longer than two
/// characters, or is itself a keyword (`AI`). Order is first appearance;
/// duplicates are dropped.
#[must_use]
pub fn suggest_highlights(text: &str) -> Vec<String> {
    let mut picked: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let cleaned = strip_non_word(token);
        if cleaned.is_empty() {
            continue;
        }
        let long_enough = cleaned.chars().count() > 2 || is_exact_keyword(&cleaned);
        if long_enough && matches_keyword(&cleaned) && !picked.contains(&cleaned) {
            picked.push(cleaned);
            if picked.len() == MAX_SUGGESTIONS {
                break;
            }
        }
    }
    picked
}

/// Add `word` to the highlights, or remove it if already present.
///
/// The word is trimmed first; a blank word leaves the set unchanged. Removal
/// keeps the order of the remaining entries; additions go at the end.
#[must_use]
pub fn toggle_highlight(word: &str, current: &[String]) -> Vec<String> {
    let word = word.trim();
    if word.is_empty() {
        return current.to_vec();
    }

    if current.iter().any(|h| h == word) {
        current.iter().filter(|h| *h != word).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(word.to_owned());
        next
    }
}

/// Whether `word` appears anywhere in `text`, ignoring case and punctuation.
#[must_use]
pub fn is_word_in_text(word: &str, text: &str) -> bool {
    let word = strip_punctuation(word).trim().to_lowercase();
    if word.is_empty() {
        return false;
    }
    strip_punctuation(text).to_lowercase().contains(&word)
}

/// Drop highlights that no longer match a whole token of `text`.
///
/// Stricter than [`is_word_in_text`]: each highlight must exactly equal a
/// punctuation-stripped, whitespace-delimited token (case-sensitive).
#[must_use]
pub fn cleanup_highlights(highlights: &[String], text: &str) -> Vec<String> {
    let tokens: Vec<String> = text.split_whitespace().map(strip_non_word).collect();
    highlights
        .iter()
        .filter(|h| tokens.iter().any(|t| t == *h))
        .cloned()
        .collect()
}
