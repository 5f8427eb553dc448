use serde_json::Value;
use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form of a label: lowercase, typographic apostrophe
/// folded to `'`, nonspacing marks (Mn) stripped after NFD, surrounding
/// whitespace trimmed.
///
/// Only ever used for equality checks; the original text is what gets shown.
#[must_use]
pub fn normalize(text: &str) -> String {
    let folded = text.to_lowercase().replace('\u{2019}', "'");
    let stripped: String = folded
        .nfd()
        .filter(|c| get_general_category(*c) != GeneralCategory::NonspacingMark)
        .collect();
    stripped.trim().to_string()
}

/// Like [`normalize`], but for raw JSON: anything that is not a string
/// normalizes to the empty string.
#[must_use]
pub fn normalize_value(value: &Value) -> String {
    value.as_str().map(normalize).unwrap_or_default()
}
