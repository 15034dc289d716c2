//! Filename sanitization for conversion output.
//!
//! Destination names are derived from the candidate's base name: Cyrillic
//! characters are transliterated, everything outside ASCII alphanumerics is
//! stripped, and the result is lower-cased. Collisions with existing files
//! resolve by appending an incrementing numeric suffix.

use std::path::{Path, PathBuf};

/// Placeholder stem used when sanitization strips every character.
pub const FALLBACK_STEM: &str = "untitled";

// Paired alphabets: the n-th character of CYRILLIC maps to the n-th of LATIN.
const CYRILLIC: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюяАБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";
const LATIN: &str = "abvgdeejzijklmnoprstufhzcss_y_euaABVGDEEJZIJKLMNOPRSTUFHZCSS_Y_EUA";

/// Replaces Cyrillic characters with their Latin renderings.
///
/// Characters outside the map pass through unchanged.
pub fn transliterate(text: &str) -> String {
    text.chars()
        .map(|c| match CYRILLIC.chars().position(|m| m == c) {
            Some(idx) => LATIN.chars().nth(idx).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Derives a filesystem-safe stem from a candidate's base name.
///
/// Transliterates, keeps ASCII alphanumerics only, lower-cases. Falls back
/// to [`FALLBACK_STEM`] when nothing survives.
pub fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = transliterate(stem)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned.to_lowercase()
    }
}

/// Resolves a destination path for `stem` inside `dir` that does not collide
/// with any existing file.
///
/// The first candidate is `<stem>.<extension>`; collisions append `_<n>`
/// starting at 1. The placeholder stem appends the counter directly.
pub fn unique_destination(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{}.{}", stem, extension));
    let mut counter = 1u32;

    while candidate.exists() {
        let name = if stem == FALLBACK_STEM {
            format!("{}{}.{}", stem, counter, extension)
        } else {
            format!("{}_{}.{}", stem, counter, extension)
        };
        candidate = dir.join(name);
        counter += 1;
    }

    candidate
}
