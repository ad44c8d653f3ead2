//! # Name Normalization Module
//!
//! ## Purpose
//! Canonicalizes free-text identifiers (collection names, section names)
//! into matching keys so that lookups tolerate case, whitespace, hyphen,
//! apostrophe, and diacritic variation in requests and in the source data.
//!
//! ## Input/Output Specification
//! - **Input**: Raw name text (English or Arabic)
//! - **Output**: Lowercased, diacritic-free key with collapsed separators
//!
//! All endpoints use [`NormalizeMode::Strict`] except the flattened-hadith
//! listing, which uses [`NormalizeMode::Loose`] so that spellings like
//! "D'An", "Dan", and "D-An" resolve to the same collection.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Normalization strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeMode {
    /// Keep a single `-` between words: `"Sahih  Al-Bukhari"` → `"sahih-al-bukhari"`.
    Strict,
    /// Additionally drop apostrophes and all separators: `"D'An"` → `"dan"`.
    Loose,
}

fn separator_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-]+").unwrap())
}

/// Canonicalize `text` into a lookup key.
///
/// Applies NFKD decomposition and drops combining marks, so accented and
/// unaccented spellings (and Arabic with or without harakat) produce the
/// same key.
pub fn normalize(text: &str, mode: NormalizeMode) -> String {
    let stripped: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    let key = separator_run()
        .replace_all(stripped.trim(), "-")
        .into_owned();

    match mode {
        NormalizeMode::Strict => key,
        NormalizeMode::Loose => key.replace(['\'', '\u{2019}', '-'], ""),
    }
}
