//! Slug generation from post titles

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9_\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s_-]+").unwrap();
}

/// Derive a URL-safe slug from a title.
///
/// Lower-cases the title, drops everything except ASCII word characters,
/// whitespace and hyphens, collapses separator runs into a single hyphen and
/// trims hyphens from both ends. The result is not guaranteed to be unique
/// and may be empty (e.g. for all-symbol titles).
pub fn generate_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lower, "");
    let joined = SEPARATORS.replace_all(&stripped, "-");
    joined.trim_matches('-').to_string()
}
