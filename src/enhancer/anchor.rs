use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STRIP_REGEX: Regex = Regex::new(r"[^A-Za-z0-9_\s-]").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Used when a heading's text has no word characters at all
pub const FALLBACK_ID: &str = "section";

/// Derive an anchor id from heading text.
///
/// Lowercases, drops everything that is not an ASCII word character
/// (`[A-Za-z0-9_]`), whitespace or `-`, then turns each whitespace run into
/// a single `-`. Identical text always gives the identical id; duplicates
/// are not disambiguated.
pub fn derive_id(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = STRIP_REGEX.replace_all(&lowered, "");
    let id = WHITESPACE_REGEX.replace_all(&stripped, "-").into_owned();
    if id.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        id
    }
}
