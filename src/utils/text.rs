//! Case-insensitive text matching
//!
//! Every catalog comparison (pest names in filenames, pesticide targets,
//! crop cross-references) goes through these two helpers so they all agree
//! on what "case-insensitive" means: full Unicode lowercasing.

/// True if `needle` occurs in `haystack`, ignoring case.
///
/// An empty needle matches everything, like `str::contains`. Callers that
/// treat empty input as "no match" check for that themselves.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True if both strings are equal after lowercasing.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
