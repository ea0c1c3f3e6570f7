//! Name canonicalization
//!
//! Retailer catalogs disagree on casing, punctuation, and whitespace for
//! the same title. Every cross-catalog comparison goes through
//! [`normalize`] first; two raw names refer to the same product exactly
//! when their canonical forms are equal. There is no fuzzy tolerance.

/// Canonicalized name used as the join key between catalogs.
pub type NameKey = String;

/// Canonicalizes a raw product name.
///
/// Collapses any run of whitespace to a single space, trims leading and
/// trailing whitespace, and case-folds. Idempotent:
/// `normalize(normalize(x)) == normalize(x)` for all `x`.
pub fn normalize(raw: &str) -> NameKey {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Stricter canonicalization that also strips punctuation.
///
/// Keeps alphanumerics, underscores, and whitespace, then applies the same
/// collapse/trim/case-fold as [`normalize`]. Lossy ("Part 1: Redux" and
/// "Part 1 Redux" collide), so it is exposed separately and is never the
/// default join key.
pub fn normalize_strict(raw: &str) -> NameKey {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    normalize(&stripped)
}
