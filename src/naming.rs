//! Block and object name handling.
//!
//! World exporters and hosts append `.001`-style suffixes when names collide.
//! The swap engine works on the canonical name with those suffixes removed.

/// Strip a trailing `.NNN` duplication suffix.
///
/// Only a final all-digit segment is removed; other `.`-separated segments
/// are kept. Names without a numeric suffix come back unchanged.
pub fn canonical_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, suffix)) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
            base
        }
        _ => name,
    }
}

/// Name of variant `index` of a library asset: `name` for 0, else `name.index`.
pub fn variant_name(name: &str, index: u32) -> String {
    if index == 0 {
        name.to_string()
    } else {
        format!("{}.{}", name, index)
    }
}

/// First free host-style name: `base`, then `base.001`, `base.002`, ...
pub fn unique_name(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    (1u32..)
        .map(|n| format!("{}.{:03}", base, n))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
