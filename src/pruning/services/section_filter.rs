use std::collections::HashSet;

use crate::pruning::domain::DepKey;

/// The bare package name of a raw declaration string, lower-cased.
///
/// Stops at the first character that cannot be part of a package name
/// (extras bracket, operator, locator separator, marker, whitespace).
/// Returns `None` when the string has no leading name at all.
pub fn requirement_name(raw: &str) -> Option<String> {
    let name: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

/// Whether a raw section entry survives filtering under its section's
/// group/extra context.
///
/// The entry is kept iff the parsed name combined with the context forms a
/// key in the retained set. Entries whose name cannot be parsed pass
/// through untouched rather than being silently dropped; callers filter in
/// place, preserving declaration order and string formatting.
pub fn keeps(
    raw: &str,
    group: Option<&str>,
    extra: Option<&str>,
    kept: &HashSet<DepKey>,
) -> bool {
    match requirement_name(raw) {
        Some(name) => kept.contains(&DepKey::with_context(&name, group, extra)),
        None => true,
    }
}
