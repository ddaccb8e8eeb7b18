//! Mention scanning for free-form message text.
//!
//! Messages may reference any number of tags (`ping @eng and @aero`).
//! Handlers extract the candidate tags here and match them against the tag
//! directory; anything that does not resolve to a known group is ignored
//! downstream.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::tag::Tag;

static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[\w.-]+").expect("Invalid mention regex"));

/// Extracts all `@`-mentions from `text` as canonical tags.
///
/// Mentions are matched case-insensitively, normalized, and deduplicated
/// while preserving first-occurrence order.
#[must_use]
pub fn extract_mentions(text: &str) -> Vec<Tag> {
    let mut seen = HashSet::new();
    MENTION_REGEX
        .find_iter(text)
        .map(|m| Tag::new(m.as_str()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
