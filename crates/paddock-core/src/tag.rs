//! Canonical tag identifiers and membership group kinds.
//!
//! Every membership group and every user handle in the system is addressed
//! by a [`Tag`]: a lowercase, `@`-prefixed token (`@eng`, `@alice`). Tags
//! are the keys of every membership snapshot, the entries of permission
//! lists, and the self-identifiers users are matched against. Normalizing
//! once at construction means the rest of the system compares tags with
//! plain equality.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The synthetic group containing every known member.
const EVERYONE: &str = "@everyone";

/// A canonical group or user identifier.
///
/// Construction normalizes the raw token: surrounding whitespace is trimmed,
/// the token is lowercased, and exactly one leading `@` is applied. Two tags
/// built from `"ENG"`, `"@eng"` and `" @Eng "` are therefore equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag from a raw token, normalizing it to canonical form.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        let bare = raw.as_ref().trim().trim_start_matches('@').to_lowercase();
        Self(format!("@{bare}"))
    }

    /// The synthetic `@everyone` tag, derived as the union of all groups.
    #[must_use]
    pub fn everyone() -> Self {
        Self(EVERYONE.to_string())
    }

    /// Returns `true` if this is the synthetic `@everyone` tag.
    #[must_use]
    pub fn is_everyone(&self) -> bool {
        self.0 == EVERYONE
    }

    /// The canonical form, including the `@` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token without its `@` prefix, as remote stores expect it.
    #[must_use]
    pub fn bare(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Tag::new(raw))
    }
}

/// The kind of a membership group.
///
/// Each kind maps to its own table in the membership store, so resolving a
/// tag always needs the pair of tag and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Area,
    Workgroup,
    Project,
    Role,
}

impl GroupKind {
    /// All kinds, in the order they are enumerated at startup.
    pub const ALL: [GroupKind; 4] = [
        GroupKind::Area,
        GroupKind::Workgroup,
        GroupKind::Project,
        GroupKind::Role,
    ];

    /// Lowercase name used in logs and configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Area => "area",
            GroupKind::Workgroup => "workgroup",
            GroupKind::Project => "project",
            GroupKind::Role => "role",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_normalization() {
        assert_eq!(Tag::new("eng").as_str(), "@eng");
        assert_eq!(Tag::new("@eng").as_str(), "@eng");
        assert_eq!(Tag::new(" @ENG ").as_str(), "@eng");
        assert_eq!(Tag::new("Sw-Team").as_str(), "@sw-team");
    }

    #[test]
    fn test_tag_equality_after_normalization() {
        assert_eq!(Tag::new("ENG"), Tag::new("@eng"));
        assert_ne!(Tag::new("eng"), Tag::new("ops"));
    }

    #[test]
    fn test_tag_bare() {
        assert_eq!(Tag::new("@eng").bare(), "eng");
        assert_eq!(Tag::everyone().bare(), "everyone");
    }

    #[test]
    fn test_everyone() {
        let everyone = Tag::everyone();
        assert!(everyone.is_everyone());
        assert_eq!(everyone, Tag::new("everyone"));
        assert!(!Tag::new("eng").is_everyone());
    }

    #[test]
    fn test_tag_serde_normalizes_on_deserialize() {
        let tag: Tag = serde_json::from_str("\"@ENG\"").unwrap();
        assert_eq!(tag.as_str(), "@eng");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"@eng\"");
    }

    #[test]
    fn test_group_kind_names() {
        assert_eq!(GroupKind::Area.as_str(), "area");
        assert_eq!(GroupKind::Workgroup.to_string(), "workgroup");
        assert_eq!(GroupKind::ALL.len(), 4);
    }
}
