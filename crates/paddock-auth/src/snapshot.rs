//! Immutable membership snapshots.
//!
//! A snapshot maps every directory tag, plus the synthetic `@everyone`
//! group, to its current member set. Snapshots are built in one shot by a
//! refresh cycle and never edited afterward; publication happens by
//! swapping the whole snapshot behind an atomic pointer.

use std::collections::{HashMap, HashSet};

use paddock_core::Tag;

/// One complete, immutable view of group membership.
///
/// Member sets store canonical user tags (`@alice`), normalized from
/// whatever raw form the membership store returned, so authorization checks
/// reduce to set lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    groups: HashMap<Tag, HashSet<Tag>>,
}

impl Snapshot {
    /// An empty snapshot, as published before the first refresh completes.
    ///
    /// Queries against it authorize no one and list no members.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from per-group raw member sets.
    ///
    /// Members are normalized to canonical tags, and `@everyone` is derived
    /// as the union of all entries. It is never fetched independently.
    #[must_use]
    pub fn build(entries: impl IntoIterator<Item = (Tag, HashSet<String>)>) -> Self {
        let mut groups: HashMap<Tag, HashSet<Tag>> = entries
            .into_iter()
            .map(|(tag, members)| (tag, members.iter().map(Tag::new).collect()))
            .collect();

        let everyone: HashSet<Tag> = groups.values().flatten().cloned().collect();
        groups.insert(Tag::everyone(), everyone);

        Self { groups }
    }

    /// The member set of a group, if the group is known.
    #[must_use]
    pub fn members(&self, tag: &Tag) -> Option<&HashSet<Tag>> {
        self.groups.get(tag)
    }

    /// Returns `true` if `user` is a member of the group `tag`.
    ///
    /// Unknown groups contain no one.
    #[must_use]
    pub fn contains(&self, tag: &Tag, user: &Tag) -> bool {
        self.groups.get(tag).is_some_and(|members| members.contains(user))
    }

    /// Iterates the tags present in this snapshot (including `@everyone`).
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.groups.keys()
    }

    /// Number of groups in this snapshot (including `@everyone`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` for the pre-first-refresh empty snapshot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(members: &[&str]) -> HashSet<String> {
        members.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_everyone_is_union_of_all_groups() {
        let snapshot = Snapshot::build([
            (Tag::new("eng"), raw(&["alice", "bob"])),
            (Tag::new("aero"), raw(&["bob", "carol"])),
            (Tag::new("board"), raw(&[])),
        ]);

        let everyone = snapshot.members(&Tag::everyone()).unwrap();
        let expected: HashSet<Tag> = [Tag::new("alice"), Tag::new("bob"), Tag::new("carol")]
            .into_iter()
            .collect();
        assert_eq!(everyone, &expected);
    }

    #[test]
    fn test_members_are_normalized() {
        let snapshot = Snapshot::build([(Tag::new("eng"), raw(&["@Alice", "BOB "]))]);
        assert!(snapshot.contains(&Tag::new("eng"), &Tag::new("alice")));
        assert!(snapshot.contains(&Tag::new("eng"), &Tag::new("@bob")));
    }

    #[test]
    fn test_keys_are_entries_plus_everyone() {
        let snapshot = Snapshot::build([
            (Tag::new("eng"), raw(&["alice"])),
            (Tag::new("aero"), raw(&[])),
        ]);
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.members(&Tag::new("aero")).unwrap().is_empty());
        assert!(snapshot.members(&Tag::new("missing")).is_none());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.members(&Tag::everyone()).is_none());
        assert!(!snapshot.contains(&Tag::new("eng"), &Tag::new("alice")));
    }

    #[test]
    fn test_build_with_no_groups_still_has_empty_everyone() {
        let snapshot = Snapshot::build(Vec::<(Tag, HashSet<String>)>::new());
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.members(&Tag::everyone()).unwrap().is_empty());
    }
}
