//! Authorization gate.
//!
//! The read-only predicate layer command handlers call before doing
//! privileged work. Queries are answered entirely from the currently-
//! published snapshot: no I/O, no locks, no errors on the hot path.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::trace;

use paddock_core::Tag;

use crate::cache::MembershipCache;

/// Permission checks against the current membership snapshot.
#[derive(Clone)]
pub struct AuthorizationGate {
    cache: Arc<MembershipCache>,
}

impl AuthorizationGate {
    /// Creates a gate over the given cache.
    #[must_use]
    pub fn new(cache: Arc<MembershipCache>) -> Self {
        Self { cache }
    }

    /// Returns `true` if `username` may act, given the permitted tags.
    ///
    /// The username is normalized to its canonical tag and checked against
    /// each permitted tag in order: a permission list may name the user
    /// directly (self-reference), or name a group the user belongs to in
    /// the current snapshot. The first match authorizes; an empty permitted
    /// list never authorizes anyone.
    ///
    /// The whole query is evaluated against a single snapshot load, so it
    /// is safe to call concurrently with an in-progress refresh.
    #[must_use]
    pub fn is_authorized(&self, username: &str, permitted: &[Tag]) -> bool {
        let user = Tag::new(username);
        let snapshot = self.cache.snapshot();

        for tag in permitted {
            if *tag == user || snapshot.contains(tag, &user) {
                return true;
            }
        }

        trace!(user = %user, "No permitted tag matched");
        false
    }

    /// The current members of a group, as canonical user tags.
    ///
    /// Returns an empty set for unknown tags and before the first refresh
    /// has completed.
    #[must_use]
    pub fn members_of(&self, tag: &Tag) -> HashSet<Tag> {
        self.cache
            .snapshot()
            .members(tag)
            .cloned()
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate").finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use paddock_core::GroupKind;

    use crate::directory::TagDirectory;
    use crate::error::AuthResult;
    use crate::snapshot::Snapshot;
    use crate::source::MembershipSource;

    use super::*;

    struct NullSource;

    #[async_trait]
    impl MembershipSource for NullSource {
        async fn list_tags(&self, _kind: GroupKind) -> AuthResult<Vec<Tag>> {
            Ok(vec![])
        }

        async fn members(&self, _tag: &Tag, _kind: GroupKind) -> AuthResult<HashSet<String>> {
            Ok(HashSet::new())
        }
    }

    fn raw(members: &[&str]) -> HashSet<String> {
        members.iter().map(|m| m.to_string()).collect()
    }

    /// Gate over a cache seeded with a known snapshot.
    fn gate_with(entries: Vec<(Tag, HashSet<String>)>) -> AuthorizationGate {
        let cache = MembershipCache::new(
            Arc::new(NullSource),
            Arc::new(TagDirectory::default()),
        );
        cache.publish(Snapshot::build(entries));
        AuthorizationGate::new(cache)
    }

    fn sample_gate() -> AuthorizationGate {
        gate_with(vec![
            (Tag::new("areax"), raw(&["alice", "bob"])),
            (Tag::new("roley"), raw(&[])),
        ])
    }

    #[test]
    fn test_empty_permitted_list_denies() {
        let gate = sample_gate();
        assert!(!gate.is_authorized("alice", &[]));
    }

    #[test]
    fn test_self_reference_authorizes_regardless_of_snapshot() {
        let gate = gate_with(vec![]);
        assert!(gate.is_authorized("carol", &[Tag::new("carol")]));
        assert!(gate.is_authorized("Carol", &[Tag::new("@carol")]));
    }

    #[test]
    fn test_group_membership_authorizes() {
        let gate = sample_gate();
        assert!(gate.is_authorized("alice", &[Tag::new("roley"), Tag::new("areax")]));
        assert!(!gate.is_authorized("carol", &[Tag::new("roley"), Tag::new("areax")]));
    }

    #[test]
    fn test_unknown_tag_denies() {
        let gate = sample_gate();
        assert!(!gate.is_authorized("alice", &[Tag::new("ghosts")]));
    }

    #[test]
    fn test_unpopulated_cache_denies_membership_but_not_self() {
        let cache = MembershipCache::new(
            Arc::new(NullSource),
            Arc::new(TagDirectory::default()),
        );
        let gate = AuthorizationGate::new(cache);

        assert!(!gate.is_authorized("alice", &[Tag::new("areax")]));
        assert!(gate.is_authorized("alice", &[Tag::new("alice")]));
        assert!(gate.members_of(&Tag::everyone()).is_empty());
    }

    #[test]
    fn test_members_of() {
        let gate = sample_gate();
        let members = gate.members_of(&Tag::new("areax"));
        let expected: HashSet<Tag> =
            [Tag::new("alice"), Tag::new("bob")].into_iter().collect();
        assert_eq!(members, expected);
        assert!(gate.members_of(&Tag::new("ghosts")).is_empty());
    }
}
