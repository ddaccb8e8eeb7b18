//! Membership source trait.
//!
//! Defines the interface to the external system of record for group
//! membership. The production implementation queries NocoDB; tests supply
//! scripted in-memory sources.

use std::collections::HashSet;

use async_trait::async_trait;

use paddock_core::{GroupKind, Tag};

use crate::error::AuthResult;

/// Read access to the external membership store.
///
/// Both operations are network calls and may fail or time out; callers
/// decide whether a failure is fatal (directory bootstrap) or recoverable
/// (snapshot refresh).
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// Lists every known tag of the given kind.
    ///
    /// Used once per kind at startup to populate the tag directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or returns a
    /// malformed response.
    async fn list_tags(&self, kind: GroupKind) -> AuthResult<Vec<Tag>>;

    /// Resolves the current members of one group.
    ///
    /// Returns raw usernames as stored in the membership store; an empty
    /// set is a valid result for a group with no members. Called once per
    /// directory entry per refresh cycle, concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached, the tag is unknown,
    /// or the response is malformed.
    async fn members(&self, tag: &Tag, kind: GroupKind) -> AuthResult<HashSet<String>>;
}
