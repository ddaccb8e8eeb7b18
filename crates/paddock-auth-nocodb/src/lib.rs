//! # paddock-auth-nocodb
//!
//! NocoDB-backed [`MembershipSource`](paddock_auth::MembershipSource)
//! implementation, plus the identity mapping (chat username ↔ team email)
//! command handlers use outside the authorization core.
//!
//! Membership lives in four linked NocoDB tables (areas, workgroups,
//! projects, roles) plus a members table carrying each person's chat
//! username and team email. Resolving a group walks three requests: find
//! the group record by tag, list its linked member record ids, then fetch
//! those member records projected to the username column.

pub mod client;
pub mod config;

pub use client::NocoClient;
pub use config::{NocoConfig, TableIds, TableMap};

use paddock_core::Tag;

/// Errors that can occur while querying NocoDB.
#[derive(Debug, thiserror::Error)]
pub enum NocoError {
    /// A network error occurred while reaching the instance.
    #[error("Network error: {0}")]
    Network(String),

    /// The request returned a non-success status code.
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// The response body could not be parsed.
    #[error("Failed to parse NocoDB response: {0}")]
    Parse(String),

    /// The tag has no record in its kind's table.
    #[error("Unknown tag: {0}")]
    UnknownTag(Tag),
}

/// Result type for NocoDB operations.
pub type NocoResult<T> = Result<T, NocoError>;
