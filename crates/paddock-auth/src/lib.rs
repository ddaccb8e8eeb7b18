//! # paddock-auth
//!
//! Membership authorization core for paddock-bot.
//!
//! Group membership lives in a slow, rate-limited external store, but
//! authorization checks sit on the hot path of every privileged command.
//! This crate bridges the two with a periodically refreshed, atomically
//! swapped membership snapshot:
//!
//! - [`TagDirectory`] - the per-process enumeration of known group tags,
//!   populated once at startup (fatal if incomplete)
//! - [`MembershipCache`] - owns the published [`Snapshot`] and rebuilds it
//!   with a concurrent fan-out over the membership store
//! - [`AuthorizationGate`] - the read-only predicate command handlers call;
//!   no I/O, no errors, safe under concurrent refreshes
//! - [`RefreshScheduler`] - cron-driven recurring refresh trigger
//! - [`MembershipSource`] - the seam to the external store, implemented by
//!   `paddock-auth-nocodb` in production and scripted sources in tests

pub mod cache;
pub mod directory;
pub mod error;
pub mod gate;
pub mod scheduler;
pub mod snapshot;
pub mod source;

pub use cache::MembershipCache;
pub use directory::TagDirectory;
pub use error::{AuthError, AuthResult};
pub use gate::AuthorizationGate;
pub use scheduler::{RefreshScheduler, SchedulerConfig};
pub use snapshot::Snapshot;
pub use source::MembershipSource;
