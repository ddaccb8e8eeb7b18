//! # paddock-core
//!
//! Shared vocabulary for the paddock-bot workspace.
//!
//! This crate defines the types every other crate speaks in:
//!
//! - [`Tag`] - canonical group/user identifiers (`@eng`, `@alice`)
//! - [`GroupKind`] - the four membership group kinds tracked in NocoDB
//! - [`extract_mentions`] - mention scanning for free-form message text
//! - [`fmt`] - small user-facing formatting helpers

pub mod fmt;
pub mod mentions;
pub mod tag;

pub use mentions::extract_mentions;
pub use tag::{GroupKind, Tag};
