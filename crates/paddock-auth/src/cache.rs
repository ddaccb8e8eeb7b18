//! Membership cache with atomic snapshot replacement.
//!
//! This module owns the one piece of shared mutable state in the
//! authorization system: the currently-published [`Snapshot`]. The snapshot
//! sits behind an `ArcSwap`, so reads are a single atomic load and never
//! block, while a refresh publishes a wholly new snapshot with a single
//! atomic store. Readers observe either the old or the new snapshot in its
//! entirety, never a mix.
//!
//! # Refresh cycle
//!
//! A refresh fans out one membership request per directory entry and awaits
//! them concurrently. If any single request fails, the entire cycle is
//! abandoned and the previous snapshot stays published: stale-but-complete
//! data is preferred over a partially-populated snapshot, which would make
//! authorization decisions against groups that silently lost their members.
//!
//! Refreshes are triggered once eagerly at startup (without blocking it)
//! and thereafter by the scheduler in [`crate::scheduler`]. Overlapping
//! refreshes cannot corrupt state: whichever cycle publishes last wins.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use futures_util::future::try_join_all;
use tracing::{debug, info, warn};

use paddock_core::Tag;

use crate::directory::TagDirectory;
use crate::error::{AuthError, AuthResult};
use crate::snapshot::Snapshot;
use crate::source::MembershipSource;

/// Owner of the currently-published membership snapshot.
pub struct MembershipCache {
    source: Arc<dyn MembershipSource>,
    directory: Arc<TagDirectory>,
    /// Published snapshot behind an atomic pointer swap (lock-free reads).
    snapshot: ArcSwap<Snapshot>,
}

impl MembershipCache {
    /// Creates a cache with an empty snapshot and no refresh scheduled.
    ///
    /// Until the first successful refresh, queries authorize no one and
    /// member listings are empty.
    #[must_use]
    pub fn new(source: Arc<dyn MembershipSource>, directory: Arc<TagDirectory>) -> Arc<Self> {
        Arc::new(Self {
            source,
            directory,
            snapshot: ArcSwap::from_pointee(Snapshot::empty()),
        })
    }

    /// Creates a cache and kicks off the eager first refresh.
    ///
    /// The refresh runs as a background task so startup is not blocked on
    /// the membership store; queries issued before it completes see the
    /// empty snapshot.
    #[must_use]
    pub fn start(source: Arc<dyn MembershipSource>, directory: Arc<TagDirectory>) -> Arc<Self> {
        let cache = Self::new(source, directory);
        Arc::clone(&cache).refresh_in_background();
        cache
    }

    /// The tag directory this cache refreshes against.
    #[must_use]
    pub fn directory(&self) -> &TagDirectory {
        &self.directory
    }

    /// The currently-published snapshot (single atomic load, never blocks).
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Runs one refresh cycle to completion or abandonment.
    ///
    /// Fans out one membership request per directory entry, awaits them
    /// all, and on full success builds and publishes the replacement
    /// snapshot. On any failure the cycle is abandoned and the previous
    /// snapshot remains published.
    ///
    /// # Errors
    ///
    /// Returns the first membership request failure. The published snapshot
    /// is untouched in that case.
    pub async fn refresh(&self) -> AuthResult<()> {
        let started = Instant::now();

        let fetches = self.directory.iter().map(|(tag, kind)| async move {
            let members = self.source.members(tag, kind).await?;
            debug!(tag = %tag, kind = %kind, members = members.len(), "Resolved group membership");
            Ok::<_, AuthError>((tag.clone(), members))
        });

        let entries = try_join_all(fetches).await?;
        let snapshot = Snapshot::build(entries);

        info!(
            groups = self.directory.len(),
            everyone = snapshot
                .members(&Tag::everyone())
                .map_or(0, HashSet::len),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Published membership snapshot"
        );
        self.publish(snapshot);
        Ok(())
    }

    /// Spawns a refresh as a fire-and-forget task.
    ///
    /// Failures are logged and the previous snapshot stays published; they
    /// are never surfaced to authorization callers.
    pub fn refresh_in_background(self: Arc<Self>) {
        tokio::spawn(async move {
            if let Err(e) = self.refresh().await {
                warn!(error = %e, "Membership refresh abandoned, keeping previous snapshot");
            }
        });
    }

    /// Atomically replaces the published snapshot.
    pub(crate) fn publish(&self, snapshot: Snapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }
}

impl std::fmt::Debug for MembershipCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipCache")
            .field("directory_len", &self.directory.len())
            .field("snapshot_len", &self.snapshot.load().len())
            .finish()
    }
}
