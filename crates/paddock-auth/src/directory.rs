//! Tag directory bootstrap.
//!
//! The directory is the per-process enumeration of every known group tag,
//! partitioned by kind. It is populated exactly once at startup and never
//! mutated afterward; every refresh cycle iterates it to know which groups
//! to resolve.

use tracing::info;

use paddock_core::{GroupKind, Tag};

use crate::error::{AuthError, AuthResult};
use crate::source::MembershipSource;

/// Immutable enumeration of all known group tags, by kind.
#[derive(Debug, Clone, Default)]
pub struct TagDirectory {
    areas: Vec<Tag>,
    workgroups: Vec<Tag>,
    projects: Vec<Tag>,
    roles: Vec<Tag>,
}

impl TagDirectory {
    /// Populates the directory from the membership source.
    ///
    /// All four kinds must list successfully; a partial directory is never
    /// accepted, since authorization cannot be reasoned about without the
    /// complete tag universe.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Bootstrap`] naming the first kind whose listing
    /// failed. Callers treat this as fatal.
    pub async fn load(source: &dyn MembershipSource) -> AuthResult<Self> {
        let mut lists: [Vec<Tag>; 4] = Default::default();
        for (slot, kind) in lists.iter_mut().zip(GroupKind::ALL) {
            *slot = source
                .list_tags(kind)
                .await
                .map_err(|e| AuthError::Bootstrap {
                    kind,
                    message: e.to_string(),
                })?;
        }

        let [areas, workgroups, projects, roles] = lists;
        let directory = Self {
            areas,
            workgroups,
            projects,
            roles,
        };
        info!(
            areas = directory.areas.len(),
            workgroups = directory.workgroups.len(),
            projects = directory.projects.len(),
            roles = directory.roles.len(),
            "Tag directory populated"
        );
        Ok(directory)
    }

    /// Builds a directory from already-known tag lists (useful for testing).
    #[must_use]
    pub fn from_parts(
        areas: Vec<Tag>,
        workgroups: Vec<Tag>,
        projects: Vec<Tag>,
        roles: Vec<Tag>,
    ) -> Self {
        Self {
            areas,
            workgroups,
            projects,
            roles,
        }
    }

    /// The tags of one kind, in store order.
    #[must_use]
    pub fn tags(&self, kind: GroupKind) -> &[Tag] {
        match kind {
            GroupKind::Area => &self.areas,
            GroupKind::Workgroup => &self.workgroups,
            GroupKind::Project => &self.projects,
            GroupKind::Role => &self.roles,
        }
    }

    /// Iterates every (tag, kind) pair across all kinds.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, GroupKind)> {
        GroupKind::ALL
            .into_iter()
            .flat_map(|kind| self.tags(kind).iter().map(move |tag| (tag, kind)))
    }

    /// Looks up which kind a tag belongs to, if any.
    #[must_use]
    pub fn kind_of(&self, tag: &Tag) -> Option<GroupKind> {
        GroupKind::ALL
            .into_iter()
            .find(|kind| self.tags(*kind).contains(tag))
    }

    /// Total number of tags across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len() + self.workgroups.len() + self.projects.len() + self.roles.len()
    }

    /// Returns `true` if no tags are known at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
