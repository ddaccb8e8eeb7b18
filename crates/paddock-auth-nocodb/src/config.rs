//! NocoDB client configuration.

use std::time::Duration;

use paddock_core::GroupKind;

/// Configuration for [`NocoClient`](crate::NocoClient).
#[derive(Debug, Clone)]
pub struct NocoConfig {
    /// Base URL of the NocoDB instance.
    pub base_url: String,

    /// API token sent in the `xc-token` header.
    pub api_token: String,

    /// Per-request timeout (default: 10 seconds).
    pub request_timeout: Duration,

    /// Maximum records requested per query (default: 1000).
    pub page_limit: u32,

    /// Table and link identifiers of the membership base.
    pub tables: TableMap,
}

impl NocoConfig {
    /// Creates a configuration with default timeouts and table ids.
    ///
    /// A trailing slash on the base URL is removed so URL composition stays
    /// predictable.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_token: api_token.into(),
            request_timeout: Duration::from_secs(10),
            page_limit: 1000,
            tables: TableMap::default(),
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the per-query record limit.
    #[must_use]
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit;
        self
    }

    /// Overrides the table identifiers.
    #[must_use]
    pub fn with_tables(mut self, tables: TableMap) -> Self {
        self.tables = tables;
        self
    }
}

/// Identifiers of one group table and its member link.
#[derive(Debug, Clone)]
pub struct TableIds {
    /// Table holding the group records of this kind.
    pub table: String,

    /// Link column id connecting group records to member records.
    pub link: String,
}

impl TableIds {
    fn new(table: &str, link: &str) -> Self {
        Self {
            table: table.to_string(),
            link: link.to_string(),
        }
    }
}

/// All table identifiers of the membership base.
#[derive(Debug, Clone)]
pub struct TableMap {
    /// Members table carrying usernames and team emails.
    pub members: String,

    /// View applied when projecting member records.
    pub members_view: Option<String>,

    pub areas: TableIds,
    pub workgroups: TableIds,
    pub projects: TableIds,
    pub roles: TableIds,
}

impl TableMap {
    /// The table and link ids for one group kind.
    #[must_use]
    pub fn for_kind(&self, kind: GroupKind) -> &TableIds {
        match kind {
            GroupKind::Area => &self.areas,
            GroupKind::Workgroup => &self.workgroups,
            GroupKind::Project => &self.projects,
            GroupKind::Role => &self.roles,
        }
    }
}

impl Default for TableMap {
    fn default() -> Self {
        Self {
            members: "m3rsrrmnhhxxw0p".to_string(),
            members_view: Some("vw72nyx0bmaak96s".to_string()),
            areas: TableIds::new("mbftgdmmi4t668c", "cjest7m9j409yia"),
            workgroups: TableIds::new("m5gpr28sp047j7w", "c4olgvricf9nalu"),
            projects: TableIds::new("ma3scczigje9u17", "c96a46tetiedgvg"),
            roles: TableIds::new("mpur65wgd6gqi98", "cbuvnbm0wxwkfyo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = NocoConfig::new("https://noco.example.com/", "tok");
        assert_eq!(config.base_url, "https://noco.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.page_limit, 1000);
    }

    #[test]
    fn test_config_builder() {
        let config = NocoConfig::new("https://noco.example.com", "tok")
            .with_request_timeout(Duration::from_secs(5))
            .with_page_limit(200);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.page_limit, 200);
    }

    #[test]
    fn test_table_map_for_kind() {
        let tables = TableMap::default();
        assert_eq!(tables.for_kind(GroupKind::Area).table, tables.areas.table);
        assert_eq!(tables.for_kind(GroupKind::Role).link, tables.roles.link);
    }
}
