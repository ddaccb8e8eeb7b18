//! NocoDB HTTP client.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use paddock_auth::{AuthError, AuthResult, MembershipSource};
use paddock_core::{GroupKind, Tag};

use crate::config::NocoConfig;
use crate::{NocoError, NocoResult};

const FIELD_TAG: &str = "Tag";
const FIELD_ID: &str = "Id";
const FIELD_USERNAME: &str = "Telegram Username";
const FIELD_EMAIL: &str = "Team Email";

/// Client for the NocoDB membership base.
///
/// Reuses one `reqwest::Client` for connection pooling; the API token is
/// carried as a default `xc-token` header on every request.
pub struct NocoClient {
    http: reqwest::Client,
    config: NocoConfig,
}

impl NocoClient {
    /// Creates a new client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created or the API token is not
    /// a valid header value (should not happen in practice).
    #[must_use]
    pub fn new(config: NocoConfig) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "xc-token",
            config
                .api_token
                .parse()
                .expect("API token is not a valid header value"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/api/v2/tables/{table}/records", self.config.base_url)
    }

    fn links_url(&self, table: &str, link: &str, record_id: i64) -> String {
        format!(
            "{}/api/v2/tables/{table}/links/{link}/records/{record_id}",
            self.config.base_url
        )
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> NocoResult<Vec<T>> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "NocoDB request failed");
                NocoError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(NocoError::Http(response.status().as_u16()));
        }

        let body: RecordList<T> = response
            .json()
            .await
            .map_err(|e| NocoError::Parse(e.to_string()))?;
        Ok(body.list)
    }

    /// Lists every tag of one kind, normalized to canonical form.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is unreachable or responds with a
    /// non-success status or malformed body.
    pub async fn tag_list(&self, kind: GroupKind) -> NocoResult<Vec<Tag>> {
        let table = &self.config.tables.for_kind(kind).table;
        let records: Vec<TagRecord> = self
            .get_list(
                &self.records_url(table),
                &[
                    ("limit", self.config.page_limit.to_string()),
                    ("fields", FIELD_TAG.to_string()),
                ],
            )
            .await?;

        Ok(records.iter().map(|r| Tag::new(&r.tag)).collect())
    }

    /// Resolves the current member usernames of one group.
    ///
    /// Walks the group record, its member links, and the linked member
    /// records. Member records without a username are skipped; a group with
    /// no links resolves to an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`NocoError::UnknownTag`] if the tag has no record, or a
    /// transport/parse error for any failed request in the chain.
    pub async fn group_members(&self, tag: &Tag, kind: GroupKind) -> NocoResult<HashSet<String>> {
        let ids = self.config.tables.for_kind(kind);
        let limit = self.config.page_limit.to_string();

        // Group record id for the tag.
        let records: Vec<IdRecord> = self
            .get_list(
                &self.records_url(&ids.table),
                &[
                    ("limit", limit.clone()),
                    ("where", format!("({FIELD_TAG},like,{})", tag.bare())),
                    ("fields", FIELD_ID.to_string()),
                ],
            )
            .await?;
        let record_id = records
            .first()
            .map(|r| r.id)
            .ok_or_else(|| NocoError::UnknownTag(tag.clone()))?;

        // Linked member record ids.
        let links: Vec<IdRecord> = self
            .get_list(
                &self.links_url(&ids.table, &ids.link, record_id),
                &[("limit", limit.clone())],
            )
            .await?;
        if links.is_empty() {
            debug!(tag = %tag, kind = %kind, "Group has no members");
            return Ok(HashSet::new());
        }
        let member_ids = links
            .iter()
            .map(|r| r.id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        // Member records, projected to the username column.
        let mut query = vec![
            ("limit", limit),
            ("where", format!("({FIELD_ID},in,{member_ids})")),
            ("fields", FIELD_USERNAME.to_string()),
        ];
        if let Some(view) = &self.config.tables.members_view {
            query.push(("viewId", view.clone()));
        }
        let members: Vec<MemberRecord> = self
            .get_list(&self.records_url(&self.config.tables.members), &query)
            .await?;

        Ok(members
            .into_iter()
            .filter_map(|r| r.username.filter(|u| !u.is_empty()))
            .collect())
    }

    /// Looks up the team email mapped to a chat username.
    ///
    /// The lookup tolerates usernames stored with or without their `@`
    /// prefix. Returns `None` when no mapping exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is unreachable or responds with a
    /// non-success status or malformed body.
    pub async fn email_for_username(&self, username: &str) -> NocoResult<Option<String>> {
        let bare = username.trim_start_matches('@');
        let records: Vec<EmailRecord> = self
            .get_list(
                &self.records_url(&self.config.tables.members),
                &[
                    ("limit", self.config.page_limit.to_string()),
                    (
                        "where",
                        format!(
                            "({FIELD_USERNAME},like,@{bare})~or({FIELD_USERNAME},like,{bare})"
                        ),
                    ),
                    ("fields", FIELD_EMAIL.to_string()),
                ],
            )
            .await?;

        Ok(records
            .into_iter()
            .next()
            .and_then(|r| r.email)
            .filter(|e| !e.is_empty()))
    }

    /// Looks up the chat username mapped to a team email.
    ///
    /// Returns `None` when no mapping exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance is unreachable or responds with a
    /// non-success status or malformed body.
    pub async fn username_for_email(&self, email: &str) -> NocoResult<Option<String>> {
        let records: Vec<MemberRecord> = self
            .get_list(
                &self.records_url(&self.config.tables.members),
                &[
                    ("limit", self.config.page_limit.to_string()),
                    ("where", format!("({FIELD_EMAIL},eq,{email})")),
                    ("fields", FIELD_USERNAME.to_string()),
                ],
            )
            .await?;

        Ok(records
            .into_iter()
            .next()
            .and_then(|r| r.username)
            .filter(|u| !u.is_empty()))
    }
}

#[async_trait]
impl MembershipSource for NocoClient {
    async fn list_tags(&self, kind: GroupKind) -> AuthResult<Vec<Tag>> {
        self.tag_list(kind)
            .await
            .map_err(|e| AuthError::source(e.to_string()))
    }

    async fn members(&self, tag: &Tag, kind: GroupKind) -> AuthResult<HashSet<String>> {
        self.group_members(tag, kind)
            .await
            .map_err(|e| AuthError::source(e.to_string()))
    }
}

impl std::fmt::Debug for NocoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NocoClient")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct RecordList<T> {
    #[serde(default)]
    list: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TagRecord {
    #[serde(rename = "Tag")]
    tag: String,
}

#[derive(Debug, Deserialize)]
struct IdRecord {
    #[serde(rename = "Id")]
    id: i64,
}

#[derive(Debug, Deserialize)]
struct MemberRecord {
    #[serde(rename = "Telegram Username", default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EmailRecord {
    #[serde(rename = "Team Email", default)]
    email: Option<String>,
}
