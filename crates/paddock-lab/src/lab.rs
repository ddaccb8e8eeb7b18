//! Lab presence API client.

use serde::Deserialize;
use tracing::warn;

use crate::{ApiError, ApiResult};

/// Who is currently in the lab.
#[derive(Debug, Clone, Deserialize)]
pub struct InLab {
    /// Team emails of the people currently badged in.
    #[serde(default)]
    pub people: Vec<String>,

    /// Number of people currently badged in.
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Deserialize)]
struct OreResponse {
    ore: f64,
}

/// Client for the lab presence backend.
pub struct LabClient {
    http: reqwest::Client,
    base_url: String,
}

impl LabClient {
    /// Creates a client for the given base URL.
    ///
    /// A trailing slash is removed so URL composition stays predictable.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reports who is currently in the lab.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or responds with a
    /// non-success status or malformed body.
    pub async fn in_lab(&self) -> ApiResult<InLab> {
        let url = format!("{}/lab/inlab", self.base_url);
        self.get_json(&url, &[]).await
    }

    /// Reports how many hours `username` has spent in the lab this month.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or responds with a
    /// non-success status or malformed body.
    pub async fn monthly_hours(&self, username: &str) -> ApiResult<f64> {
        let url = format!("{}/lab/ore", self.base_url);
        let response: OreResponse = self
            .get_json(&url, &[("username", username.to_string())])
            .await?;
        Ok(response.ore)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "Lab API request failed");
                ApiError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(ApiError::Http(response.status().as_u16()));
        }

        response.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl std::fmt::Debug for LabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
