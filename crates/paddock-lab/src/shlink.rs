//! Shlink URL shortener client.

use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{ApiError, ApiResult};

/// A short URL created by Shlink.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortUrl {
    /// The resolved short URL.
    #[serde(rename = "shortUrl")]
    pub short_url: String,
}

impl ShortUrl {
    /// URL of the QR code image Shlink renders for this short URL.
    #[must_use]
    pub fn qr_code_url(&self) -> String {
        format!("{}/qr-code", self.short_url)
    }
}

/// Client for a Shlink server.
pub struct ShlinkClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ShlinkClient {
    /// Creates a client for the given server and API key.
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Creates (or finds) a short URL for `long_url`.
    ///
    /// The long URL is coerced to https first. An optional custom slug
    /// picks the short code instead of a generated one.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or responds with a
    /// non-success status or malformed body.
    pub async fn create_short_url(
        &self,
        long_url: &str,
        slug: Option<&str>,
    ) -> ApiResult<ShortUrl> {
        let url = format!("{}/rest/v3/short-urls", self.base_url);

        let mut body = json!({
            "longUrl": ensure_https(long_url),
            "findIfExists": true,
        });
        if let Some(slug) = slug {
            body["customSlug"] = json!(slug);
        }

        let response = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(url, error = %e, "Shlink request failed");
                ApiError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(ApiError::Http(response.status().as_u16()));
        }

        response.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl std::fmt::Debug for ShlinkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShlinkClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Coerces a URL to https, adding the scheme when it is missing.
fn ensure_https(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{rest}")
    } else if url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_https() {
        assert_eq!(ensure_https("example.com/x"), "https://example.com/x");
        assert_eq!(ensure_https("http://example.com"), "https://example.com");
        assert_eq!(ensure_https("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_qr_code_url() {
        let short = ShortUrl {
            short_url: "https://s.example.com/abc".to_string(),
        };
        assert_eq!(short.qr_code_url(), "https://s.example.com/abc/qr-code");
    }
}
