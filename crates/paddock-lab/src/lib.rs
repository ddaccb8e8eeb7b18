//! # paddock-lab
//!
//! REST clients for the services command handlers talk to besides the
//! membership store:
//!
//! - [`LabClient`] - lab presence backend (`who is in the lab`, monthly
//!   hours per member)
//! - [`ShlinkClient`] - Shlink URL shortener (short links and QR codes)

pub mod lab;
pub mod shlink;

pub use lab::{InLab, LabClient};
pub use shlink::{ShlinkClient, ShortUrl};

/// Errors shared by the REST clients in this crate.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A network error occurred while reaching the service.
    #[error("Network error: {0}")]
    Network(String),

    /// The request returned a non-success status code.
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// The response body could not be parsed.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Result type for REST client operations.
pub type ApiResult<T> = Result<T, ApiError>;
