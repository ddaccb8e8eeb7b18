//! Authorization error types.

use paddock_core::GroupKind;

/// Errors produced while bootstrapping or refreshing membership data.
///
/// None of these ever reach the authorization hot path: gate queries are
/// pure snapshot reads and cannot fail. Refresh errors are logged and the
/// affected cycle is abandoned; bootstrap errors are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The membership source failed to answer a query.
    #[error("Membership source error: {message}")]
    Source {
        /// Description of the failure.
        message: String,
    },

    /// The tag directory could not be populated for a group kind.
    #[error("Tag directory bootstrap failed for kind '{kind}': {message}")]
    Bootstrap {
        /// The group kind whose listing failed.
        kind: GroupKind,
        /// Description of the failure.
        message: String,
    },

    /// The refresh schedule expression could not be parsed.
    #[error("Invalid refresh schedule '{expression}': {message}")]
    Schedule {
        /// The offending cron expression.
        expression: String,
        /// Description of the parse failure.
        message: String,
    },
}

impl AuthError {
    /// Shorthand for a membership source failure.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}

/// Result type for authorization operations.
pub type AuthResult<T> = Result<T, AuthError>;
