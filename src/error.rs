//! Error types for devbot

use crate::merge::ReasonCode;

/// Result type alias using the devbot error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by devbot operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitLab API returned an error or an unexpected payload
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Jenkins API returned an error or an unexpected payload
    #[error("Jenkins API error: {0}")]
    JenkinsApi(String),

    /// TAPD API returned an error envelope or an unexpected payload
    #[error("TAPD API error: {0}")]
    TapdApi(String),

    /// Transport-level HTTP failure (connect, timeout, body decode)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// A merge request was classified as blocked; carries the classifier's
    /// reason verbatim
    #[error("{message}")]
    MergeBlocked {
        /// Machine-readable reason tag
        code: ReasonCode,
        /// Human-readable reason
        message: String,
    },

    /// The mergeability deadline elapsed while only transient conditions
    /// were observed
    #[error("timed out waiting for merge request to become mergeable after {elapsed_ms}ms")]
    MergeTimeout {
        /// Wall-clock time spent polling, in milliseconds
        elapsed_ms: u64,
    },

    /// A project lookup by name matched nothing
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The create path was invoked without a source branch
    #[error("source branch is required to create a merge request")]
    SourceBranchRequired,

    /// A tool call arrived with arguments that cannot be acted on
    #[error("{0}")]
    InvalidRequest(String),

    /// Configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Machine-readable code for this error, when one exists.
    ///
    /// Abort-class codes come straight from the classifier; the remaining
    /// tags cover exhaustion and the orchestrator's own validation failures.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::MergeBlocked { code, .. } => Some(code.as_str()),
            Self::MergeTimeout { .. } => Some("TIMEOUT"),
            Self::ProjectNotFound(_) => Some("PROJECT_NOT_FOUND"),
            Self::SourceBranchRequired => Some("SOURCE_BRANCH_REQUIRED"),
            _ => None,
        }
    }
}
