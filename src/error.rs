//! Error types for release_tagger operations.
//!
//! This module defines the error taxonomy of a run with actionable messages,
//! recovery suggestions and a cause-chain formatter for the final report.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release_tagger operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for a release run
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Input validation errors (raised before any remote mutation)
    #[error("Invalid input")]
    Config(#[from] ConfigError),

    /// Tag lookup failed for a reason other than "not found"
    #[error("Failed to look up tag '{tag}'")]
    TagQuery {
        /// Tag name
        tag: String,
        /// Underlying API error
        #[source]
        source: ForgeError,
    },

    /// Listing releases failed
    #[error("Failed to list releases of {repository}")]
    ReleaseQuery {
        /// Repository coordinates (owner/repo)
        repository: String,
        /// Underlying API error
        #[source]
        source: ForgeError,
    },

    /// Tag exists and the strategy forbids touching it
    #[error("Tag '{tag}' already exists. Use the 'replace' strategy to retarget it.")]
    TagExists {
        /// Tag name
        tag: String,
    },

    /// Tag is absent and the strategy cannot create it
    #[error("Tag '{tag}' does not exist and strategy 'use-existing-tag' cannot create it")]
    TagNotFound {
        /// Tag name
        tag: String,
    },

    /// Deleting a stale release that shares the tag name failed
    #[error("Failed to delete stale release {release_id} for tag '{tag}'")]
    StaleRelease {
        /// Tag name
        tag: String,
        /// Release identifier
        release_id: u64,
        /// Underlying API error
        #[source]
        source: ForgeError,
    },

    /// Creating or updating the tag failed
    #[error("Failed to {operation} tag '{tag}'")]
    TagMutation {
        /// Tag name
        tag: String,
        /// Operation that failed
        operation: &'static str,
        /// Underlying API error
        #[source]
        source: ForgeError,
    },

    /// Creating the release failed
    #[error("Failed to create release for tag '{tag}'")]
    ReleaseCreation {
        /// Tag name
        tag: String,
        /// Underlying API error
        #[source]
        source: ForgeError,
    },

    /// Upload retries exhausted for an asset
    #[error("Upload of '{asset}' failed after {attempts} attempt(s)")]
    UploadFailed {
        /// Asset name
        asset: String,
        /// Number of attempts made
        attempts: u32,
        /// Error of the last attempt
        #[source]
        source: ForgeError,
    },

    /// Writing the action output failed
    #[error("Failed to write action output to {path}")]
    Output {
        /// Output file path
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },
}

/// Input validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required parameter missing or empty
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Input name
        name: &'static str,
    },

    /// Parameter present but malformed
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Input name
        name: &'static str,
        /// Reason for the error
        reason: String,
    },

    /// Parameter not allowed with the selected strategy
    #[error("Parameter '{name}' is incompatible with strategy '{strategy}'")]
    IncompatibleParameter {
        /// Input name
        name: &'static str,
        /// Strategy input value
        strategy: &'static str,
    },

    /// Reading a file-sourced value failed
    #[error("Failed to read '{name}' from file {path}")]
    ReadFile {
        /// Input name
        name: &'static str,
        /// File path
        path: PathBuf,
        /// IO error
        #[source]
        source: std::io::Error,
    },

    /// Environment-sourced value is not set
    #[error("Environment variable '{variable}' named by '{name}' is not set")]
    MissingEnvironment {
        /// Input name
        name: &'static str,
        /// Variable name
        variable: String,
    },

    /// Resolving a target ref to a sha failed
    #[error("Failed to resolve target '{target}'")]
    TargetLookup {
        /// Target input value
        target: String,
        /// Underlying API error
        #[source]
        source: ForgeError,
    },

    /// HTTP client construction failed
    #[error("Failed to initialize API client")]
    Client(#[source] ForgeError),
}

/// Remote API errors
#[derive(Error, Debug)]
pub enum ForgeError {
    /// The resource does not exist (HTTP 404)
    #[error("{operation}: not found")]
    NotFound {
        /// API operation
        operation: &'static str,
    },

    /// Non-success HTTP status
    #[error("{operation}: HTTP {status}: {message}")]
    Status {
        /// API operation
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Error message returned by the forge
        message: String,
    },

    /// Transport or decoding failure
    #[error("{operation}: request failed")]
    Http {
        /// API operation
        operation: &'static str,
        /// reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Local IO failure while preparing a request
    #[error("{operation}: IO error")]
    Io {
        /// API operation
        operation: &'static str,
        /// IO error
        #[source]
        source: std::io::Error,
    },

    /// Header value rejected (e.g. a token with control characters)
    #[error("Invalid value for header '{name}'")]
    InvalidHeader {
        /// Header name
        name: &'static str,
    },

    /// Base URL that cannot carry path segments (e.g. `mailto:`)
    #[error("URL '{url}' cannot be used as an API base")]
    CannotBeABase {
        /// Offending URL
        url: String,
    },

    /// Malformed endpoint URL
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parse error
        #[source]
        source: url::ParseError,
    },
}

impl ForgeError {
    /// Whether the forge answered "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ForgeError::NotFound { .. })
    }
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::IncompatibleParameter { name, .. }) => vec![
                format!("Remove '{}' or pick the 'replace' or 'fail-fast' strategy", name),
            ],
            ReleaseError::Config(ConfigError::MissingParameter { name }) => {
                vec![format!("Provide the '{}' input", name)]
            }
            ReleaseError::TagExists { .. } => vec![
                "Use strategy 'replace' to move the tag to the new target".to_string(),
                "Use strategy 'use-existing-tag' to release the tag as-is".to_string(),
            ],
            ReleaseError::TagNotFound { tag } => vec![
                format!("Push tag '{}' first, or set 'target' with strategy 'fail-fast'", tag),
            ],
            ReleaseError::TagQuery { .. }
            | ReleaseError::ReleaseQuery { .. }
            | ReleaseError::TagMutation { .. } => vec![
                "Verify the token has 'contents: write' permission on the repository".to_string(),
            ],
            ReleaseError::UploadFailed { .. } => vec![
                "Re-run the job; the tag was restored and the partial release deleted".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

/// Render an error and its chain of sources as an ordered list of lines.
///
/// The first line is the error itself, each following line one level deeper.
pub fn cause_chain(error: &(dyn std::error::Error + 'static)) -> Vec<String> {
    let mut lines = vec![error.to_string()];
    if let Some(source) = error.source() {
        lines.extend(cause_chain(source));
    }
    lines
}
