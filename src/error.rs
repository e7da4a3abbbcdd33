//! Error types for nekosite
//!
//! Uses `thiserror` for library errors; `anyhow` stays at the binary boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for nekosite operations
pub type SiteResult<T> = Result<T, SiteError>;

/// Main error type for nekosite operations
#[derive(Error, Debug)]
pub enum SiteError {
    /// Bucket name violates the provider's DNS-compatible naming rules.
    ///
    /// Global uniqueness is NOT validated here; the provider API is the
    /// source of truth for name collisions.
    #[error("invalid bucket name '{name}': {reason}")]
    InvalidBucketName { name: String, reason: String },

    /// A distribution alias has no covering certificate domain
    #[error("distribution alias '{alias}' is not covered by the certificate domains {domains:?}")]
    UncoveredAlias { alias: String, domains: Vec<String> },

    /// A logical resource ID is not valid for the template format
    #[error("invalid logical id '{id}': {reason}")]
    InvalidLogicalId { id: String, reason: String },

    /// The deployment's asset source directory does not exist
    #[error("asset source directory not found: {path}")]
    AssetSourceMissing { path: PathBuf },

    /// Configuration file could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// The site must have at least one domain name
    #[error("no domain names configured - the certificate and distribution need at least one")]
    NoDomains,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
