//! # Errors
//!
//! Error taxonomy for a migration run.
//!
//! Collaborators return typed errors ([`ClusterAccessError`], [`WriterError`]);
//! the orchestrator wraps them in [`MigrationError`] with the step that failed.

use thiserror::Error;

/// Boxed error from a cluster client implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure reading secrets from the cluster
#[derive(Debug, Error)]
pub enum ClusterAccessError {
    #[error("failed to list secrets in namespace '{namespace}'")]
    List {
        namespace: String,
        #[source]
        source: BoxError,
    },
    #[error("failed to get secret '{name}' in namespace '{namespace}'")]
    Get {
        namespace: String,
        name: String,
        #[source]
        source: BoxError,
    },
}

/// Failure reported by the destination secret store
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("secret '{0}' already exists")]
    AlreadyExists(String),
    #[error("secret '{0}' not found")]
    NotFound(String),
    #[error("permission denied for secret '{0}'")]
    PermissionDenied(String),
    #[error("request for secret '{name}' failed: {message}")]
    Unknown { name: String, message: String },
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    ClusterAccess(#[from] ClusterAccessError),

    #[error("No secrets found in namespace '{0}', no action taken")]
    EmptyResult(String),

    #[error("invalid destination name '{name}' for secret '{secret}' key '{data_key}': {reason}")]
    InvalidDestinationName {
        secret: String,
        data_key: String,
        name: String,
        reason: &'static str,
    },

    #[error("failed to {step} secret '{name}' in project '{project}'")]
    Writer {
        step: &'static str,
        name: String,
        project: String,
        #[source]
        source: WriterError,
    },
}

impl MigrationError {
    /// Wrap a writer failure with the step it happened in
    pub fn writer(step: &'static str, name: &str, project: &str, source: WriterError) -> Self {
        Self::Writer {
            step,
            name: name.to_string(),
            project: project.to_string(),
            source,
        }
    }
}
