//! # Provider Modules
//!
//! Collaborators the migration talks to:
//! - `SecretSource` reads secrets from the cluster
//! - `SecretWriter` creates and deletes secrets in the destination store

use crate::error::{ClusterAccessError, WriterError};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// A secret read from the cluster
///
/// Read-only snapshot of one namespaced Secret object. Data keys are kept
/// in sorted order so a run processes them deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSecret {
    pub name: String,
    pub namespace: String,
    pub data: BTreeMap<String, Vec<u8>>,
}

/// Handle to a created destination secret container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretHandle {
    /// Full resource name, `projects/{project}/secrets/{secret}`
    pub name: String,
}

/// Handle to a version attached to a destination secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionHandle {
    /// Full resource name, `projects/{project}/secrets/{secret}/versions/{version}`
    pub name: String,
}

/// Provider trait for reading cluster secrets
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// List every secret in a namespace
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<SourceSecret>, ClusterAccessError>;

    /// Read a single secret by name
    async fn get_secret(&self, namespace: &str, name: &str)
        -> Result<SourceSecret, ClusterAccessError>;
}

/// Provider trait for the destination secret store
///
/// Creation is two calls: `create_secret` makes an empty container and
/// `add_version` attaches the payload. A failure between the two leaves an
/// empty container behind.
#[async_trait]
pub trait SecretWriter: Send + Sync {
    /// Create an empty secret container
    async fn create_secret(&self, secret_name: &str, project: &str)
        -> Result<SecretHandle, WriterError>;

    /// Attach a new version holding `payload` to an existing secret
    async fn add_version(
        &self,
        handle: &SecretHandle,
        payload: &[u8],
    ) -> Result<VersionHandle, WriterError>;

    /// Delete a secret and all of its versions
    async fn delete_secret(&self, secret_name: &str, project: &str) -> Result<(), WriterError>;
}

pub mod gcp;
pub mod kubernetes;
