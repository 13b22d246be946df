//! Common test utilities
//!
//! Shared rustls initialization plus an in-memory secret source and writer.

#![allow(dead_code, reason = "Each test binary uses a subset of the helpers")]

use async_trait::async_trait;
use secret_migrator::error::{ClusterAccessError, WriterError};
use secret_migrator::provider::{
    SecretHandle, SecretSource, SecretWriter, SourceSecret, VersionHandle,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, Once};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// This must be called before any async operations that use rustls.
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

pub fn secret(name: &str, namespace: &str, data: &[(&str, &[u8])]) -> SourceSecret {
    SourceSecret {
        name: name.to_string(),
        namespace: namespace.to_string(),
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.to_vec()))
            .collect::<BTreeMap<_, _>>(),
    }
}

/// In-memory secret source
#[derive(Debug, Default)]
pub struct FakeSource {
    pub secrets: Vec<SourceSecret>,
    pub fail_list: bool,
    pub fail_get: bool,
    pub gets: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new(secrets: Vec<SourceSecret>) -> Self {
        Self {
            secrets,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_list: true,
            ..Default::default()
        }
    }

    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretSource for FakeSource {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<SourceSecret>, ClusterAccessError> {
        if self.fail_list {
            return Err(ClusterAccessError::List {
                namespace: namespace.to_string(),
                source: "connection refused".into(),
            });
        }
        Ok(self
            .secrets
            .iter()
            .filter(|s| s.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<SourceSecret, ClusterAccessError> {
        self.gets.lock().unwrap().push(name.to_string());
        if self.fail_get {
            return Err(ClusterAccessError::Get {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: "secrets is forbidden".into(),
            });
        }
        self.secrets
            .iter()
            .find(|s| s.namespace == namespace && s.name == name)
            .cloned()
            .ok_or_else(|| ClusterAccessError::Get {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: "not found".into(),
            })
    }
}

/// Call made against `RecordingWriter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterCall {
    Create { name: String, project: String },
    AddVersion { handle: String, payload: Vec<u8> },
    Delete { name: String, project: String },
}

/// In-memory destination store that records every call
///
/// Created secrets persist across runs, so creating the same name twice
/// fails with `AlreadyExists` and deleting an unknown name with `NotFound`.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub calls: Mutex<Vec<WriterCall>>,
    pub existing: Mutex<BTreeSet<String>>,
    pub fail_add_version: bool,
}

impl RecordingWriter {
    pub fn calls(&self) -> Vec<WriterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn existing(&self) -> Vec<String> {
        self.existing.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl SecretWriter for RecordingWriter {
    async fn create_secret(
        &self,
        secret_name: &str,
        project: &str,
    ) -> Result<SecretHandle, WriterError> {
        self.calls.lock().unwrap().push(WriterCall::Create {
            name: secret_name.to_string(),
            project: project.to_string(),
        });
        let path = format!("projects/{project}/secrets/{secret_name}");
        if !self.existing.lock().unwrap().insert(path.clone()) {
            return Err(WriterError::AlreadyExists(secret_name.to_string()));
        }
        Ok(SecretHandle { name: path })
    }

    async fn add_version(
        &self,
        handle: &SecretHandle,
        payload: &[u8],
    ) -> Result<VersionHandle, WriterError> {
        self.calls.lock().unwrap().push(WriterCall::AddVersion {
            handle: handle.name.clone(),
            payload: payload.to_vec(),
        });
        if self.fail_add_version {
            return Err(WriterError::Unknown {
                name: handle.name.clone(),
                message: "backend error".to_string(),
            });
        }
        Ok(VersionHandle {
            name: format!("{}/versions/1", handle.name),
        })
    }

    async fn delete_secret(&self, secret_name: &str, project: &str) -> Result<(), WriterError> {
        self.calls.lock().unwrap().push(WriterCall::Delete {
            name: secret_name.to_string(),
            project: project.to_string(),
        });
        let path = format!("projects/{project}/secrets/{secret_name}");
        if !self.existing.lock().unwrap().remove(&path) {
            return Err(WriterError::NotFound(secret_name.to_string()));
        }
        Ok(())
    }
}
