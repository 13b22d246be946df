//! # Kubernetes Secret Source
//!
//! Reads `v1/Secret` objects through the Kubernetes API.

use super::{SecretSource, SourceSecret};
use crate::error::ClusterAccessError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{
    api::{Api, ListParams},
    Client, ResourceExt,
};
use tracing::debug;

/// Secret source backed by a Kubernetes client
#[derive(Clone)]
pub struct KubernetesSecretSource {
    client: Client,
}

impl std::fmt::Debug for KubernetesSecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubernetesSecretSource").finish_non_exhaustive()
    }
}

impl KubernetesSecretSource {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a source from the in-cluster config, falling back to the local kubeconfig
    ///
    /// # Errors
    /// Returns an error if neither configuration can be loaded
    pub async fn try_default() -> Result<Self, kube::Error> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }
}

/// Convert a Kubernetes Secret into a `SourceSecret`
///
/// The namespace of the query is used when the object carries none.
pub fn to_source_secret(secret: Secret, namespace: &str) -> SourceSecret {
    let name = secret.name_any();
    let namespace = secret
        .metadata
        .namespace
        .clone()
        .unwrap_or_else(|| namespace.to_string());
    let data = secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.0))
        .collect();

    SourceSecret {
        name,
        namespace,
        data,
    }
}

#[async_trait]
impl SecretSource for KubernetesSecretSource {
    async fn list_secrets(&self, namespace: &str) -> Result<Vec<SourceSecret>, ClusterAccessError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let list = secrets
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterAccessError::List {
                namespace: namespace.to_string(),
                source: e.into(),
            })?;

        debug!(
            "Listed {} secret(s) in namespace '{}'",
            list.items.len(),
            namespace
        );

        Ok(list
            .items
            .into_iter()
            .map(|secret| to_source_secret(secret, namespace))
            .collect())
    }

    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<SourceSecret, ClusterAccessError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = secrets
            .get(name)
            .await
            .map_err(|e| ClusterAccessError::Get {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: e.into(),
            })?;

        Ok(to_source_secret(secret, namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::ByteString;
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    #[test]
    fn test_to_source_secret_copies_data() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("app-cfg".to_string()),
                namespace: Some("apps".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "config.json".to_string(),
                ByteString(b"{}".to_vec()),
            )])),
            ..Default::default()
        };

        let source = to_source_secret(secret, "default");
        assert_eq!(source.name, "app-cfg");
        assert_eq!(source.namespace, "apps");
        assert_eq!(source.data.get("config.json"), Some(&b"{}".to_vec()));
    }

    #[test]
    fn test_to_source_secret_without_data_or_namespace() {
        let secret = Secret {
            metadata: ObjectMeta {
                name: Some("empty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let source = to_source_secret(secret, "default");
        assert_eq!(source.namespace, "default");
        assert!(source.data.is_empty());
    }
}
