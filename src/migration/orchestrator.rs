//! # Orchestrator
//!
//! Drives a migration run:
//!
//! 1. **Listing** - read every secret in the namespace; an error or an
//!    empty namespace aborts the run
//! 2. **Filtering** - drop service account tokens and `--exclude` names
//! 3. **Processing** - for each remaining secret, re-read it and create (or
//!    delete) one destination secret per non-reserved data key
//!
//! Any failure while processing aborts the whole run. Destination secrets
//! already created or deleted are left as they are.

use super::filter::{is_reserved_key, skip_reason};
use super::report::{MigrationRecord, RunReport};
use super::sanitize::{sanitize_name, validate_destination_name};
use super::MigrationMode;
use crate::config::MigrationConfig;
use crate::error::MigrationError;
use crate::provider::{SecretSource, SecretWriter, SourceSecret};
use tracing::{debug, info, info_span, Instrument};

/// Runs a migration against a secret source and a destination writer
pub struct Migrator<'a> {
    source: &'a dyn SecretSource,
    writer: &'a dyn SecretWriter,
}

impl std::fmt::Debug for Migrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator").finish_non_exhaustive()
    }
}

impl<'a> Migrator<'a> {
    #[must_use]
    pub fn new(source: &'a dyn SecretSource, writer: &'a dyn SecretWriter) -> Self {
        Self { source, writer }
    }

    /// Run the migration described by `config`
    ///
    /// # Errors
    /// - `ClusterAccess` if listing or reading a secret fails
    /// - `EmptyResult` if the namespace holds no secrets
    /// - `InvalidDestinationName` if a derived name is unusable
    /// - `Writer` on the first failed create, add-version or delete call
    pub async fn run(&self, config: &MigrationConfig) -> Result<RunReport, MigrationError> {
        let span = info_span!(
            "migration.run",
            namespace = %config.namespace,
            project.id = %config.project,
            mode = %config.mode
        );

        async {
            let candidates = self.list_candidates(config).await?;

            let mut report = RunReport::new();
            for secret_name in &candidates {
                let secret = self.source.get_secret(&config.namespace, secret_name).await?;
                self.process_secret(config, &secret, &mut report).await?;
            }

            let processed = serde_json::to_string(&report.processed_names()).unwrap_or_default();
            info!("📋 SafeName List: {}", processed);

            Ok::<RunReport, MigrationError>(report)
        }
        .instrument(span)
        .await
    }

    /// Listing and filtering phases: names of the secrets to process
    async fn list_candidates(
        &self,
        config: &MigrationConfig,
    ) -> Result<Vec<String>, MigrationError> {
        info!(
            "🔍 Getting all secrets from [namespace: '{}']",
            config.namespace
        );
        let secrets = self.source.list_secrets(&config.namespace).await?;

        if secrets.is_empty() {
            return Err(MigrationError::EmptyResult(config.namespace.clone()));
        }

        info!(
            "🪚 Filtering secret list to skip secrets with the name 'default-token-*' and `--exclude` items ['{}']",
            config.exclusions.as_raw()
        );

        let mut candidates = Vec::with_capacity(secrets.len());
        for (index, secret) in secrets.iter().enumerate() {
            debug!("Found [{}]: {}", index + 1, secret.name);

            if let Some(reason) = skip_reason(&secret.name, &config.exclusions) {
                debug!("Skipped secret ['{}']: {}", secret.name, reason.as_str());
                continue;
            }
            candidates.push(secret.name.clone());
        }

        info!("📋 List: {:?}", candidates);
        Ok(candidates)
    }

    /// Processing phase for one secret
    async fn process_secret(
        &self,
        config: &MigrationConfig,
        secret: &SourceSecret,
        report: &mut RunReport,
    ) -> Result<(), MigrationError> {
        for (data_key, payload) in &secret.data {
            if is_reserved_key(data_key) {
                debug!(
                    "Skipped secret object ['{}'] of ['{}'] by default",
                    data_key, secret.name
                );
                continue;
            }

            let destination_name = sanitize_name(&secret.name, data_key);
            validate_destination_name(&destination_name).map_err(|reason| {
                MigrationError::InvalidDestinationName {
                    secret: secret.name.clone(),
                    data_key: data_key.clone(),
                    name: destination_name.clone(),
                    reason,
                }
            })?;

            match config.mode {
                MigrationMode::Delete => {
                    info!("🚫 Deleting secret object(s) for ['{}']", secret.name);
                    self.writer
                        .delete_secret(&destination_name, &config.project)
                        .await
                        .map_err(|e| {
                            MigrationError::writer("delete", &destination_name, &config.project, e)
                        })?;
                    info!(
                        "  - Deleted secret named ['{}'] in GCP project: ['{}']",
                        destination_name, config.project
                    );
                }
                MigrationMode::Create => {
                    info!("✅ Migrating secret object(s) for ['{}']", secret.name);
                    debug!(
                        "Creating secret ['{}'] in GCP project ['{}'] from key ['{}'] of Kubernetes secret ['{}'] in namespace ['{}']",
                        destination_name, config.project, data_key, secret.name, config.namespace
                    );
                    let handle = self
                        .writer
                        .create_secret(&destination_name, &config.project)
                        .await
                        .map_err(|e| {
                            MigrationError::writer("create", &destination_name, &config.project, e)
                        })?;
                    let version = self.writer.add_version(&handle, payload).await.map_err(|e| {
                        MigrationError::writer(
                            "add a version to",
                            &destination_name,
                            &config.project,
                            e,
                        )
                    })?;
                    debug!("Added version {}", version.name);
                    info!(
                        "  - Created secret named ['{}'] in GCP project: ['{}']",
                        destination_name, config.project
                    );
                }
            }

            report.push(MigrationRecord {
                source_name: secret.name.clone(),
                destination_name,
                project: config.project.clone(),
                namespace: config.namespace.clone(),
                data_key: data_key.clone(),
                mode: config.mode,
            });
        }

        Ok(())
    }
}
