//! # Secret Migrator
//!
//! One-shot tool that copies the Secrets of a Kubernetes namespace into
//! Google Cloud Secret Manager, or deletes the copies with `--delete`.
//!
//! ## Usage
//!
//! ```bash
//! secret-migrator --namespace=apps --exclude=db-creds --project=my-project
//! secret-migrator --namespace=apps --project=my-project --delete
//! ```
//!
//! The audit report is printed to stdout. Any failure is logged and the
//! process exits with status 1.

use anyhow::{Context, Result};
use clap::Parser;
use secret_migrator::config::{default_log_filter, Args, MigrationConfig};
use secret_migrator::migration::Migrator;
use secret_migrator::provider::gcp::SecretManagerREST;
use secret_migrator::provider::kubernetes::KubernetesSecretSource;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = MigrationConfig::from_args(Args::parse());

    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("❌ Failed to install rustls crypto provider");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    default_log_filter(config.as_ref().is_ok_and(|c| c.debug)).into()
                }),
        )
        .init();

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: MigrationConfig) -> Result<()> {

    info!(
        "Build info: timestamp={}, datetime={}, git_hash={}",
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_DATETIME"),
        env!("BUILD_GIT_HASH")
    );
    info!(
        "📣 Starting migration script [namespace: '{}'] [project: '{}'] [mode: {}]",
        config.namespace, config.project, config.mode
    );

    info!("Initializing the clients:");
    let source = KubernetesSecretSource::try_default()
        .await
        .context("Failed to initialize Kubernetes API client")?;
    info!("✅ Kubernetes client configured");

    let writer = SecretManagerREST::new()
        .await
        .context("Failed to initialize Google Secret Manager client")?;
    info!("✅ Google client configured");

    let report = Migrator::new(&source, &writer).run(&config).await?;

    let stdout = std::io::stdout();
    report
        .write_to(&mut stdout.lock())
        .context("Failed to write run report")?;

    info!(
        "Finished: {} secret(s) processed in {} mode",
        report.count(),
        config.mode
    );
    Ok(())
}
