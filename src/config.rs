//! # Configuration
//!
//! Command-line flags and the validated, immutable run configuration.
//!
//! Every flag can also be supplied through a `MIGRATE_*` environment variable.

use crate::constants::DEFAULT_NAMESPACE;
use crate::error::MigrationError;
use crate::migration::{ExclusionSet, MigrationMode};
use clap::{builder::BoolishValueParser, ArgAction, Parser};

/// Migrate Kubernetes Secrets into Google Cloud Secret Manager
#[derive(Debug, Clone, Parser)]
#[command(name = "secret-migrator", version)]
#[command(
    about = "Migrate Kubernetes Secrets into Google Cloud Secret Manager",
    long_about = None,
    after_help = "\
Each data key of a secret becomes one Secret Manager secret named
<secret-name>-<data-key>, with periods replaced by hyphens.

Examples:
  secret-migrator --project=my-project
  secret-migrator --namespace=apps --exclude=db-creds,legacy --project=my-project
  secret-migrator --namespace=apps --project=my-project --delete
"
)]
pub struct Args {
    /// Name of the namespace to look for secrets
    #[arg(long, env = "MIGRATE_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Name of secrets to exclude, comma delimited
    #[arg(long, env = "MIGRATE_EXCLUDE", default_value = "")]
    pub exclude: String,

    /// Name of GCP project to migrate secrets to (required)
    #[arg(long, env = "MIGRATE_PROJECT")]
    pub project: Option<String>,

    /// Delete the Secret Manager secrets instead of creating them
    #[arg(
        long,
        env = "MIGRATE_DELETE",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub delete: bool,

    /// Enable verbose per-item logging
    #[arg(
        long,
        env = "MIGRATE_DEBUG",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub debug: bool,
}

/// Immutable configuration for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    pub namespace: String,
    pub project: String,
    pub exclusions: ExclusionSet,
    pub mode: MigrationMode,
    pub debug: bool,
}

impl MigrationConfig {
    /// Validate command-line flags
    ///
    /// An empty namespace (e.g. `--namespace=${UNSET}`) falls back to `default`.
    ///
    /// # Errors
    /// Returns `MigrationError::Configuration` when `--project` is missing or empty
    pub fn from_args(args: Args) -> Result<Self, MigrationError> {
        let project = args
            .project
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                MigrationError::Configuration(
                    "`--project=` is not defined in arguments".to_string(),
                )
            })?;

        let namespace = if args.namespace.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            args.namespace
        };

        Ok(Self {
            namespace,
            project,
            exclusions: ExclusionSet::parse(&args.exclude),
            mode: MigrationMode::from_delete_flag(args.delete),
            debug: args.debug,
        })
    }
}

/// Log filter used when `RUST_LOG` is not set
#[must_use]
pub fn default_log_filter(debug: bool) -> &'static str {
    if debug {
        "secret_migrator=debug"
    } else {
        "secret_migrator=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("secret-migrator").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = MigrationConfig::from_args(parse(&["--project=my-project"])).unwrap();
        assert_eq!(config.namespace, "default");
        assert_eq!(config.project, "my-project");
        assert!(config.exclusions.is_empty());
        assert_eq!(config.mode, MigrationMode::Create);
        assert!(!config.debug);
        assert_eq!(default_log_filter(config.debug), "secret_migrator=info");
    }

    #[test]
    fn test_missing_project_is_configuration_error() {
        let err = MigrationConfig::from_args(parse(&[])).unwrap_err();
        assert!(matches!(err, MigrationError::Configuration(_)));

        let err = MigrationConfig::from_args(parse(&["--project="])).unwrap_err();
        assert_eq!(err.to_string(), "`--project=` is not defined in arguments");
    }

    #[test]
    fn test_empty_namespace_falls_back_to_default() {
        let config =
            MigrationConfig::from_args(parse(&["--namespace=", "--project=p"])).unwrap();
        assert_eq!(config.namespace, "default");
    }

    #[test]
    fn test_boolean_flags() {
        let config =
            MigrationConfig::from_args(parse(&["--project=p", "--delete", "--debug=True"]))
                .unwrap();
        assert_eq!(config.mode, MigrationMode::Delete);
        assert!(config.debug);
        assert_eq!(default_log_filter(config.debug), "secret_migrator=debug");

        let config =
            MigrationConfig::from_args(parse(&["--project=p", "--delete=false"])).unwrap();
        assert_eq!(config.mode, MigrationMode::Create);
    }

    #[test]
    fn test_exclude_list() {
        let config = MigrationConfig::from_args(parse(&[
            "--project=p",
            "--namespace=apps",
            "--exclude=db-creds,legacy",
        ]))
        .unwrap();
        assert_eq!(config.namespace, "apps");
        assert!(config.exclusions.contains("db-creds"));
        assert!(config.exclusions.contains("legacy"));
    }
}
