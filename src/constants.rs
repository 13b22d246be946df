//! # Constants
//!
//! Shared constants used throughout the migrator.

/// Namespace scanned when `--namespace` is not set or is empty
pub const DEFAULT_NAMESPACE: &str = "default";

/// Name prefix of the token secrets Kubernetes creates for the default service account
pub const SERVICE_ACCOUNT_TOKEN_PREFIX: &str = "default-token-";

/// Data keys that are never migrated
///
/// - `namespace` is provided on each run (`--namespace`)
/// - `token` is generally a random service account token
/// - `ca.crt` is usually the cluster CA, not an application secret
pub const RESERVED_DATA_KEYS: [&str; 3] = ["namespace", "token", "ca.crt"];

/// Header line of the run report
pub const REPORT_HEADER: &str =
    "k8s_secret_name,google_secret_name,gcp_project,k8s_namespace,secret_key_name";

/// GCP Secret Manager REST endpoint
pub const GCP_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// GCE/GKE metadata server token endpoint (Workload Identity)
pub const GCP_METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Maximum length of a Secret Manager secret id
pub const MAX_SECRET_ID_LEN: usize = 255;
