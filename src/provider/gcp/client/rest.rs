//! GCP Secret Manager REST Client
//!
//! Native REST implementation for GCP Secret Manager API v1.
//! Uses reqwest for HTTP requests and OAuth2 bearer tokens for authentication.
//!
//! References:
//! - [GCP Secret Manager REST API v1](https://cloud.google.com/secret-manager/docs/reference/rest)

use crate::constants::{GCP_METADATA_TOKEN_URL, GCP_SECRET_MANAGER_ENDPOINT};
use crate::error::WriterError;
use crate::provider::{SecretHandle, SecretWriter, VersionHandle};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, field::Empty, info, info_span, Instrument};

use super::common::{
    classify_error, format_project_path, format_secret_path, secret_id_from_path,
    OperationTracker,
};

/// GCP Secret Manager REST client
pub struct SecretManagerREST {
    http_client: Client,
    base_url: String,
    access_token: String,
}

// ============================================================================
// Request Structures
// ============================================================================

/// Replication configuration for a secret
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets#Replication
#[derive(Debug, Serialize)]
struct Replication {
    automatic: AutomaticReplication,
}

#[derive(Debug, Serialize)]
struct AutomaticReplication {}

/// Request body for `POST /v1/projects/{project}/secrets?secretId={id}`
///
/// Creates the secret metadata only. The value is attached with `AddVersionRequest`.
#[derive(Debug, Serialize)]
struct CreateSecretRequest {
    replication: Replication,
}

/// Secret payload, base64-encoded on the wire
#[derive(Debug, Serialize)]
struct SecretPayload {
    data: String,
}

/// Request body for `POST /v1/projects/{project}/secrets/{secret}:addVersion`
#[derive(Debug, Serialize)]
struct AddVersionRequest {
    payload: SecretPayload,
}

// ============================================================================
// Response Structures
// ============================================================================

/// Resource returned by create and addVersion
#[derive(Debug, Deserialize)]
struct ResourceResponse {
    name: String,
}

/// GCP API error response wrapper
///
/// API Reference: https://cloud.google.com/apis/design/errors
#[derive(Debug, Deserialize)]
struct GcpErrorResponse {
    error: GcpError,
}

#[derive(Debug, Deserialize)]
struct GcpError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// OAuth2 access token response from the GCP metadata server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl std::fmt::Debug for SecretManagerREST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerREST")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SecretManagerREST {
    /// Create a new GCP REST client with authentication
    ///
    /// When `PACT_MODE` is set, uses a dummy token and routes to the endpoint
    /// in `GCP_SECRET_MANAGER_ENDPOINT`.
    ///
    /// # Errors
    /// Returns an error if client initialization or token retrieval fails
    pub async fn new() -> Result<Self> {
        let base_url = resolve_base_url(
            std::env::var("PACT_MODE").is_ok(),
            std::env::var("GCP_SECRET_MANAGER_ENDPOINT").ok(),
        );

        if std::env::var("PACT_MODE").is_ok() {
            info!("Pact mode enabled: using endpoint {}", base_url);
        }

        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        let access_token = Self::get_access_token(&http_client).await?;

        Ok(Self {
            http_client,
            base_url,
            access_token,
        })
    }

    /// Create a client for a given endpoint and access token
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn with_endpoint(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(&base_url.into()),
            access_token: access_token.into(),
        })
    }

    /// Get OAuth2 access token for GCP API authentication
    ///
    /// Resolution order:
    /// - Pact mode - returns dummy token
    /// - `GOOGLE_OAUTH_ACCESS_TOKEN` (e.g. `gcloud auth print-access-token`)
    /// - Metadata server (Workload Identity) - for GKE/GCE
    async fn get_access_token(http_client: &Client) -> Result<String> {
        if std::env::var("PACT_MODE").is_ok() {
            debug!("Pact mode: using dummy access token");
            return Ok("test-token".to_string());
        }

        if let Ok(token) = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
            if !token.is_empty() {
                info!("Using access token from GOOGLE_OAUTH_ACCESS_TOKEN");
                return Ok(token);
            }
        }

        match http_client
            .get(GCP_METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                let token_response: TokenResponse = response
                    .json()
                    .await
                    .context("Failed to parse token response from metadata server")?;
                info!("Retrieved access token from metadata server (Workload Identity)");
                return Ok(token_response.access_token);
            }
            Ok(response) => {
                debug!(
                    "Metadata server returned status {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                );
            }
            Err(e) => {
                debug!("Metadata server not available: {}", e);
            }
        }

        Err(anyhow::anyhow!(
            "Failed to get access token. Ensure:\n\
            1. GOOGLE_OAUTH_ACCESS_TOKEN is set (gcloud auth print-access-token), OR\n\
            2. Running in GKE/GCE with Workload Identity enabled"
        ))
    }

    /// Build HTTP request with authentication headers
    fn make_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/v1/{}", self.base_url, path);

        let auth_header = if self.access_token.starts_with("Bearer ") {
            self.access_token.clone()
        } else {
            format!("Bearer {}", self.access_token)
        };

        self.http_client
            .request(method, url)
            .header("Authorization", auth_header)
            .header("Content-Type", "application/json")
    }

    /// Send a request and decode the success body, classifying failures
    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        secret_name: &str,
    ) -> Result<T, WriterError> {
        let response = request.send().await.map_err(|e| WriterError::Unknown {
            name: secret_name.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::handle_error_response(
                status.as_u16(),
                error_text,
                secret_name,
            ));
        }

        response.json().await.map_err(|e| WriterError::Unknown {
            name: secret_name.to_string(),
            message: format!("failed to parse response: {e}"),
        })
    }

    /// Handle GCP API error responses
    fn handle_error_response(status: u16, error_text: String, secret_name: &str) -> WriterError {
        match serde_json::from_str::<GcpErrorResponse>(&error_text) {
            Ok(error_response) => classify_error(
                status,
                error_response.error.status.as_deref(),
                secret_name,
                error_response.error.message,
            ),
            Err(_) => classify_error(
                status,
                None,
                secret_name,
                format!("HTTP {status}: {error_text}"),
            ),
        }
    }
}

/// Endpoint to send requests to; the override only applies in Pact mode
fn resolve_base_url(pact_mode: bool, endpoint_override: Option<String>) -> String {
    match endpoint_override {
        Some(endpoint) if pact_mode => normalize_base_url(&endpoint),
        _ => GCP_SECRET_MANAGER_ENDPOINT.to_string(),
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl SecretWriter for SecretManagerREST {
    async fn create_secret(
        &self,
        secret_name: &str,
        project: &str,
    ) -> Result<SecretHandle, WriterError> {
        let span = info_span!(
            "gcp.secret.create",
            secret.name = secret_name,
            project.id = project,
            operation.success = Empty,
            operation.duration_ms = Empty,
            error.message = Empty
        );

        async {
            let tracker = OperationTracker::new(tracing::Span::current());
            let body = CreateSecretRequest {
                replication: Replication {
                    automatic: AutomaticReplication {},
                },
            };
            let path = format!("{}/secrets", format_project_path(project));
            let request = self
                .make_request(Method::POST, &path)
                .query(&[("secretId", secret_name)])
                .json(&body);

            match Self::send::<ResourceResponse>(request, secret_name).await {
                Ok(resource) => {
                    tracker.record_success();
                    debug!("Created GCP secret container: {}", resource.name);
                    Ok(SecretHandle {
                        name: resource.name,
                    })
                }
                Err(e) => {
                    tracker.record_error(&e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn add_version(
        &self,
        handle: &SecretHandle,
        payload: &[u8],
    ) -> Result<VersionHandle, WriterError> {
        let secret_name = secret_id_from_path(&handle.name);
        let span = info_span!(
            "gcp.secret.add_version",
            secret.name = secret_name,
            operation.success = Empty,
            operation.duration_ms = Empty,
            error.message = Empty
        );

        async {
            let tracker = OperationTracker::new(tracing::Span::current());
            // GCP Secret Manager expects base64-encoded data
            let body = AddVersionRequest {
                payload: SecretPayload {
                    data: general_purpose::STANDARD.encode(payload),
                },
            };
            let request = self
                .make_request(Method::POST, &format!("{}:addVersion", handle.name))
                .json(&body);

            match Self::send::<ResourceResponse>(request, secret_name).await {
                Ok(resource) => {
                    tracker.record_success();
                    Ok(VersionHandle {
                        name: resource.name,
                    })
                }
                Err(e) => {
                    tracker.record_error(&e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn delete_secret(&self, secret_name: &str, project: &str) -> Result<(), WriterError> {
        let span = info_span!(
            "gcp.secret.delete",
            secret.name = secret_name,
            project.id = project,
            operation.success = Empty,
            operation.duration_ms = Empty,
            error.message = Empty
        );

        async {
            let tracker = OperationTracker::new(tracing::Span::current());
            let request =
                self.make_request(Method::DELETE, &format_secret_path(project, secret_name));

            match Self::send::<serde_json::Value>(request, secret_name).await {
                Ok(_) => {
                    tracker.record_success();
                    Ok(())
                }
                Err(e) => {
                    tracker.record_error(&e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}
