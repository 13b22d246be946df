//! Common utilities and helpers for GCP Secret Manager clients
//!
//! Resource path formatting, error classification and span bookkeeping.

use crate::error::WriterError;
use std::time::{Duration, Instant};
use tracing::Span;

/// Formats a GCP project resource path
pub fn format_project_path(project_id: &str) -> String {
    format!("projects/{project_id}")
}

/// Formats a GCP secret resource path
pub fn format_secret_path(project_id: &str, secret_name: &str) -> String {
    format!("projects/{project_id}/secrets/{secret_name}")
}

/// Short secret id from a full resource name (`projects/p/secrets/x` -> `x`)
pub fn secret_id_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Classify a failed Secret Manager response
///
/// The canonical `status` string wins over the HTTP code when present.
pub fn classify_error(
    http_status: u16,
    gcp_status: Option<&str>,
    secret_name: &str,
    message: String,
) -> WriterError {
    let name = secret_name.to_string();
    match (gcp_status, http_status) {
        (Some("ALREADY_EXISTS"), _) | (None, 409) => WriterError::AlreadyExists(name),
        (Some("NOT_FOUND"), _) | (None, 404) => WriterError::NotFound(name),
        (Some("PERMISSION_DENIED"), _) | (None, 403) => WriterError::PermissionDenied(name),
        _ => WriterError::Unknown { name, message },
    }
}

/// Records span attributes for a successful operation
pub fn record_success(span: &Span, duration: Duration) {
    span.record("operation.duration_ms", duration.as_millis() as u64);
    span.record("operation.success", true);
}

/// Records span attributes for a failed operation
pub fn record_error(span: &Span, error_message: &str, duration: Duration) {
    span.record("operation.success", false);
    span.record("error.message", error_message);
    span.record("operation.duration_ms", duration.as_millis() as u64);
}

/// Helper struct for tracking operation state
#[derive(Debug)]
pub struct OperationTracker {
    start: Instant,
    span: Span,
}

impl OperationTracker {
    /// Create a new operation tracker
    pub fn new(span: Span) -> Self {
        Self {
            start: Instant::now(),
            span,
        }
    }

    pub fn record_success(&self) {
        record_success(&self.span, self.start.elapsed());
    }

    pub fn record_error(&self, error: &WriterError) {
        record_error(&self.span, &error.to_string(), self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_paths() {
        assert_eq!(format_project_path("my-project"), "projects/my-project");
        assert_eq!(
            format_secret_path("my-project", "app-cfg-config-json"),
            "projects/my-project/secrets/app-cfg-config-json"
        );
        assert_eq!(
            secret_id_from_path("projects/my-project/secrets/app-cfg-config-json"),
            "app-cfg-config-json"
        );
    }

    #[test]
    fn test_classify_error_prefers_gcp_status() {
        let err = classify_error(400, Some("ALREADY_EXISTS"), "db-password", String::new());
        assert!(matches!(err, WriterError::AlreadyExists(name) if name == "db-password"));

        let err = classify_error(403, Some("PERMISSION_DENIED"), "db-password", String::new());
        assert!(matches!(err, WriterError::PermissionDenied(_)));
    }

    #[test]
    fn test_classify_error_falls_back_to_http_status() {
        assert!(matches!(
            classify_error(409, None, "x", String::new()),
            WriterError::AlreadyExists(_)
        ));
        assert!(matches!(
            classify_error(404, None, "x", String::new()),
            WriterError::NotFound(_)
        ));
        match classify_error(500, Some("INTERNAL"), "x", "backend error".to_string()) {
            WriterError::Unknown { message, .. } => assert_eq!(message, "backend error"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
