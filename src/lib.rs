//! Secret Migrator Library
//!
//! Migrates Kubernetes Secrets into Google Cloud Secret Manager. Each data
//! key of a source secret becomes one destination secret named
//! `<secret-name>-<data-key>`; the same names are used to delete the
//! destination secrets again.
//!
//! Tests are included in the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod error;
pub mod migration;
pub mod provider;
