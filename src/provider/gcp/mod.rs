//! # GCP Secret Manager
//!
//! Destination store for migrated secrets.
//!
//! Secrets are written through the Secret Manager REST API v1 using
//! [`SecretManagerREST`].

pub mod client;

pub use client::SecretManagerREST;
