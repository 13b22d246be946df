//! GCP Secret Manager Client Implementations
//!
//! - **REST Client**: Native REST implementation using reqwest

pub mod common;
pub mod rest;

pub use rest::SecretManagerREST;
