//! # Migration
//!
//! Copies cluster secrets into Secret Manager, one destination secret per
//! data key, or deletes those destination secrets again.
//!
//! - [`filter`] decides which secrets and keys take part
//! - [`sanitize`] derives destination names
//! - [`orchestrator`] drives the run
//! - [`report`] holds the audit output

pub mod filter;
pub mod orchestrator;
pub mod report;
pub mod sanitize;

pub use filter::{is_excluded, is_reserved_key, ExclusionSet};
pub use orchestrator::Migrator;
pub use report::{MigrationRecord, RunReport};
pub use sanitize::sanitize_name;

/// What a run does with each destination secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationMode {
    /// Create the destination secret and attach the payload as a version
    Create,
    /// Delete the destination secret
    Delete,
}

impl MigrationMode {
    #[must_use]
    pub fn from_delete_flag(delete: bool) -> Self {
        if delete {
            MigrationMode::Delete
        } else {
            MigrationMode::Create
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationMode::Create => "create",
            MigrationMode::Delete => "delete",
        }
    }
}

impl std::fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
