//! # Exclusion Filter
//!
//! Decides which secrets and data keys take part in a migration.

use crate::constants::{RESERVED_DATA_KEYS, SERVICE_ACCOUNT_TOKEN_PREFIX};
use std::collections::BTreeSet;

/// Secret names excluded from a run
///
/// Built once from the comma-delimited `--exclude` value. Entries are
/// matched verbatim: no trimming, case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    raw: String,
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Parse a comma-delimited list of secret names
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let names = raw
            .split(',')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            raw: raw.to_string(),
            names,
        }
    }

    /// The `--exclude` value as given on the command line
    #[must_use]
    pub fn as_raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Why a secret was left out of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Name starts with `default-token-`
    ServiceAccountToken,
    /// Name is listed in `--exclude`
    Excluded,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ServiceAccountToken => "default service account token",
            SkipReason::Excluded => "listed in --exclude",
        }
    }
}

/// Reason a secret is skipped, or `None` when it is migrated
#[must_use]
pub fn skip_reason(source_name: &str, exclusions: &ExclusionSet) -> Option<SkipReason> {
    if source_name.starts_with(SERVICE_ACCOUNT_TOKEN_PREFIX) {
        Some(SkipReason::ServiceAccountToken)
    } else if exclusions.contains(source_name) {
        Some(SkipReason::Excluded)
    } else {
        None
    }
}

#[must_use]
pub fn is_excluded(source_name: &str, exclusions: &ExclusionSet) -> bool {
    skip_reason(source_name, exclusions).is_some()
}

/// Data keys that are never migrated (`namespace`, `token`, `ca.crt`)
#[must_use]
pub fn is_reserved_key(data_key: &str) -> bool {
    RESERVED_DATA_KEYS.contains(&data_key)
}
