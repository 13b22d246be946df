//! # Run Report
//!
//! Audit output of a run: one CSV row per processed data key.

use super::MigrationMode;
use crate::constants::REPORT_HEADER;
use std::io::{self, Write};

/// Notice printed when a run processed nothing
pub const NOTHING_FOUND_NOTICE: &str = "No secrets found to copy, no action taken";

/// One processed (secret, data key) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub source_name: String,
    pub destination_name: String,
    pub project: String,
    pub namespace: String,
    pub data_key: String,
    pub mode: MigrationMode,
}

impl MigrationRecord {
    /// `source,destination,project,namespace,"data_key"`
    #[must_use]
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},\"{}\"",
            self.source_name, self.destination_name, self.project, self.namespace, self.data_key
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    records: Vec<MigrationRecord>,
}

impl RunReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MigrationRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn records(&self) -> &[MigrationRecord] {
        &self.records
    }

    /// Number of records produced during the run
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Destination names in processing order
    #[must_use]
    pub fn processed_names(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.destination_name.as_str())
            .collect()
    }

    /// Report lines: the header once followed by every row, or the
    /// nothing-found notice for an empty run
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        if self.records.is_empty() {
            return vec![NOTHING_FOUND_NOTICE.to_string()];
        }

        std::iter::once(REPORT_HEADER.to_string())
            .chain(self.records.iter().map(MigrationRecord::to_csv_row))
            .collect()
    }

    /// Write the report lines to `out`
    ///
    /// # Errors
    /// Returns an error if writing fails
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in self.lines() {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}
