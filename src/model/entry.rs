use serde::Serialize;
use utoipa::ToSchema;

use super::{Row, Runbook, Trigger};

/// Processing record for one worksheet row
///
/// Created by the workbook parser and carried through runbook creation and
/// trigger building. `status` holds the reason whenever the entry is invalid.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Present once the row passed validation far enough to name the runbook
    pub runbook: Option<Runbook>,
    #[schema(value_type = Object)]
    pub row: Row,
    pub filename: String,
    pub sheetname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runbook_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Trigger>,
}

impl Entry {
    pub fn new(row: Row, filename: &str, sheetname: &str) -> Self {
        Self {
            runbook: None,
            row,
            filename: filename.to_string(),
            sheetname: sheetname.to_string(),
            status: None,
            runbook_id: None,
            trigger: None,
        }
    }

    /// Prefix used in log lines about this entry
    pub fn log_prefix(&self) -> String {
        format!("[file: {}, sheetname: {}]", self.filename, self.sheetname)
    }
}

/// Result of a processing phase: every entry lands in exactly one list
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryPartition {
    pub valid_entries: Vec<Entry>,
    pub invalid_entries: Vec<Entry>,
}

impl EntryPartition {
    pub fn push_valid(&mut self, entry: Entry) {
        self.valid_entries.push(entry);
    }

    /// Record an entry as invalid with the given reason
    pub fn push_invalid(&mut self, mut entry: Entry, status: impl Into<String>) {
        entry.status = Some(status.into());
        self.invalid_entries.push(entry);
    }

    /// Append another partition, keeping order
    pub fn extend(&mut self, other: EntryPartition) {
        self.valid_entries.extend(other.valid_entries);
        self.invalid_entries.extend(other.invalid_entries);
    }

    pub fn total(&self) -> usize {
        self.valid_entries.len() + self.invalid_entries.len()
    }
}
