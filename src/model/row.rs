//! Worksheet rows keyed by column header

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column headers the importer understands
pub mod columns {
    pub const BUSINESS_FUNCTION: &str = "BF";
    pub const SUMMARY: &str = "Netcool/Summary";
    pub const CLASS: &str = "Class";
    pub const SEVERITY: &str = "Severity";
    pub const TAGS: &str = "Tags";
    pub const DESCRIPTION: &str = "Beschreibung";
    pub const REMEDIATION: &str = "Maßnahmen";
    pub const MULTI_STEPS: &str = "Multi steps";
    pub const MULTI_STEP_COUNT: &str = "Multi step count";

    /// Value of the `Multi steps` column that enables multi-step mode
    pub const MULTI_STEPS_ENABLED: &str = "ja";

    pub fn step_title(index: usize) -> String {
        format!("Step {} - Titel", index)
    }

    pub fn step_description(index: usize) -> String {
        format!("Step {} - Beschreibung", index)
    }
}

/// One worksheet record
///
/// Cells keep the column order of the sheet header. Empty cells are not stored,
/// so a missing key and an empty cell look the same to callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cell value, ignoring empty strings and nulls
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        match &value {
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            _ => {
                self.0.insert(column.into(), value);
            }
        }
    }

    /// Get a cell as text
    ///
    /// Returns `None` when the column is absent or the cell is an empty string.
    /// Numbers and booleans are rendered the way they appear in the sheet.
    pub fn get_field(&self, column: &str) -> Option<String> {
        match self.0.get(column)? {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}
