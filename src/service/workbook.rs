//! Excel workbook parsing into runbook entries

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, open_workbook_auto};
use serde_json::{Number, Value};

use crate::model::{Entry, EntryPartition, Row};
use crate::service::transform::{RowOutcome, RowTransformer};

#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("Failed to open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

impl WorkbookError {
    /// Status shown for entries of a workbook that could not be read
    pub fn status(&self) -> String {
        format!("Datei konnte nicht gelesen werden: {}", self)
    }
}

/// Parses every sheet of every workbook with a [`RowTransformer`]
#[derive(Debug, Clone)]
pub struct WorkbookParser {
    transformer: RowTransformer,
}

impl WorkbookParser {
    pub fn new(transformer: RowTransformer) -> Self {
        Self { transformer }
    }

    pub fn transformer(&self) -> &RowTransformer {
        &self.transformer
    }

    /// Parse files in order, keeping file, sheet and row order in the result
    ///
    /// A workbook that cannot be read contributes one invalid entry and the
    /// remaining files are still parsed.
    pub fn parse_files(&self, paths: &[PathBuf]) -> EntryPartition {
        tracing::info!(files = paths.len(), "Parsing excel files into runbooks");

        let mut partition = EntryPartition::default();

        for path in paths {
            match self.parse_file(path) {
                Ok(file_partition) => partition.extend(file_partition),
                Err(e) => {
                    let filename = display_name(path);
                    tracing::error!(file = %filename, error = %e, "Failed to parse workbook");
                    partition.push_invalid(Entry::new(Row::new(), &filename, ""), e.status());
                }
            }
        }

        tracing::info!(
            valid = partition.valid_entries.len(),
            invalid = partition.invalid_entries.len(),
            "Finished parsing excel files"
        );

        partition
    }

    /// Parse all sheets of a single workbook
    pub fn parse_file(&self, path: &Path) -> Result<EntryPartition, WorkbookError> {
        let filename = display_name(path);
        let mut workbook = open_workbook_auto(path)?;

        let mut partition = EntryPartition::default();

        for sheetname in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&sheetname)
                .map_err(|source| WorkbookError::Sheet {
                    sheet: sheetname.clone(),
                    source,
                })?;

            let rows = sheet_rows(&range);
            tracing::info!(
                file = %filename,
                sheet = %sheetname,
                rows = rows.len(),
                "Parsing sheet"
            );

            for row in rows {
                match self.transformer.transform(row, &filename, &sheetname) {
                    RowOutcome::Valid(entry) => partition.valid_entries.push(entry),
                    RowOutcome::Invalid(entry) => partition.invalid_entries.push(entry),
                }
            }
        }

        Ok(partition)
    }
}

/// Convert a sheet into rows keyed by the header row
///
/// Rows without any non-empty cell are skipped.
pub fn sheet_rows(range: &Range<Data>) -> Vec<Row> {
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns = header_names(header);

    rows.filter_map(|cells| {
        let row: Row = columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| (column.as_str(), cell_value(cell)))
            .collect();

        (!row.is_empty()).then_some(row)
    })
    .collect()
}

/// Header cell texts, with blanks named `__EMPTY` and repeats suffixed `_1`, `_2`, ...
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();

    header
        .iter()
        .map(|cell| {
            let base = match cell_value(cell) {
                Value::String(s) => s,
                Value::Null => "__EMPTY".to_string(),
                other => other.to_string(),
            };

            let mut name = base.clone();
            let mut suffix = 0;
            while !seen.insert(name.clone()) {
                suffix += 1;
                name = format!("{}_{}", base, suffix);
            }
            name
        })
        .collect()
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Float(f) => float_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => Value::String(e.to_string()),
        _ => Value::Null,
    }
}

/// Whole numbers are kept integral so `3.0` reads as `3`
fn float_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Value::Number((f as i64).into())
    } else {
        Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::severity::SeverityResolver;
    use crate::test_support::{HEADER, Sheet, invalid_cells, valid_cells, write_workbook};
    use serde_json::json;

    fn parser() -> WorkbookParser {
        WorkbookParser::new(RowTransformer::new(SeverityResolver::default()))
    }

    #[test]
    fn test_parse_multiple_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alerts.xlsx");
        write_workbook(
            &path,
            &[
                Sheet {
                    name: "Linux",
                    header: HEADER,
                    rows: vec![valid_cells("PAY", "Disk full"), invalid_cells("PAY")],
                },
                Sheet {
                    name: "Windows",
                    header: HEADER,
                    rows: vec![valid_cells("HR", "CPU high")],
                },
            ],
        );

        let partition = parser().parse_file(&path).unwrap();

        assert_eq!(partition.total(), 3);
        assert_eq!(partition.valid_entries.len(), 2);
        assert_eq!(partition.valid_entries[0].sheetname, "Linux");
        assert_eq!(partition.valid_entries[1].sheetname, "Windows");
        assert_eq!(
            partition.valid_entries[1].runbook.as_ref().unwrap().name,
            "[HR] Linux - CPU high (4)"
        );
        assert_eq!(partition.invalid_entries[0].filename, "alerts.xlsx");
        assert_eq!(
            partition.invalid_entries[0].status.as_deref(),
            Some("Die Felder 'BF', 'Class', 'Severity' und 'Beschreibung' sind erforderlich")
        );
    }

    #[test]
    fn test_blank_rows_and_numeric_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi.xlsx");
        let header = &[
            "BF",
            "Class",
            "Severity",
            "Beschreibung",
            "Multi steps",
            "Multi step count",
            "Step 1 - Titel",
            "Step 1 - Beschreibung",
            "Step 2 - Titel",
            "Step 2 - Beschreibung",
        ];
        write_workbook(
            &path,
            &[Sheet {
                name: "Steps",
                header,
                rows: vec![
                    vec![Value::Null; header.len()],
                    vec![
                        json!("OPS"),
                        json!("Db"),
                        json!("Minor"),
                        json!("Slow queries"),
                        json!("ja"),
                        json!(2),
                        json!("Check"),
                        json!("Inspect slow log"),
                        json!("Fix"),
                        json!("Add index"),
                    ],
                ],
            }],
        );

        let partition = parser().parse_file(&path).unwrap();

        assert_eq!(partition.total(), 1);
        let entry = &partition.valid_entries[0];
        assert_eq!(entry.row.get_field("Multi step count").as_deref(), Some("2"));
        let steps = &entry.runbook.as_ref().unwrap().steps;
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].title.as_deref(), Some("Fix"));
        assert_eq!(steps[1].description, "Add index");
    }

    #[test]
    fn test_unreadable_file_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.xlsx");
        std::fs::write(&broken, b"definitely not a zip archive").unwrap();
        let good = dir.path().join("good.xlsx");
        write_workbook(
            &good,
            &[Sheet {
                name: "Sheet1",
                header: HEADER,
                rows: vec![valid_cells("PAY", "Disk full")],
            }],
        );

        let partition = parser().parse_files(&[broken, good]);

        assert_eq!(partition.valid_entries.len(), 1);
        assert_eq!(partition.invalid_entries.len(), 1);
        let failed = &partition.invalid_entries[0];
        assert_eq!(failed.filename, "broken.xlsx");
        assert!(failed.row.is_empty());
        assert!(
            failed
                .status
                .as_deref()
                .unwrap()
                .starts_with("Datei konnte nicht gelesen werden")
        );
    }

    #[test]
    fn test_files_keep_submission_order() {
        let dir = tempfile::tempdir().unwrap();
        let valid = dir.path().join("valid.xlsx");
        let invalid = dir.path().join("invalid.xlsx");
        write_workbook(
            &valid,
            &[Sheet {
                name: "A",
                header: HEADER,
                rows: vec![valid_cells("ONE", "first"), valid_cells("TWO", "second")],
            }],
        );
        write_workbook(
            &invalid,
            &[Sheet {
                name: "B",
                header: HEADER,
                rows: vec![invalid_cells("THREE"), invalid_cells("FOUR")],
            }],
        );

        let partition = parser().parse_files(&[invalid.clone(), valid.clone()]);

        assert_eq!(partition.total(), 4);
        let valid_bfs: Vec<_> = partition
            .valid_entries
            .iter()
            .map(|e| (e.filename.as_str(), e.row.get_field("BF").unwrap()))
            .collect();
        assert_eq!(
            valid_bfs,
            vec![
                ("valid.xlsx", "ONE".to_string()),
                ("valid.xlsx", "TWO".to_string())
            ]
        );
        assert!(
            partition
                .invalid_entries
                .iter()
                .all(|e| e.filename == "invalid.xlsx" && e.sheetname == "B")
        );

        let again = parser().parse_files(&[invalid, valid]);
        assert_eq!(partition, again);
    }

    #[test]
    fn test_header_names() {
        let header = vec![
            Data::String("A".into()),
            Data::Empty,
            Data::String("A".into()),
            Data::Int(7),
        ];

        assert_eq!(header_names(&header), vec!["A", "__EMPTY", "A_1", "7"]);
    }

    #[test]
    fn test_float_value() {
        assert_eq!(float_value(3.0), json!(3));
        assert_eq!(float_value(2.5), json!(2.5));
        assert_eq!(float_value(f64::NAN), Value::Null);
    }
}
