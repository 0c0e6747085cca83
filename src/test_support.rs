//! Helpers shared by unit tests

use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde_json::{Value, json};

/// One worksheet: header row plus data rows, `Value::Null` leaves a cell empty
pub struct Sheet<'a> {
    pub name: &'a str,
    pub header: &'a [&'a str],
    pub rows: Vec<Vec<Value>>,
}

/// Write an `.xlsx` file with the given sheets
pub fn write_workbook(path: &Path, sheets: &[Sheet<'_>]) {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).unwrap();

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title).unwrap();
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    Value::String(s) => {
                        worksheet.write_string(row_num, col as u16, s).unwrap();
                    }
                    Value::Number(n) => {
                        worksheet
                            .write_number(row_num, col as u16, n.as_f64().unwrap())
                            .unwrap();
                    }
                    _ => {}
                }
            }
        }
    }

    workbook.save(path).unwrap();
}

/// Header used by most workbook fixtures
pub const HEADER: &[&str] = &[
    "BF",
    "Netcool/Summary",
    "Class",
    "Severity",
    "Tags",
    "Beschreibung",
    "Maßnahmen",
];

/// A row matching [`HEADER`] that passes validation
pub fn valid_cells(bf: &str, summary: &str) -> Vec<Value> {
    vec![
        json!(bf),
        json!(summary),
        json!("Linux"),
        json!("Major"),
        json!("ops"),
        json!("Check the host"),
        json!("1. Login 2. Restart"),
    ]
}

/// A row matching [`HEADER`] that lacks the required class
pub fn invalid_cells(bf: &str) -> Vec<Value> {
    vec![
        json!(bf),
        json!("Summary"),
        Value::Null,
        json!("Major"),
        Value::Null,
        json!("Check the host"),
        json!("Restart"),
    ]
}
