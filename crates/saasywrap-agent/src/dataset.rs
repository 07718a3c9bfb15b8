// ABOUTME: Summarizes uploaded CSV/Excel datasets into per-sheet column and sample-row digests.
// ABOUTME: Summaries are rendered into prompts so the model can ground requirements in real data.

use std::path::Path;

use serde_json::{Map, Value};

const SAMPLE_ROW_LIMIT: usize = 5;

/// Errors that can occur while reading a dataset file.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Unsupported file type. Please provide a CSV or Excel file.")]
    UnsupportedFileType,

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse workbook: {0}")]
    Excel(#[from] calamine::Error),
}

/// Digest of one sheet: column names, row count, and up to five sample rows
/// as JSON records.
#[derive(Debug, Clone)]
pub struct SheetSummary {
    pub name: String,
    pub columns: Vec<String>,
    pub total_rows: usize,
    pub sample_rows: Vec<Value>,
}

/// Digest of a whole dataset file. A CSV produces a single sheet named
/// `data`; an Excel workbook produces one summary per sheet.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub sheets: Vec<SheetSummary>,
}

impl DatasetSummary {
    /// Read and summarize a dataset file, dispatching on its extension.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Self::from_csv(path),
            Some("xlsx") | Some("xls") => Self::from_excel(path),
            _ => Err(DatasetError::UnsupportedFileType),
        }
    }

    fn from_csv(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut total_rows = 0;
        let mut sample_rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if sample_rows.len() < SAMPLE_ROW_LIMIT {
                sample_rows.push(record_to_json(&columns, record.iter()));
            }
            total_rows += 1;
        }

        Ok(Self {
            sheets: vec![SheetSummary {
                name: "data".to_string(),
                columns,
                total_rows,
                sample_rows,
            }],
        })
    }

    fn from_excel(path: &Path) -> Result<Self, DatasetError> {
        use calamine::Reader;

        let mut workbook = calamine::open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            let mut rows = range.rows();

            // First row is the header, matching how the CSV path reads files.
            let columns: Vec<String> = rows
                .next()
                .map(|header| header.iter().map(|cell| cell.to_string()).collect())
                .unwrap_or_default();

            let mut total_rows = 0;
            let mut sample_rows = Vec::new();
            for row in rows {
                if sample_rows.len() < SAMPLE_ROW_LIMIT {
                    sample_rows.push(record_to_json(
                        &columns,
                        row.iter().map(|cell| cell.to_string()),
                    ));
                }
                total_rows += 1;
            }

            sheets.push(SheetSummary {
                name,
                columns,
                total_rows,
                sample_rows,
            });
        }

        Ok(Self { sheets })
    }

    /// Render the summary for prompt inclusion.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for sheet in &self.sheets {
            lines.push(format!("Sheet: {}", sheet.name));
            lines.push(format!("Columns: {}", sheet.columns.join(", ")));
            lines.push(format!("Total rows: {}", sheet.total_rows));
            lines.push("Sample data:".to_string());
            for row in &sheet.sample_rows {
                lines.push(row.to_string());
            }
            lines.push(String::new());
        }
        lines.join("\n").trim().to_string()
    }
}

fn record_to_json<S: AsRef<str>>(
    columns: &[String],
    values: impl Iterator<Item = S>,
) -> Value {
    let mut record = Map::new();
    for (column, value) in columns.iter().zip(values) {
        record.insert(column.clone(), Value::String(value.as_ref().to_string()));
    }
    Value::Object(record)
}
