use crate::core::error::ReportError;
use crate::core::io;
use crate::core::model::BuscoTableRow;
use std::path::Path;

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "organism",
    "version",
    "group",
    "dataset_name",
    "single copy",
    "multi copy",
    "fragmented",
    "missing",
    "one_line_summary",
];

/// Reads a BUSCO results table (CSV, or TSV when the first line holds a tab).
pub fn read_table(path: &Path) -> Result<Vec<BuscoTableRow>, ReportError> {
    let text = io::read_text(path)?;
    parse_table_text(&text, path)
}

pub fn parse_table_text(text: &str, path: &Path) -> Result<Vec<BuscoTableRow>, ReportError> {
    let first_line = text.lines().next().unwrap_or("");
    let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let table_error = |detail: String| ReportError::unparseable(
        format!("BUSCO table {}", path.display()),
        detail,
    );

    let headers = reader
        .headers()
        .map_err(|e| table_error(format!("a delimited header line ({e})")))?
        .clone();
    let mut index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers.iter().position(|h| h == column).ok_or_else(|| {
            ReportError::MissingRequiredColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            }
        })?;
    }
    let [organism, version, group, dataset_name, single, multi, fragmented, missing, summary] =
        index;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row_num = i + 2;
        let record = record.map_err(|e| table_error(format!("well-formed rows ({e})")))?;
        let text_at = |col: usize| record.get(col).unwrap_or("").to_string();
        let number_at = |col: usize| -> Result<f64, ReportError> {
            let raw = record.get(col).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| {
                table_error(format!(
                    "a number in column '{}' on line {row_num}, got '{raw}'",
                    headers.get(col).unwrap_or("")
                ))
            })
        };
        rows.push(BuscoTableRow {
            organism: text_at(organism),
            version: text_at(version),
            group: text_at(group),
            dataset_name: text_at(dataset_name),
            single_copy: number_at(single)?,
            multi_copy: number_at(multi)?,
            fragmented: number_at(fragmented)?,
            missing: number_at(missing)?,
            one_line_summary: text_at(summary),
        });
    }

    if rows.is_empty() {
        return Err(table_error("at least one data row".to_string()));
    }
    Ok(rows)
}
