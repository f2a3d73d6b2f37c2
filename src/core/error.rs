use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("file not readable: {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output directory not writable: {}", path.display())]
    UnwritableOutputDirectory { path: PathBuf },

    #[error("invalid GFF format at line {line}: expected 9 columns, got {fields}")]
    MalformedAnnotationLine { line: usize, fields: usize },

    #[error("could not parse {what}: expected {expected}")]
    UnparseableSummary { what: String, expected: String },

    #[error("missing column: {column} in {}", path.display())]
    MissingRequiredColumn { column: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn unparseable(what: impl Into<String>, expected: impl Into<String>) -> Self {
        ReportError::UnparseableSummary {
            what: what.into(),
            expected: expected.into(),
        }
    }
}
