use legis_types::RecordError;
use serde::Serialize;
use thiserror::Error;

/// Caller-facing failures. Per-row data problems are never errors; they
/// surface as [`JoinDiagnostic`]s and the batch continues.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unknown filter dimension: {0}")]
    UnknownDimension(String),

    #[error("invalid export row {row}: {source}")]
    InvalidExportRow {
        row: usize,
        #[source]
        source: RecordError,
    },

    #[error("export serialization failed: {0}")]
    Export(#[from] serde_json::Error),
}

/// Which source table a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTable {
    Paragraphs,
    Legislation,
}

/// A recoverable problem found while joining the source tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JoinDiagnostic {
    /// Paragraph refers to a legislation id with no metadata record
    UnresolvedLegislation {
        paragraph_id: String,
        legislation_id: String,
    },
    /// A second metadata record reused an id; the first one is kept
    DuplicateLegislation { legislation_id: String },
    /// Row failed validation and was skipped
    InvalidRow {
        table: SourceTable,
        row: usize,
        reason: String,
    },
}

impl std::fmt::Display for JoinDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinDiagnostic::UnresolvedLegislation {
                paragraph_id,
                legislation_id,
            } => write!(
                f,
                "paragraph {} references unknown legislation {}",
                paragraph_id, legislation_id
            ),
            JoinDiagnostic::DuplicateLegislation { legislation_id } => {
                write!(f, "duplicate legislation id {}", legislation_id)
            }
            JoinDiagnostic::InvalidRow { table, row, reason } => {
                write!(f, "{:?} row {} skipped: {}", table, row, reason)
            }
        }
    }
}
