//! Error taxonomy for ingestion, order mutation, and filter queries.
//!
//! Row-level failures are deliberately not represented here: a row that
//! fails required-field or parse validation is logged and dropped by the
//! normalizer, and never aborts its batch.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Upload extension/kind not recognized; rejected before any parsing.
    #[error("unsupported file format: {file_name} (expected spreadsheet or delimited text)")]
    UnsupportedFormat { file_name: String },

    /// Zero valid records after normalization; nothing persisted, no stock
    /// adjusted.
    #[error("no valid order records found in upload")]
    EmptyBatch,

    /// Update/delete target does not exist. No partial mutation happened.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A date bound in a filter query failed to parse. This is a caller
    /// error, not an absent filter.
    #[error("malformed filter input {input:?}: {reason}")]
    MalformedFilter { input: String, reason: String },

    /// The spreadsheet payload could not be read at all (batch-level).
    #[error("failed to read workbook: {0}")]
    Workbook(String),

    /// The delimited-text payload could not be read at all (batch-level).
    #[error("failed to read delimited input: {0}")]
    Delimited(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable category label for structured logs.
    pub fn category(&self) -> &'static str {
        match self {
            Error::UnsupportedFormat { .. } => "unsupported_format",
            Error::EmptyBatch => "empty_batch",
            Error::NotFound { .. } => "not_found",
            Error::MalformedFilter { .. } => "malformed_filter",
            Error::Workbook(_) | Error::Delimited(_) => "unreadable_payload",
            Error::Io(_) => "io",
        }
    }
}
