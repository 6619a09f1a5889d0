//! Upload normalization: turns raw uploaded bytes plus a declared file kind
//! into canonical order records. Pure transformation; persistence and
//! inventory effects belong to the service layer.

pub mod delimited;
pub(crate) mod parse;
pub mod sheet;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::model::NewOrder;
use delimited::DelimitedNormalizer;
use sheet::SheetNormalizer;
use std::path::Path;

/// Declared kind of an upload, resolved from the file name extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Spreadsheet,
    DelimitedText,
}

/// One normalization strategy. Implementations share required-field
/// validation and the status/date/number parsers in [`parse`].
pub trait Normalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<NewOrder>>;
}

pub fn normalizer_for(kind: FileKind) -> Box<dyn Normalizer> {
    match kind {
        FileKind::Spreadsheet => Box::new(SheetNormalizer),
        FileKind::DelimitedText => Box::new(DelimitedNormalizer),
    }
}

/// Resolves the declared kind from the upload's file name against the
/// configured extension sets. Unknown extensions are rejected before any
/// parsing happens.
pub fn detect_kind(file_name: &str, config: &AppConfig) -> Result<FileKind> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if config.spreadsheet_extensions.iter().any(|e| *e == extension) {
        Ok(FileKind::Spreadsheet)
    } else if config.delimited_extensions.iter().any(|e| *e == extension) {
        Ok(FileKind::DelimitedText)
    } else {
        Err(Error::UnsupportedFormat {
            file_name: file_name.to_string(),
        })
    }
}

/// Normalizes an upload in one call: strategy selection plus parsing.
pub fn normalize(bytes: &[u8], kind: FileKind) -> Result<Vec<NewOrder>> {
    normalizer_for(kind).normalize(bytes)
}
