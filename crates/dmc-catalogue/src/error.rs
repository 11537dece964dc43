//! Error types for catalogue loading.

use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

type FmtString = SmartString<LazyCompact>;

/// Result type alias for catalogue operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading an identifier catalogue.
#[derive(Debug, Error)]
pub enum Error {
    /// A data line did not contain exactly three `;`-separated fields.
    #[error("malformed catalogue line {line_no}: expected 3 fields, found {found}")]
    CatalogueFormat {
        /// 1-based line number in the source file.
        line_no: usize,
        /// Number of fields actually found.
        found: usize,
    },

    /// A data identifier did not match the `\d{0,2}[B-Z]` grammar.
    #[error("invalid data identifier '{di}' at line {line_no}")]
    InvalidDataIdentifier {
        /// The offending identifier text.
        di: FmtString,
        /// 1-based line number in the source file.
        line_no: usize,
    },

    /// A catalogue entry's format spec failed to compile.
    #[error("catalogue entry '{di}' has an invalid format spec: {source}")]
    BadFormatSpec {
        /// The data identifier whose spec is invalid.
        di: FmtString,
        /// The underlying compile error.
        #[source]
        source: dmc_format::Error,
    },

    /// I/O failure while reading the catalogue file.
    #[error("failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),
}
