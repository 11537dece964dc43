//! Error types for message framing, validation, and symbol encoding.

use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

type FmtString = SmartString<LazyCompact>;

/// Result type alias for `dmc` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type covering the whole build/parse/encode pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A catalogue entry's format spec failed to compile, or a field
    /// failed to match its format spec at validation time.
    #[error("format error: {0}")]
    Format(#[from] dmc_format::Error),

    /// The identifier catalogue could not be loaded.
    #[error("catalogue error: {0}")]
    Catalogue(#[from] dmc_catalogue::Error),

    /// A field string did not start with a recognizable data identifier.
    #[error("no data identifier at start of field '{field}'")]
    NoDataIdentifier {
        /// The offending field text.
        field: FmtString,
    },

    /// A field's data identifier is not present in the catalogue.
    #[error("unknown data identifier '{di}'")]
    UnknownDataIdentifier {
        /// The unrecognized identifier.
        di: FmtString,
    },

    /// A field's content violated its catalogue format spec.
    #[error("field '{di}' value '{value}' does not match format '{format}'")]
    FormatMismatch {
        /// The data identifier of the offending field.
        di: FmtString,
        /// The field's raw value.
        value: FmtString,
        /// The format spec text it was checked against.
        format: FmtString,
    },

    /// A date/timestamp field could not be parsed against its discovered
    /// date format.
    #[error("field '{di}' value '{value}' is not a valid date in format '{pattern}'")]
    BadDate {
        /// The data identifier of the offending field.
        di: FmtString,
        /// The field's raw value.
        value: FmtString,
        /// The discovered date pattern.
        pattern: FmtString,
    },

    /// The message envelope (`[)>RS ... EOT`) was not found.
    #[error("no message envelope found")]
    NoMessageEnvelope,

    /// No format envelope was found and no default format was configured.
    #[error("no format envelope found and no default format configured")]
    NoFormatEnvelope,

    /// A byte outside the 7-bit ASCII range (> 0x7E) was encountered where
    /// pure ASCII is required.
    #[error("non-ASCII byte 0x{byte:02X} encountered")]
    NonAscii {
        /// The offending byte value.
        byte: u8,
    },

    /// The compacted codeword length exceeds every supported symbol size.
    #[error("payload of {compacted} codewords exceeds the largest supported symbol")]
    PayloadTooLarge {
        /// Number of ASCII-compacted codewords required.
        compacted: usize,
    },

    /// A data identifier named by `requiredDataIdentifiers` was absent.
    #[error("required data identifier '{di}' is missing")]
    MissingRequired {
        /// The missing identifier (or `|`-joined group).
        di: FmtString,
    },

    /// The same data identifier appeared twice before `build_message`.
    #[error("duplicate data identifier '{di}'")]
    DuplicateDataIdentifier {
        /// The duplicated identifier.
        di: FmtString,
    },

    /// The settings source (TOML document) could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

/// A non-fatal issue surfaced alongside a successful result.
///
/// Matches the design note in spec.md §9: rather than an exception-or-bool
/// helper, validators and the encoder return their primary value plus a
/// list of diagnostics the façade can choose to escalate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The selected rectangular/square symbol has more than 16 rows; not
    /// all readers support DMRE sizes this large.
    DmreWarning {
        /// Chosen row count.
        rows: usize,
        /// Chosen column count.
        cols: usize,
    },
    /// In lenient mode, a field failed format validation but processing
    /// continued with `valid = false`.
    LenientFormatMismatch {
        /// The offending data identifier.
        di: FmtString,
        /// The field's raw value.
        value: FmtString,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DmreWarning { rows, cols } => {
                write!(f, "selected DMRE symbol {rows}x{cols} may not be readable by all scanners")
            }
            Self::LenientFormatMismatch { di, value } => {
                write!(f, "field '{di}' value '{value}' failed format validation")
            }
        }
    }
}

/// A value paired with zero or more non-fatal diagnostics.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    /// The successful result.
    pub value: T,
    /// Diagnostics accumulated while producing `value`.
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Outcome<T> {
    /// Wraps a value with no diagnostics.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }
}
