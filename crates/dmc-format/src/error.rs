//! Error types for format-spec compilation.

use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

type FmtString = SmartString<LazyCompact>;

/// Result type alias for format-spec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling or applying a [`crate::FormatSpec`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A clause in the format spec could not be parsed.
    #[error("bad format spec '{spec}': {reason}")]
    BadFormatSpec {
        /// The offending spec string.
        spec: FmtString,
        /// Why it failed to compile.
        reason: FmtString,
    },

    /// `validate` was called in strict mode and the subject did not match.
    #[error("'{subject}' does not match format spec '{spec}'")]
    FormatMismatch {
        /// The spec the subject was validated against.
        spec: FmtString,
        /// The string that failed to match.
        subject: FmtString,
    },
}
