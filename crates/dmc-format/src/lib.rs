//! Format-spec compiler and matcher for ANSI MH10.8.2-style field grammars.
//!
//! A format spec such as `an3+n8` describes a concatenation of
//! fixed- or bounded-length character-class clauses. [`FormatSpec::compile`]
//! turns the textual form into a [`FormatSpec`] that can be matched
//! repeatedly without re-parsing; [`validate`] is the strict/lenient
//! entry point callers outside this crate are expected to use.

#![deny(missing_docs, clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::all)]

pub mod error;
mod spec;

pub use error::{Error, Result};
pub use spec::{CharClass, Clause, FormatSpec};

/// Validates `s` against `spec`.
///
/// In strict mode, a mismatch is returned as [`Error::FormatMismatch`]; in
/// lenient mode, a mismatch simply yields `Ok(false)`.
///
/// # Errors
///
/// Returns [`Error::FormatMismatch`] only when `strict` is `true` and `s`
/// does not match `spec`.
pub fn validate(spec: &FormatSpec, s: &str, strict: bool) -> Result<bool> {
    if spec.matches(s) {
        Ok(true)
    } else if strict {
        Err(Error::FormatMismatch {
            spec: spec.source().into(),
            subject: s.into(),
        })
    } else {
        log::trace!(
            "format mismatch (lenient): spec='{}' subject='{s}'",
            spec.source()
        );
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_mode_errors_on_mismatch() {
        let spec = FormatSpec::compile("n3").unwrap();
        assert!(validate(&spec, "123", true).unwrap());
        assert!(matches!(
            validate(&spec, "12", true),
            Err(Error::FormatMismatch { .. })
        ));
    }

    #[test]
    fn lenient_mode_returns_false_on_mismatch() {
        let spec = FormatSpec::compile("n3").unwrap();
        assert_eq!(validate(&spec, "12", false).unwrap(), Ok(false).unwrap());
    }
}
