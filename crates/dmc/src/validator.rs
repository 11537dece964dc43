//! Field Validator (C5): looks up a field's data identifier, validates it
//! against the catalogue's format spec, and optionally casts it to a
//! typed value.

use crate::cast::{self, CastValue};
use crate::error::{Diagnostic, Error};
use dmc_catalogue::{Catalogue, DataIdentifier};
use smartstring::{LazyCompact, SmartString};

type FmtString = SmartString<LazyCompact>;

/// Minimum printable ASCII codepoint (space).
const PRINTABLE_MIN: u8 = 0x20;
/// Maximum printable ASCII codepoint (`~`).
const PRINTABLE_MAX: u8 = 0x7E;

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&b))
}

/// A validated field, produced by [`validate_field`].
#[derive(Debug, Clone)]
pub struct ValidatedField {
    /// The field's data identifier.
    pub di: DataIdentifier,
    /// The raw (post-DI) content string.
    pub raw: FmtString,
    /// Whether the field passed format validation.
    pub valid: bool,
    /// The casted typed value, if casting was requested and succeeded.
    pub typed: Option<CastValue>,
}

/// Validates one parsed field string (C5).
///
/// `strict` controls whether a format mismatch is a hard [`Error`] or a
/// [`Diagnostic::LenientFormatMismatch`] alongside `valid = false`.
///
/// # Errors
///
/// Fails with [`Error::NoDataIdentifier`] if `field` has no recognizable
/// DI prefix, [`Error::UnknownDataIdentifier`] if the DI is not in
/// `catalogue`, or (in strict mode) [`Error::FormatMismatch`] /
/// [`Error::BadDate`] on a validation or casting failure.
pub fn validate_field(
    field: &str,
    catalogue: &Catalogue,
    strict: bool,
    cast: bool,
) -> Result<(ValidatedField, Vec<Diagnostic>), Error> {
    let mut diagnostics = Vec::new();

    let (di, content) = DataIdentifier::strip_prefix(field).ok_or_else(|| Error::NoDataIdentifier {
        field: field.into(),
    })?;

    let entry = catalogue.lookup(&di).ok_or_else(|| Error::UnknownDataIdentifier {
        di: di.as_str().into(),
    })?;

    let format_result = match entry.format() {
        Some(spec) => {
            let whole_field = format!("{di}{content}");
            dmc_format::validate(spec, &whole_field, strict).map_err(|source| match source {
                dmc_format::Error::FormatMismatch { spec, .. } => Error::FormatMismatch {
                    di: di.as_str().into(),
                    value: content.into(),
                    format: spec.to_string().into(),
                },
                other => Error::Format(other),
            })
        }
        None => {
            let ok = is_printable_ascii(content);
            if ok || !strict {
                Ok(ok)
            } else {
                Err(Error::FormatMismatch {
                    di: di.as_str().into(),
                    value: content.into(),
                    format: "printable ASCII".into(),
                })
            }
        }
    };

    let valid = match format_result {
        Ok(ok) => {
            log::trace!("validated field di={di} valid={ok}");
            if !ok {
                log::warn!("field '{di}' failed format validation in lenient mode");
                diagnostics.push(Diagnostic::LenientFormatMismatch {
                    di: di.as_str().into(),
                    value: content.into(),
                });
            }
            ok
        }
        Err(err) => return Err(err),
    };

    let typed = if cast && valid {
        let date_pattern = if di.as_str().ends_with('D') {
            cast::discover_date_pattern(entry.explanation())
        } else {
            None
        };
        match cast::cast(content, date_pattern) {
            Ok(v) => Some(v),
            Err(pattern) if strict => {
                return Err(Error::BadDate {
                    di: di.as_str().into(),
                    value: content.into(),
                    pattern: pattern.into(),
                });
            }
            Err(_) => None,
        }
    } else {
        None
    };

    Ok((
        ValidatedField {
            di,
            raw: content.into(),
            valid,
            typed,
        },
        diagnostics,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalogue() -> Catalogue {
        Catalogue::from_str(
            "header\n\
             ;S;Serial Number\n\
             an3+n8;27D;Expiration Date [YYYYMMDD]\n",
        )
        .unwrap()
    }

    #[test]
    fn validates_plain_ascii_field() {
        let cat = test_catalogue();
        let (field, diags) = validate_field("S123456", &cat, true, false).unwrap();
        assert!(field.valid);
        assert_eq!(field.raw, "123456");
        assert!(diags.is_empty());
    }

    #[test]
    fn scenario_s7_format_matches() {
        let cat = test_catalogue();
        let (field, _) = validate_field("27D20170615", &cat, true, false).unwrap();
        assert!(field.valid);
    }

    #[test]
    fn scenario_s8_format_too_short_strict_errors() {
        let cat = test_catalogue();
        let result = validate_field("27D2017061", &cat, true, false);
        assert!(matches!(result, Err(Error::FormatMismatch { .. })));
    }

    #[test]
    fn lenient_mode_marks_invalid_instead_of_erroring() {
        let cat = test_catalogue();
        let (field, diags) = validate_field("27D2017061", &cat, false, false).unwrap();
        assert!(!field.valid);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn unknown_di_is_an_error() {
        let cat = test_catalogue();
        assert!(matches!(
            validate_field("Z999", &cat, true, false),
            Err(Error::UnknownDataIdentifier { .. })
        ));
    }

    #[test]
    fn no_data_identifier_is_an_error() {
        let cat = test_catalogue();
        assert!(matches!(
            validate_field("", &cat, true, false),
            Err(Error::NoDataIdentifier { .. })
        ));
    }

    #[test]
    fn casting_extracts_timestamp_for_date_di() {
        let cat = test_catalogue();
        let (field, _) = validate_field("27D20170615", &cat, true, true).unwrap();
        assert!(matches!(field.typed, Some(CastValue::Timestamp(_))));
    }
}
