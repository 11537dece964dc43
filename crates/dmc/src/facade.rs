//! Thin façade (C9) tying the parser, builder, validator, and encoder
//! together behind the catalogue and settings a caller actually holds.

use crate::cast;
use crate::config::Settings;
use crate::encoder::{self, Bitmap};
use crate::error::{Error, Outcome, Result};
use crate::message::{self, BuildOptions, FieldValue, FORMAT_ANSI_MH10};
use crate::validator::{self, ValidatedField};
use dmc_catalogue::{Catalogue, DataIdentifier};
use smartstring::{LazyCompact, SmartString};

type FmtString = SmartString<LazyCompact>;

/// Entry point combining an identifier catalogue with runtime settings.
///
/// Construct with [`Facade::with_ansi_mh10`] for the bundled catalogue, or
/// [`Facade::new`] to supply a custom one (e.g. loaded from a file via
/// [`Catalogue::from_path`]).
pub struct Facade {
    catalogue: Catalogue,
    settings: Settings,
}

impl Facade {
    /// Builds a façade from an already-loaded catalogue and settings.
    #[must_use]
    pub fn new(catalogue: Catalogue, settings: Settings) -> Self {
        Self { catalogue, settings }
    }

    /// Builds a façade over the bundled ANSI MH10.8.2 catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Catalogue`] if the bundled table fails to parse
    /// (it shouldn't).
    pub fn with_ansi_mh10(settings: Settings) -> Result<Self> {
        Ok(Self::new(Catalogue::ansi_mh10()?, settings))
    }

    fn date_pattern_for(&self, di: &DataIdentifier) -> Option<String> {
        let entry = self.catalogue.lookup(di)?;
        let pattern = cast::discover_date_pattern(entry.explanation())?;
        Some(cast::map_date_pattern(pattern).unwrap_or_else(|| pattern.to_string()))
    }

    /// Builds a framed ISO/IEC 15434 message string from `(DI, value)`
    /// pairs (C4), honoring `self.settings`' envelope and required-DI
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequired`] if a configured required-DI
    /// group has no member among `fields`, or any error
    /// [`message::build_message`] itself returns.
    pub fn build_message(&self, fields: &[(DataIdentifier, FieldValue)]) -> Result<String> {
        if let Some(group) = self
            .settings
            .first_missing_required(&fields.iter().map(|(di, _)| di.clone()).collect::<Vec<_>>())
        {
            return Err(Error::MissingRequired {
                di: group.join("|").into(),
            });
        }

        message::build_message(
            fields,
            |di| self.date_pattern_for(di),
            BuildOptions {
                use_format_envelope: self.settings.use_format_envelope,
                use_message_envelope: self.settings.use_message_envelope,
            },
        )
    }

    /// Builds a message (as [`Self::build_message`]) and encodes it into a
    /// Data Matrix symbol (C8), honoring `self.settings`' symbol-family
    /// and quiet-zone configuration.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Self::build_message`] or
    /// [`encoder::encode`].
    pub fn generate(&self, fields: &[(DataIdentifier, FieldValue)]) -> Result<Outcome<Bitmap>> {
        let text = self.build_message(fields)?;
        encoder::encode(&text, self.settings.rectangular_dmc, self.settings.number_quiet_zone_modules)
    }

    /// Parses and validates a framed message string (C3 + C5), grouping
    /// validated fields by the format envelope they were found under.
    ///
    /// # Errors
    ///
    /// Returns any error from [`message::parse`] or [`validator::validate_field`].
    pub fn parse(&self, text: &str) -> Result<Outcome<Vec<(FmtString, Vec<ValidatedField>)>>> {
        let default_format = self.settings.use_format_envelope.then_some(FORMAT_ANSI_MH10);
        let grouped = message::parse(text, default_format)?;

        let mut diagnostics = Vec::new();
        let mut out = Vec::with_capacity(grouped.len());
        let mut all_dis: Vec<DataIdentifier> = Vec::new();

        for (format, fields) in grouped {
            let mut validated = Vec::with_capacity(fields.len());
            for field in fields {
                let (v, mut field_diags) =
                    validator::validate_field(field, &self.catalogue, self.settings.app_strict, true)?;
                all_dis.push(v.di.clone());
                diagnostics.append(&mut field_diags);
                validated.push(v);
            }
            out.push((FmtString::from(format), validated));
        }

        if let Some(group) = self.settings.first_missing_required(&all_dis) {
            return Err(Error::MissingRequired {
                di: group.join("|").into(),
            });
        }

        Ok(Outcome { value: out, diagnostics })
    }

    /// Number of ASCII-compacted codewords `msg` would consume (C6),
    /// exposed for callers sizing a message before building it.
    #[must_use]
    pub fn count_ascii_characters(&self, msg: &str) -> usize {
        message::count_ascii_characters(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn di(s: &str) -> DataIdentifier {
        DataIdentifier::parse(s).unwrap()
    }

    #[test]
    fn end_to_end_build_and_generate() {
        let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
        let fields = vec![(di("S"), FieldValue::from("123456"))];
        let text = facade.build_message(&fields).unwrap();
        assert!(text.starts_with(message::MESSAGE_ENVELOPE_HEAD));

        let outcome = facade.generate(&fields).unwrap();
        assert!(outcome.value.rows > 0);
    }

    #[test]
    fn end_to_end_parse_round_trip() {
        let facade = Facade::with_ansi_mh10(Settings::default()).unwrap();
        let fields = vec![(di("S"), FieldValue::from("123456"))];
        let text = facade.build_message(&fields).unwrap();

        let parsed = facade.parse(&text).unwrap();
        assert_eq!(parsed.value.len(), 1);
        assert_eq!(parsed.value[0].1[0].di.as_str(), "S");
        assert_eq!(parsed.value[0].1[0].raw, "123456");
    }

    #[test]
    fn missing_required_identifier_is_rejected() {
        let mut settings = Settings::default();
        settings.required_data_identifiers = vec![vec!["V".into()]];
        let facade = Facade::with_ansi_mh10(settings).unwrap();
        let fields = vec![(di("S"), FieldValue::from("123456"))];
        assert!(matches!(
            facade.build_message(&fields),
            Err(Error::MissingRequired { .. })
        ));
    }
}
