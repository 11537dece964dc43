//! Runtime settings: the "settings provider" spec.md §6 describes
//! abstractly, concretized here as a TOML-plus-environment-overlay
//! configuration object.

use dmc_catalogue::DataIdentifier;
use serde::Deserialize;
use smartstring::{LazyCompact, SmartString};
use std::collections::BTreeMap;

type FmtString = SmartString<LazyCompact>;

/// Default TOML table / environment variable prefix.
pub const DEFAULT_PREFIX: &str = "DMC";

/// Runtime options controlling message framing, symbol shape, and
/// validation strictness.
///
/// Construct with [`Settings::default`], then optionally layer a TOML
/// document via [`Settings::from_toml_str`] and environment overrides via
/// [`Settings::apply_env`] (environment always wins, per spec.md §6).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Emit the `[)>RS ... EOT` message envelope.
    pub use_message_envelope: bool,
    /// Emit the `06GS ... RS` format envelope.
    pub use_format_envelope: bool,
    /// Select the rectangular (DMRE) symbol family instead of square.
    pub rectangular_dmc: bool,
    /// Number of light modules padded around the symbol on each side.
    pub number_quiet_zone_modules: u8,
    /// Whether a UI should show the catalogue's human explanation per DI.
    pub explain_data_identifiers: bool,
    /// Groups of data identifiers, at least one of each group required.
    pub required_data_identifiers: Vec<Vec<FmtString>>,
    /// Strict (fail-fast) vs. lenient (per-field diagnostic) validation.
    pub app_strict: bool,
    /// Free-form UI strings, not interpreted by the core.
    pub title: Option<String>,
    /// Free-form UI strings, not interpreted by the core.
    pub header: Option<String>,
    /// Free-form UI strings, not interpreted by the core.
    pub subheader: Option<String>,
    /// Free-form UI strings, not interpreted by the core.
    pub text: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_message_envelope: true,
            use_format_envelope: true,
            rectangular_dmc: false,
            number_quiet_zone_modules: 2,
            explain_data_identifiers: true,
            required_data_identifiers: Vec::new(),
            app_strict: false,
            title: None,
            header: None,
            subheader: None,
            text: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawSection {
    #[serde(rename = "UseMessageEnvelope")]
    use_message_envelope: Option<bool>,
    #[serde(rename = "UseFormatEnvelope")]
    use_format_envelope: Option<bool>,
    #[serde(rename = "RectangularDMC")]
    rectangular_dmc: Option<bool>,
    #[serde(rename = "NumberQuietZoneModules")]
    number_quiet_zone_modules: Option<u8>,
    #[serde(rename = "ExplainDataIdentifiers")]
    explain_data_identifiers: Option<bool>,
    #[serde(rename = "requiredDataIdentifiers")]
    required_data_identifiers: Option<Vec<String>>,
    #[serde(rename = "AppStrict")]
    app_strict: Option<bool>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Header")]
    header: Option<String>,
    #[serde(rename = "Subheader")]
    subheader: Option<String>,
    #[serde(rename = "Text")]
    text: Option<String>,
}

impl Settings {
    /// Parses a TOML document and reads the table named `prefix`
    /// (conventionally `"DMC"`), overlaying it onto [`Settings::default`].
    ///
    /// Mirrors `DMCConfig`'s `[DMC]`-section lookup in the original Python
    /// configuration loader: a table absent from the document leaves every
    /// field at its default.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if `text` is not valid TOML.
    pub fn from_toml_str(text: &str, prefix: &str) -> crate::Result<Self> {
        let doc: BTreeMap<String, RawSection> = toml::from_str(text)?;
        let raw = doc.into_iter().find(|(k, _)| k == prefix).map(|(_, v)| v).unwrap_or_default();
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSection) -> Self {
        let defaults = Self::default();
        Self {
            use_message_envelope: raw.use_message_envelope.unwrap_or(defaults.use_message_envelope),
            use_format_envelope: raw.use_format_envelope.unwrap_or(defaults.use_format_envelope),
            rectangular_dmc: raw.rectangular_dmc.unwrap_or(defaults.rectangular_dmc),
            number_quiet_zone_modules: raw
                .number_quiet_zone_modules
                .unwrap_or(defaults.number_quiet_zone_modules),
            explain_data_identifiers: raw
                .explain_data_identifiers
                .unwrap_or(defaults.explain_data_identifiers),
            required_data_identifiers: raw
                .required_data_identifiers
                .map(|dis| dis.iter().map(|s| parse_required_group(s)).collect())
                .unwrap_or(defaults.required_data_identifiers),
            app_strict: raw.app_strict.unwrap_or(defaults.app_strict),
            title: raw.title,
            header: raw.header,
            subheader: raw.subheader,
            text: raw.text,
        }
    }

    /// Overlays `<PREFIX>_<SCREAMING_SNAKE_KEY>` environment variables onto
    /// this settings object; environment wins over whatever was already
    /// set (e.g. from [`Settings::from_toml_str`]).
    #[must_use]
    pub fn apply_env(mut self, prefix: &str) -> Self {
        let var = |key: &str| std::env::var(format!("{prefix}_{key}")).ok();

        if let Some(v) = var("USE_MESSAGE_ENVELOPE").and_then(|s| s.parse().ok()) {
            self.use_message_envelope = v;
        }
        if let Some(v) = var("USE_FORMAT_ENVELOPE").and_then(|s| s.parse().ok()) {
            self.use_format_envelope = v;
        }
        if let Some(v) = var("RECTANGULAR_DMC").and_then(|s| s.parse().ok()) {
            self.rectangular_dmc = v;
        }
        if let Some(v) = var("NUMBER_QUIET_ZONE_MODULES").and_then(|s| s.parse().ok()) {
            self.number_quiet_zone_modules = v;
        }
        if let Some(v) = var("EXPLAIN_DATA_IDENTIFIERS").and_then(|s| s.parse().ok()) {
            self.explain_data_identifiers = v;
        }
        if let Some(v) = var("REQUIRED_DATA_IDENTIFIERS") {
            self.required_data_identifiers = v.split(',').map(parse_required_group).collect();
        }
        if let Some(v) = var("APP_STRICT").and_then(|s| s.parse().ok()) {
            self.app_strict = v;
        }
        if let Some(v) = var("TITLE") {
            self.title = Some(v);
        }
        if let Some(v) = var("HEADER") {
            self.header = Some(v);
        }
        if let Some(v) = var("SUBHEADER") {
            self.subheader = Some(v);
        }
        if let Some(v) = var("TEXT") {
            self.text = Some(v);
        }
        self
    }

    /// Returns the first missing required-DI group, if any, given the set
    /// of data identifiers present in a message.
    #[must_use]
    pub fn first_missing_required(&self, present: &[DataIdentifier]) -> Option<&[FmtString]> {
        self.required_data_identifiers.iter().find(|group| {
            !group
                .iter()
                .any(|di| present.iter().any(|p| p.as_str() == di.as_str()))
        }).map(Vec::as_slice)
    }
}

/// Splits a `DI|DI|DI` group string into its constituent identifiers.
fn parse_required_group(s: impl AsRef<str>) -> Vec<FmtString> {
    s.as_ref().trim().split('|').map(FmtString::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let s = Settings::default();
        assert!(s.use_message_envelope);
        assert!(s.use_format_envelope);
        assert!(!s.rectangular_dmc);
        assert_eq!(s.number_quiet_zone_modules, 2);
        assert!(s.explain_data_identifiers);
        assert!(!s.app_strict);
    }

    #[test]
    fn from_toml_reads_named_section() {
        let toml = r#"
            [DMC]
            UseMessageEnvelope = false
            RectangularDMC = true
            NumberQuietZoneModules = 4
        "#;
        let s = Settings::from_toml_str(toml, "DMC").unwrap();
        assert!(!s.use_message_envelope);
        assert!(s.rectangular_dmc);
        assert_eq!(s.number_quiet_zone_modules, 4);
        // untouched fields keep their defaults
        assert!(s.use_format_envelope);
    }

    #[test]
    fn missing_section_keeps_defaults() {
        let s = Settings::from_toml_str("[OTHER]\nfoo = 1\n", "DMC").unwrap();
        assert!(s.use_message_envelope);
    }

    #[test]
    fn required_group_parsing_splits_on_pipe() {
        let group = parse_required_group("S|T");
        assert_eq!(group, vec![FmtString::from("S"), FmtString::from("T")]);
    }

    #[test]
    fn first_missing_required_detects_absent_group() {
        let mut s = Settings::default();
        s.required_data_identifiers = vec![vec!["P".into()], vec!["S".into(), "T".into()]];
        let present = vec![DataIdentifier::parse("S").unwrap()];
        let missing = s.first_missing_required(&present);
        assert_eq!(missing, Some(["P".into()].as_slice()));
    }

    #[test]
    fn env_overrides_win_over_file() {
        // SAFETY (test-only): sets and removes a process-wide env var that
        // no other test in this crate reads, and restores it afterward.
        unsafe {
            std::env::set_var("DMCTEST_APP_STRICT", "true");
        }
        let s = Settings::default().apply_env("DMCTEST");
        assert!(s.app_strict);
        unsafe {
            std::env::remove_var("DMCTEST_APP_STRICT");
        }
    }
}
