//! ISO/IEC 15434 message framing: the parser (C3) and builder (C4).

use crate::error::{Error, Result};
use dmc_catalogue::DataIdentifier;
use smartstring::{LazyCompact, SmartString};

type FmtString = SmartString<LazyCompact>;

/// Head bytes of the outer ISO/IEC 15434 message envelope: `[`, `)`, `>`, RS.
pub const MESSAGE_ENVELOPE_HEAD: &str = "\u{5B}\u{29}\u{3E}\u{1E}";
/// Tail byte of the outer message envelope: EOT.
pub const MESSAGE_ENVELOPE_TAIL: &str = "\u{04}";

/// The name of the bundled ANSI MH10.8.2 format envelope.
pub const FORMAT_ANSI_MH10: &str = "ANSI-MH-10";
/// Head bytes of the ANSI MH10.8.2 format envelope: `0`, `6`, GS.
pub const FORMAT_ENVELOPE_HEAD: &str = "06\u{1D}";
/// Tail byte of the ANSI MH10.8.2 format envelope: RS.
pub const FORMAT_ENVELOPE_TAIL: &str = "\u{1E}";
/// Field separator within an ANSI MH10.8.2 format envelope: GS.
pub const FIELD_SEPARATOR: char = '\u{1D}';

/// Strips trailing non-ASCII bytes and trailing spaces, matching the
/// original `rstrip_non_ascii` preprocessing step.
fn rstrip_non_ascii(s: &str) -> &str {
    s.trim_end_matches(|c: char| !c.is_ascii() || c == ' ')
}

/// Fails with [`Error::NonAscii`] at the first byte above 0x7E.
fn check_pure_ascii(s: &str) -> Result<()> {
    if let Some(&byte) = s.as_bytes().iter().find(|&&b| b > 0x7E) {
        return Err(Error::NonAscii { byte });
    }
    Ok(())
}

/// Extracts the content of the outer message envelope.
///
/// # Errors
///
/// Returns [`Error::NoMessageEnvelope`] if `text` does not start with the
/// message-envelope head and end with its tail.
pub fn strip_message_envelope(text: &str) -> Result<&str> {
    let inner = text
        .strip_prefix(MESSAGE_ENVELOPE_HEAD)
        .and_then(|rest| rest.strip_suffix(MESSAGE_ENVELOPE_TAIL))
        .ok_or(Error::NoMessageEnvelope)?;
    Ok(inner)
}

/// Extracts every occurrence of the ANSI MH10.8.2 format envelope's content
/// from `text`, outermost to innermost, without mis-detecting a nested
/// tail byte as a sibling's own tail.
#[must_use]
pub fn find_format_envelopes(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(head_at) = rest.find(FORMAT_ENVELOPE_HEAD) {
        let after_head = &rest[head_at + FORMAT_ENVELOPE_HEAD.len()..];
        let Some(tail_at) = after_head.find(FORMAT_ENVELOPE_TAIL) else {
            break;
        };
        found.push(&after_head[..tail_at]);
        rest = &after_head[tail_at + FORMAT_ENVELOPE_TAIL.len()..];
    }
    found
}

/// Splits format-envelope content on the field separator, preserving empty
/// fields (flagged invalid downstream by the validator).
#[must_use]
pub fn split_fields(content: &str) -> Vec<&str> {
    content.split(FIELD_SEPARATOR).collect()
}

/// The result of parsing a framed message: payload fields grouped by the
/// format envelope (or default format) they were found under.
pub type ParsedMessage<'a> = Vec<(&'a str, Vec<&'a str>)>;

/// Parses a framed message string into per-format field lists (C3).
///
/// Algorithm (spec.md §4.3):
/// 1. Match the outermost message envelope; fail with
///    [`Error::NoMessageEnvelope`] if absent.
/// 2. Search the envelope payload for every format envelope; record its
///    content keyed by format name.
/// 3. If none is found, fall back to `default_format` applied to the raw
///    payload; fail with [`Error::NoFormatEnvelope`] if no default is
///    configured.
/// 4. Split each (format, payload) pair on the format's separator.
///
/// # Errors
///
/// See above.
pub fn parse<'a>(text: &'a str, default_format: Option<&'static str>) -> Result<ParsedMessage<'a>> {
    let payload = strip_message_envelope(text)?;
    let envelopes = find_format_envelopes(payload);

    let grouped: ParsedMessage<'a> = if envelopes.is_empty() {
        let format = default_format.ok_or(Error::NoFormatEnvelope)?;
        vec![(format, split_fields(payload))]
    } else {
        envelopes
            .into_iter()
            .map(|content| (FORMAT_ANSI_MH10, split_fields(content)))
            .collect()
    };

    Ok(grouped)
}

/// A `(DI, value)` pair to be rendered by the builder; a value is either a
/// plain string or a timestamp to be formatted per the DI's discovered
/// date pattern (spec.md §4.5).
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// A literal string value, stringified as-is.
    Text(FmtString),
    /// A timestamp value, formatted via the DI's catalogue-declared date
    /// pattern before being rendered.
    Timestamp(chrono::NaiveDateTime),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s.into())
    }
}

/// Options controlling how [`build_message`] frames its output.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Wrap the joined fields in the format envelope.
    pub use_format_envelope: bool,
    /// Wrap the result in the outer message envelope.
    pub use_message_envelope: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            use_format_envelope: true,
            use_message_envelope: true,
        }
    }
}

/// Builds a framed message string from an ordered list of `(DI, value)`
/// pairs (C4).
///
/// `date_pattern` is called once per `FieldValue::Timestamp` pair to
/// obtain the catalogue-declared strftime pattern for that DI; callers
/// typically wire this to the catalogue's date-format discovery (see
/// [`crate::cast::discover_date_pattern`]).
///
/// # Errors
///
/// Fails with [`Error::DuplicateDataIdentifier`] if the same DI appears
/// twice, or [`Error::NonAscii`] if the rendered output contains a byte
/// above 0x7E.
pub fn build_message(
    fields: &[(DataIdentifier, FieldValue)],
    mut date_pattern: impl FnMut(&DataIdentifier) -> Option<String>,
    options: BuildOptions,
) -> Result<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    for (di, _) in fields {
        if !seen.insert(di.as_str().to_owned()) {
            return Err(Error::DuplicateDataIdentifier { di: di.as_str().into() });
        }
    }

    let rendered: Vec<String> = fields
        .iter()
        .map(|(di, value)| render_field(di, value, &mut date_pattern))
        .collect::<Result<_>>()?;

    let mut message = rendered.join(&FIELD_SEPARATOR.to_string());

    // More than one format envelope forces use_format_envelope on; a
    // single build_message call emits at most one, so this only matters
    // when a caller assembles several built strings before wrapping.
    let use_format_envelope = options.use_format_envelope;

    if use_format_envelope {
        message = format!("{FORMAT_ENVELOPE_HEAD}{message}{FORMAT_ENVELOPE_TAIL}");
    }

    let framed = if options.use_message_envelope {
        format!("{MESSAGE_ENVELOPE_HEAD}{message}{MESSAGE_ENVELOPE_TAIL}")
    } else {
        message
    };

    let framed = rstrip_non_ascii(&framed).to_string();
    check_pure_ascii(&framed)?;
    Ok(framed)
}

fn render_field(
    di: &DataIdentifier,
    value: &FieldValue,
    date_pattern: &mut impl FnMut(&DataIdentifier) -> Option<String>,
) -> Result<String> {
    let rendered = match value {
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Timestamp(ts) => {
            let pattern = date_pattern(di).unwrap_or_else(|| "%Y%m%d".to_string());
            ts.format(&pattern).to_string()
        }
    };
    Ok(format!("{di}{rendered}"))
}

/// Counts the number of pure-ASCII-compacted codewords `msg` would
/// consume, delegating to [`crate::ascii::compacted_count`]. Exposed here
/// because the builder/parser module is where the original groups this
/// helper alongside message assembly.
#[must_use]
pub fn count_ascii_characters(msg: &str) -> usize {
    crate::ascii::compacted_count(msg)
}
