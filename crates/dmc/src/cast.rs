//! Typed-value casting used by the field validator (C5): date-format
//! discovery from a catalogue explanation, and integer/real detection.

/// Alphabet a date-format token may be built from (spec.md §4.5).
const DATE_ALPHABET: &[char] = &['Y', 'M', 'D', 'h', 'm', 's', 'f', 'p', 'W', 'T'];

fn is_date_alphabet(c: char) -> bool {
    DATE_ALPHABET.contains(&c)
}

fn is_open_delim(c: char) -> bool {
    c == '(' || c == '[' || c.is_whitespace()
}

fn is_close_delim(c: char) -> bool {
    c == ')' || c == ']' || c == '.' || c.is_whitespace()
}

/// Scans `explanation` for a bracketed/parenthesized/whitespace-delimited
/// run of [`DATE_ALPHABET`] characters, 4 to 23 characters long, and
/// returns it verbatim (e.g. `"YYYYMMDDhhmm"`).
///
/// Mirrors the original source's `get_date_format` lookbehind/lookahead
/// regex, normalized to the uppercase-first alphabet spec.md §9 fixes.
#[must_use]
pub fn discover_date_pattern(explanation: &str) -> Option<&str> {
    let chars: Vec<(usize, char)> = explanation.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        let (start_byte, start_ch) = chars[i];
        if !is_date_alphabet(start_ch) {
            i += 1;
            continue;
        }
        let preceded_ok = i == 0 || is_open_delim(chars[i - 1].1);

        let mut j = i;
        while j < chars.len() && is_date_alphabet(chars[j].1) {
            j += 1;
        }
        let len = j - i;
        let followed_ok = j == chars.len() || is_close_delim(chars[j].1);
        let end_byte = if j < chars.len() {
            chars[j].0
        } else {
            explanation.len()
        };

        if preceded_ok && followed_ok && (4..=23).contains(&len) {
            return Some(&explanation[start_byte..end_byte]);
        }
        i = j.max(i + 1);
    }
    None
}

/// Splits a date pattern into runs of identical characters, e.g.
/// `"YYYYMMDD"` → `["YYYY", "MM", "DD"]`.
fn split_repeating_elements(pattern: &str) -> Vec<&str> {
    let bytes = pattern.as_bytes();
    let mut sections = Vec::new();
    let mut start = 0;
    for i in 1..bytes.len() {
        if bytes[i] != bytes[start] {
            sections.push(&pattern[start..i]);
            start = i;
        }
    }
    if !pattern.is_empty() {
        sections.push(&pattern[start..]);
    }
    sections
}

/// Maps a discovered date pattern to a `chrono`-compatible strftime
/// format string, per the table in spec.md §4.5.
///
/// Returns `None` if the pattern contains a run this table does not
/// define (e.g. a lone `p`).
#[must_use]
pub fn map_date_pattern(pattern: &str) -> Option<String> {
    // A `WW` run ties the surrounding year to the ISO week-based year
    // (`%G`/`%g`), not the ordinary calendar year, since the two diverge
    // in the first/last week of a year.
    let iso_week = pattern.contains("WW");
    let mut out = String::new();
    for run in split_repeating_elements(pattern) {
        let mapped = match run {
            "YYYY" if iso_week => "%G",
            "YY" if iso_week => "%g",
            "YYYY" => "%Y",
            "YY" => "%y",
            "MM" => "%m",
            "MMM" => "%b",
            "DD" => "%d",
            "hh" => "%H",
            "mm" => "%M",
            "ss" => "%S",
            "ff" => "%f",
            "WW" => "%V",
            "TTTT" => "%H%M",
            _ => return None,
        };
        out.push_str(mapped);
    }
    Some(out)
}

/// Parses an ISO week-date strftime pattern (`%G`/`%V`) against `content`.
///
/// ISO week dates don't pin a day on their own — `%G`/`%V` alone leave
/// `Parsed` short a weekday, so this anchors the result to the Monday of
/// the discovered week.
fn parse_iso_week_date(content: &str, strftime: &str) -> Option<chrono::NaiveDateTime> {
    use chrono::format::{Item, Parsed, StrftimeItems};

    let mut parsed = Parsed::new();
    let items: Vec<Item> = StrftimeItems::new(strftime).collect();
    chrono::format::parse(&mut parsed, content, items.into_iter()).ok()?;
    parsed.set_weekday(chrono::Weekday::Mon).ok()?;
    parsed
        .to_naive_date()
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
}

/// Detected type of a textual field value, used by the validator's
/// optional casting step (spec.md §4.5).
#[derive(Debug, Clone, PartialEq)]
pub enum CastValue {
    /// A timestamp parsed via a discovered date pattern.
    Timestamp(chrono::NaiveDateTime),
    /// Content matching `\d+`.
    Integer(i64),
    /// Content matching `\d+(\.\d+)?`.
    Real(f64),
    /// Content that did not match any of the above; left unchanged.
    Text(String),
}

fn is_integer_literal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_real_literal(s: &str) -> bool {
    let Some((int_part, frac_part)) = s.split_once('.') else {
        return is_integer_literal(s);
    };
    is_integer_literal(int_part) && is_integer_literal(frac_part)
}

/// Casts `content` to a typed value, optionally guided by a date pattern
/// discovered from the owning DI's catalogue explanation.
///
/// # Errors
///
/// Returns `Err(pattern)` (the strftime pattern that failed) if a date
/// pattern was supplied but `content` does not parse against it.
pub fn cast(content: &str, date_pattern: Option<&str>) -> Result<CastValue, String> {
    if let Some(pattern) = date_pattern {
        let strftime = map_date_pattern(pattern).unwrap_or_else(|| pattern.to_string());
        if pattern.contains("WW") {
            return parse_iso_week_date(content, &strftime)
                .map(CastValue::Timestamp)
                .ok_or_else(|| pattern.to_string());
        }
        return chrono::NaiveDateTime::parse_from_str(content, &strftime)
            .map(CastValue::Timestamp)
            .or_else(|_| {
                chrono::NaiveDate::parse_from_str(content, &strftime)
                    .map(|d| CastValue::Timestamp(d.and_hms_opt(0, 0, 0).unwrap_or_default()))
            })
            .map_err(|_| pattern.to_string());
    }
    if is_integer_literal(content) {
        if let Ok(i) = content.parse::<i64>() {
            return Ok(CastValue::Integer(i));
        }
    }
    if is_real_literal(content) {
        if let Ok(f) = content.parse::<f64>() {
            return Ok(CastValue::Real(f));
        }
    }
    Ok(CastValue::Text(content.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_bracketed_pattern() {
        assert_eq!(
            discover_date_pattern("Record Date and Time Stamp [YYYYMMDDhhmm]"),
            Some("YYYYMMDDhhmm")
        );
    }

    #[test]
    fn discovers_pattern_too_short_fails() {
        assert_eq!(discover_date_pattern("Expiry [YMD]"), None);
    }

    #[test]
    fn maps_known_pattern_to_strftime() {
        assert_eq!(map_date_pattern("YYYYMMDDhhmm").as_deref(), Some("%Y%m%d%H%M"));
    }

    #[test]
    fn maps_unknown_run_to_none() {
        assert_eq!(map_date_pattern("YYYYp"), None);
    }

    #[test]
    fn maps_iso_week_pattern_to_iso_specifiers() {
        assert_eq!(map_date_pattern("YYWW").as_deref(), Some("%g%V"));
    }

    #[test]
    fn casts_iso_week_to_monday_of_that_week() {
        let value = cast("2401", Some("YYWW")).unwrap();
        assert_eq!(
            value,
            CastValue::Timestamp(
                chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn casts_integer_literal() {
        assert_eq!(cast("12345", None).unwrap(), CastValue::Integer(12345));
    }

    #[test]
    fn casts_real_literal() {
        assert_eq!(cast("12.5", None).unwrap(), CastValue::Real(12.5));
    }

    #[test]
    fn casts_plain_text_unchanged() {
        assert_eq!(
            cast("H48999", None).unwrap(),
            CastValue::Text("H48999".to_string())
        );
    }

    #[test]
    fn casts_date_with_discovered_pattern() {
        let value = cast("202312011155", Some("YYYYMMDDhhmm")).unwrap();
        assert!(matches!(value, CastValue::Timestamp(_)));
    }

    #[test]
    fn bad_date_content_is_an_error() {
        assert!(cast("not-a-date", Some("YYYYMMDDhhmm")).is_err());
    }
}
