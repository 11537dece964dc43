//! The `DataIdentifier` (DI) type: a short ASCII prefix matching
//! `\d{0,2}[B-Z]`.

use smartstring::{LazyCompact, SmartString};
use std::fmt;

/// A data identifier, e.g. `S`, `V`, `18D`.
///
/// Matches the ANSI MH10.8.2 grammar `\d{0,2}[B-Z]`: zero to two leading
/// decimal digits followed by exactly one uppercase letter in `B..=Z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataIdentifier(SmartString<LazyCompact>);

impl DataIdentifier {
    /// Parses a data identifier from its textual form.
    ///
    /// Returns `None` if `s` does not match `\d{0,2}[B-Z]`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 3 {
            return None;
        }
        let (digits, letter) = bytes.split_at(bytes.len() - 1);
        if digits.len() > 2 || !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let &[letter] = letter else { return None };
        if !(b'B'..=b'Z').contains(&letter) {
            return None;
        }
        Some(Self(s.into()))
    }

    /// Attempts to strip a leading data identifier from `s`, returning the
    /// identifier and the remaining slice.
    ///
    /// Tries the longest admissible prefix first (three characters, then
    /// two, then one) so that e.g. `"18D202312011155"` resolves to `18D`
    /// rather than stopping at a shorter non-di prefix.
    #[must_use]
    pub fn strip_prefix(s: &str) -> Option<(Self, &str)> {
        for len in (1..=3usize).rev() {
            if s.len() < len || !s.is_char_boundary(len) {
                continue;
            }
            let (head, tail) = s.split_at(len);
            if let Some(di) = Self::parse(head) {
                return Some((di, tail));
            }
        }
        None
    }

    /// The identifier's textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DataIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_letter() {
        assert_eq!(DataIdentifier::parse("S").unwrap().as_str(), "S");
    }

    #[test]
    fn accepts_two_digit_prefix() {
        assert_eq!(DataIdentifier::parse("18D").unwrap().as_str(), "18D");
    }

    #[test]
    fn rejects_letter_before_z_boundary() {
        assert!(DataIdentifier::parse("A").is_none());
    }

    #[test]
    fn rejects_too_many_digits() {
        assert!(DataIdentifier::parse("123D").is_none());
    }

    #[test]
    fn strip_prefix_prefers_longest_match() {
        let (di, rest) = DataIdentifier::strip_prefix("18D202312011155").unwrap();
        assert_eq!(di.as_str(), "18D");
        assert_eq!(rest, "202312011155");
    }

    #[test]
    fn strip_prefix_single_letter() {
        let (di, rest) = DataIdentifier::strip_prefix("S123456").unwrap();
        assert_eq!(di.as_str(), "S");
        assert_eq!(rest, "123456");
    }
}
