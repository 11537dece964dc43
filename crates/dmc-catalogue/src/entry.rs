//! [`CatalogueEntry`]: one row of the identifier dictionary.

use crate::identifier::DataIdentifier;
use dmc_format::FormatSpec;

/// A single entry in the identifier catalogue: a DI paired with its
/// (optionally empty) format spec and human explanation.
///
/// An empty format spec means "any printable ASCII, codepoints 0x20–0x7E"
/// — see [`CatalogueEntry::format`].
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    di: DataIdentifier,
    format: Option<FormatSpec>,
    explanation: String,
}

impl CatalogueEntry {
    pub(crate) fn new(di: DataIdentifier, format: Option<FormatSpec>, explanation: String) -> Self {
        Self {
            di,
            format,
            explanation,
        }
    }

    /// The entry's data identifier.
    #[must_use]
    pub fn di(&self) -> &DataIdentifier {
        &self.di
    }

    /// The entry's compiled format spec, or `None` if the catalogue row
    /// left the format column empty (meaning "any printable ASCII").
    #[must_use]
    pub fn format(&self) -> Option<&FormatSpec> {
        self.format.as_ref()
    }

    /// The human-readable explanation of this identifier's meaning.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}
