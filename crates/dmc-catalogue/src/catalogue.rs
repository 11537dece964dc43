//! Loading and lookup of the identifier catalogue (the MH10.8.2 dictionary
//! file: `format spec;data identifier;explanation`, one entry per line).

use crate::entry::CatalogueEntry;
use crate::error::{Error, Result};
use crate::identifier::DataIdentifier;
use dmc_format::FormatSpec;
use rustc_hash::FxHashMap;
use std::path::Path;

/// The bundled ANSI MH10.8.2 dictionary text, embedded at compile time.
pub const ANSI_MH10_TABLE: &str = include_str!("../data/ANSI-MH10_DataIdentifiers.txt");

/// A read-only, insertion-ordered table mapping [`DataIdentifier`]s to
/// their [`CatalogueEntry`].
///
/// Construct once (typically via [`Catalogue::ansi_mh10`] or
/// [`Catalogue::from_str`]) and share behind an `Arc`; lookups never
/// mutate the table.
#[derive(Debug, Clone)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
    index: FxHashMap<DataIdentifier, usize>,
}

impl Catalogue {
    /// Loads the bundled ANSI MH10.8.2 identifier catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled table itself is malformed,
    /// which would indicate a packaging bug.
    pub fn ansi_mh10() -> Result<Self> {
        Self::from_str(ANSI_MH10_TABLE)
    }

    /// Parses a catalogue from its in-memory textual form.
    ///
    /// The first line is a header and is always discarded. Lines shorter
    /// than 6 bytes are skipped. Every other non-discarded line must split
    /// on `;` into exactly 3 fields, or loading fails with
    /// [`Error::CatalogueFormat`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatalogueFormat`] if any data line has the wrong
    /// field count, [`Error::InvalidDataIdentifier`] if a DI column fails
    /// the `\d{0,2}[B-Z]` grammar, or [`Error::BadFormatSpec`] if a format
    /// column fails to compile.
    pub fn from_str(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let _header = lines.next();

        let mut entries = Vec::new();
        let mut index = FxHashMap::default();

        for (offset, line) in lines.enumerate() {
            let line_no = offset + 2; // 1-based, header already consumed
            if line.len() <= 5 {
                continue;
            }
            let fields: Vec<&str> = line.split(';').collect();
            if fields.len() != 3 {
                return Err(Error::CatalogueFormat {
                    line_no,
                    found: fields.len(),
                });
            }
            let [format_str, di_str, explanation] = [fields[0], fields[1], fields[2]];

            let di = DataIdentifier::parse(di_str).ok_or_else(|| Error::InvalidDataIdentifier {
                di: di_str.into(),
                line_no,
            })?;

            let format = if format_str.is_empty() {
                None
            } else {
                Some(FormatSpec::compile(format_str).map_err(|source| Error::BadFormatSpec {
                    di: di_str.into(),
                    source,
                })?)
            };

            let entry_index = entries.len();
            entries.push(CatalogueEntry::new(
                di.clone(),
                format,
                explanation.to_string(),
            ));
            index.insert(di, entry_index);
        }

        log::debug!("loaded catalogue with {} entries", entries.len());
        Ok(Self { entries, index })
    }

    /// Loads a catalogue from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or the same
    /// parsing errors as [`Catalogue::from_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Looks up a catalogue entry by its data identifier.
    #[must_use]
    pub fn lookup(&self, di: &DataIdentifier) -> Option<&CatalogueEntry> {
        self.index.get(di).map(|&i| &self.entries[i])
    }

    /// Iterates over every entry, ordered by insertion (i.e. file order),
    /// so UI dropdowns built from it stay stable.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.iter()
    }

    /// The number of entries in the catalogue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalogue has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
