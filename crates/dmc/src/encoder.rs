//! Data Matrix (ECC200) symbol encoder (C8): ASCII compaction, symbol
//! sizing, Reed–Solomon ECC, module placement, and quiet zone padding.

use crate::error::{Diagnostic, Error, Outcome, Result};
use crate::gf256;
use crate::placement;
use crate::rectangular::{self, RECTANGULAR_SHAPES, SQUARE_SHAPES, SymbolShape};

/// First pad codeword (end-of-message marker), spec.md §4.8 stage 1.
const PAD_EOM: u8 = 129;

/// A finished Data Matrix symbol: a row-major grid of dark/light modules,
/// including quiet zone margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Total module rows, including quiet zone.
    pub rows: usize,
    /// Total module columns, including quiet zone.
    pub cols: usize,
    modules: Vec<bool>,
}

impl Bitmap {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            modules: vec![false; rows * cols],
        }
    }

    /// Returns whether the module at `(row, col)` is dark.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, dark: bool) {
        let idx = row * self.cols + col;
        self.modules[idx] = dark;
    }

    /// Renders the symbol as a block of `#`/`.` characters, one line per
    /// row, useful for debugging and demos.
    #[must_use]
    pub fn to_ascii_art(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(if self.get(row, col) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

/// Encodes ASCII-compacted codewords for `s` per spec.md §4.8 stage 1:
/// decimal digit pairs collapse to `((10*d1+d2)+130)`, every other byte
/// encodes as `b+1`.
///
/// # Errors
///
/// Returns the offending byte if `s` contains a non-ASCII byte.
fn ascii_compact(s: &str) -> std::result::Result<Vec<u8>, u8> {
    let bytes = s.as_bytes();
    if let Some(&bad) = bytes.iter().find(|&&b| b > 0x7E) {
        return Err(bad);
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if i + 1 < bytes.len() && bytes[i].is_ascii_digit() && bytes[i + 1].is_ascii_digit() {
            let d1 = u16::from(bytes[i] - b'0');
            let d2 = u16::from(bytes[i + 1] - b'0');
            out.push(((10 * d1 + d2) + 130) as u8);
            i += 2;
        } else {
            out.push(bytes[i] + 1);
            i += 1;
        }
    }
    Ok(out)
}

/// Pads `codewords` up to `capacity` with the EOM marker followed by the
/// `((149*k) mod 253)+130` pad sequence.
fn pad_to_capacity(mut codewords: Vec<u8>, capacity: usize) -> Vec<u8> {
    if codewords.len() >= capacity {
        return codewords;
    }
    codewords.push(PAD_EOM);
    let mut k: u32 = 1;
    while codewords.len() < capacity {
        let pad = ((149 * k) % 253) + 130;
        codewords.push(pad as u8);
        k += 1;
    }
    codewords
}

/// Splits `total` items into `blocks` groups as evenly as possible, the
/// first `total % blocks` groups receiving one extra item.
fn split_even(total: usize, blocks: usize) -> Vec<usize> {
    let base = total / blocks;
    let rem = total % blocks;
    (0..blocks)
        .map(|i| if i < rem { base + 1 } else { base })
        .collect()
}

/// Interleaves equal- or near-equal-length blocks byte-by-byte: all of
/// position 0 across blocks, then all of position 1, and so on.
fn interleave(blocks: &[Vec<u8>]) -> Vec<u8> {
    let max_len = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = Vec::new();
    for i in 0..max_len {
        for block in blocks {
            if let Some(&byte) = block.get(i) {
                out.push(byte);
            }
        }
    }
    out
}

/// Splits `data` into `shape.regions` RS blocks, computes each block's
/// share of `shape.ecc_codewords`, and returns the interleaved
/// data-then-ecc codeword stream ECC200 actually transmits.
fn interleaved_codewords(data: &[u8], shape: &SymbolShape) -> Vec<u8> {
    let blocks = shape.regions.max(1);
    if blocks == 1 {
        let ecc = gf256::compute_ecc(data, shape.ecc_codewords);
        let mut out = data.to_vec();
        out.extend(ecc);
        return out;
    }

    let data_sizes = split_even(data.len(), blocks);
    let ecc_sizes = split_even(shape.ecc_codewords, blocks);

    let mut data_blocks = Vec::with_capacity(blocks);
    let mut ecc_blocks = Vec::with_capacity(blocks);
    let mut offset = 0;
    for (&dlen, &elen) in data_sizes.iter().zip(ecc_sizes.iter()) {
        let block = &data[offset..offset + dlen];
        offset += dlen;
        ecc_blocks.push(gf256::compute_ecc(block, elen));
        data_blocks.push(block.to_vec());
    }

    let mut out = interleave(&data_blocks);
    out.extend(interleave(&ecc_blocks));
    out
}

/// The side length of a square region grid for a given region count
/// (ECC200 region counts are always perfect squares: 1, 4, 16, 36).
fn region_grid_side(regions: usize) -> usize {
    let mut side = 1;
    while side * side < regions {
        side += 1;
    }
    side
}

/// Assembles the full module grid (without quiet zone) for `shape` from
/// its interleaved codeword stream, tiling one finder-framed data region
/// per region in a square region grid.
fn assemble_regions(codewords: &[u8], shape: &SymbolShape) -> Vec<Vec<bool>> {
    let side = region_grid_side(shape.regions.max(1));
    let region_total_rows = shape.rows / side;
    let region_total_cols = shape.cols / side;
    let region_data_rows = region_total_rows - 2;
    let region_data_cols = region_total_cols - 2;

    let region_sizes = split_even(codewords.len(), side * side);
    let mut grid = vec![vec![false; shape.cols]; shape.rows];

    let mut offset = 0;
    for r in 0..side {
        for c in 0..side {
            let idx = r * side + c;
            let chunk_len = region_sizes[idx];
            let chunk = &codewords[offset..offset + chunk_len];
            offset += chunk_len;

            let data_grid = placement::place_region(chunk, region_data_rows, region_data_cols);
            let framed = placement::with_finder_pattern(&data_grid);

            let row_off = r * region_total_rows;
            let col_off = c * region_total_cols;
            for (fr, row) in framed.iter().enumerate() {
                for (fc, &dark) in row.iter().enumerate() {
                    grid[row_off + fr][col_off + fc] = dark;
                }
            }
        }
    }
    grid
}

fn with_quiet_zone(grid: &[Vec<bool>], quiet_zone: u8) -> Bitmap {
    let margin = usize::from(quiet_zone);
    let rows = grid.len();
    let cols = grid.first().map_or(0, Vec::len);
    let mut bitmap = Bitmap::new(rows + 2 * margin, cols + 2 * margin);
    for (r, row) in grid.iter().enumerate() {
        for (c, &dark) in row.iter().enumerate() {
            if dark {
                bitmap.set(r + margin, c + margin, true);
            }
        }
    }
    bitmap
}

/// Encodes `message` into a Data Matrix (ECC200) symbol (C8).
///
/// `rectangular` selects the DMRE rectangular size table over the square
/// ISO/IEC 16022 table; `quiet_zone` is the number of light modules of
/// margin added on each side.
///
/// # Errors
///
/// Returns [`Error::NonAscii`] if `message` contains a byte above 0x7E,
/// or [`Error::PayloadTooLarge`] if it exceeds the largest supported
/// symbol's capacity.
pub fn encode(message: &str, rectangular: bool, quiet_zone: u8) -> Result<Outcome<Bitmap>> {
    let codewords = ascii_compact(message).map_err(|byte| Error::NonAscii { byte })?;

    let table = if rectangular { RECTANGULAR_SHAPES } else { SQUARE_SHAPES };
    let (shape, warning) = rectangular::select_shape(table, codewords.len())
        .ok_or(Error::PayloadTooLarge { compacted: codewords.len() })?;

    log::debug!(
        "encoding {} codewords into {}x{} symbol ({} region(s))",
        codewords.len(),
        shape.rows,
        shape.cols,
        shape.regions
    );

    let data = pad_to_capacity(codewords, shape.capacity);
    let full_stream = interleaved_codewords(&data, &shape);
    let grid = assemble_regions(&full_stream, &shape);
    let bitmap = with_quiet_zone(&grid, quiet_zone);

    let mut diagnostics = Vec::new();
    if let Some(w) = warning {
        diagnostics.push(w);
    }
    Ok(Outcome { value: bitmap, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_compact_collapses_digit_pairs() {
        let out = ascii_compact("S123456").unwrap();
        // 'S'(83)+1=84, then digit pairs 12,34,56
        assert_eq!(out, vec![84, (12 + 130) as u8, (34 + 130) as u8, (56 + 130) as u8]);
    }

    #[test]
    fn ascii_compact_rejects_non_ascii() {
        assert_eq!(ascii_compact("héllo"), Err(0xC3));
    }

    #[test]
    fn pad_sequence_starts_with_eom() {
        let padded = pad_to_capacity(vec![1, 2], 5);
        assert_eq!(padded[2], PAD_EOM);
        assert_eq!(padded.len(), 5);
    }

    #[test]
    fn exact_capacity_needs_no_padding() {
        let padded = pad_to_capacity(vec![1, 2, 3], 3);
        assert_eq!(padded, vec![1, 2, 3]);
    }

    #[test]
    fn scenario_s9_small_message_encodes_square_symbol() {
        let outcome = encode("S123456", false, 2).unwrap();
        // quiet zone of 2 on each side of a 14x14 square (capacity 5 >= 4 codewords)
        assert_eq!(outcome.value.rows, 14 + 4);
        assert_eq!(outcome.value.cols, 14 + 4);
    }

    #[test]
    fn scenario_s6_large_rectangular_message_warns() {
        // 110 digits collapse to 55 ASCII-compacted codewords, selecting
        // the 20x48 rectangular shape (rows > 16).
        let long = "1".repeat(110);
        let outcome = encode(&long, true, 1).unwrap();
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DmreWarning { .. })));
    }

    #[test]
    fn payload_larger_than_every_symbol_is_an_error() {
        let huge = "1".repeat(3000);
        assert!(matches!(
            encode(&huge, false, 1),
            Err(Error::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn multi_region_symbol_assembles_without_panicking() {
        let long = "A".repeat(60);
        let outcome = encode(&long, false, 1).unwrap();
        assert!(outcome.value.rows > 0 && outcome.value.cols > 0);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = encode("S123456", false, 2).unwrap();
        let b = encode("S123456", false, 2).unwrap();
        assert_eq!(a.value, b.value);
    }

    #[quickcheck_macros::quickcheck]
    fn property_quiet_zone_border_is_always_light(margin: u8) {
        let margin = margin % 4;
        if margin == 0 {
            return;
        }
        if let Ok(outcome) = encode("S1", false, margin) {
            let bmp = outcome.value;
            for c in 0..bmp.cols {
                assert!(!bmp.get(0, c));
            }
        }
    }
}
