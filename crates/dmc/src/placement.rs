//! ECC200 module placement (Stage 4, spec.md §4.8): the "utah" L-shaped
//! placement algorithm with its four corner special cases, plus the
//! finder pattern applied per data region.

/// A single data-region's bit canvas: `true` = dark module.
struct RegionCanvas {
    rows: usize,
    cols: usize,
    bits: Vec<bool>,
    placed: Vec<bool>,
}

impl RegionCanvas {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            bits: vec![false; rows * cols],
            placed: vec![false; rows * cols],
        }
    }

    fn is_placed(&self, row: usize, col: usize) -> bool {
        self.placed[row * self.cols + col]
    }

    /// Places one bit of `codeword` at logical `(row, col)`, wrapping
    /// negative/overflowing coordinates back into the canvas per the
    /// ECC200 placement algorithm's corner-wraparound rule.
    fn module(&mut self, mut row: i64, mut col: i64, codeword: u8, bit: u32) {
        let rows = self.rows as i64;
        let cols = self.cols as i64;

        if row < 0 {
            row += rows;
            col += 4 - ((rows + 4) % 8);
        }
        if col < 0 {
            col += cols;
            row += 4 - ((cols + 4) % 8);
        }

        let row = row as usize;
        let col = col as usize;
        let value = (codeword >> bit) & 1 != 0;
        let idx = row * self.cols + col;
        self.bits[idx] = value;
        self.placed[idx] = true;
    }

    fn utah(&mut self, row: usize, col: usize, codeword: u8) {
        let (row, col) = (row as i64, col as i64);
        self.module(row - 2, col - 2, codeword, 7);
        self.module(row - 2, col - 1, codeword, 6);
        self.module(row - 1, col - 2, codeword, 5);
        self.module(row - 1, col - 1, codeword, 4);
        self.module(row - 1, col, codeword, 3);
        self.module(row, col - 2, codeword, 2);
        self.module(row, col - 1, codeword, 1);
        self.module(row, col, codeword, 0);
    }

    fn corner1(&mut self, codeword: u8) {
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        self.module(rows - 1, 0, codeword, 7);
        self.module(rows - 1, 1, codeword, 6);
        self.module(rows - 1, 2, codeword, 5);
        self.module(0, cols - 2, codeword, 4);
        self.module(0, cols - 1, codeword, 3);
        self.module(1, cols - 1, codeword, 2);
        self.module(2, cols - 1, codeword, 1);
        self.module(3, cols - 1, codeword, 0);
    }

    fn corner2(&mut self, codeword: u8) {
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        self.module(rows - 3, 0, codeword, 7);
        self.module(rows - 2, 0, codeword, 6);
        self.module(rows - 1, 0, codeword, 5);
        self.module(0, cols - 4, codeword, 4);
        self.module(0, cols - 3, codeword, 3);
        self.module(0, cols - 2, codeword, 2);
        self.module(0, cols - 1, codeword, 1);
        self.module(1, cols - 1, codeword, 0);
    }

    fn corner3(&mut self, codeword: u8) {
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        self.module(rows - 3, 0, codeword, 7);
        self.module(rows - 2, 0, codeword, 6);
        self.module(rows - 1, 0, codeword, 5);
        self.module(0, cols - 2, codeword, 4);
        self.module(0, cols - 1, codeword, 3);
        self.module(1, cols - 1, codeword, 2);
        self.module(2, cols - 1, codeword, 1);
        self.module(3, cols - 1, codeword, 0);
    }

    fn corner4(&mut self, codeword: u8) {
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        self.module(rows - 1, 0, codeword, 7);
        self.module(rows - 1, cols - 1, codeword, 6);
        self.module(0, cols - 3, codeword, 5);
        self.module(0, cols - 2, codeword, 4);
        self.module(0, cols - 1, codeword, 3);
        self.module(1, cols - 3, codeword, 2);
        self.module(1, cols - 2, codeword, 1);
        self.module(1, cols - 1, codeword, 0);
    }
}

/// Places `codewords` (data followed by interleaved ECC) into a data
/// region of `rows x cols` modules, using the canonical ECC200 "utah"
/// L-shaped placement algorithm.
///
/// Returns a `rows x cols` grid of dark/light modules, row-major.
#[must_use]
pub fn place_region(codewords: &[u8], rows: usize, cols: usize) -> Vec<Vec<bool>> {
    let mut canvas = RegionCanvas::new(rows, cols);
    let mut pos = 0usize;
    let mut row: i64 = 4;
    let mut col: i64 = 0;
    let next = |pos: &mut usize| -> u8 {
        let cw = codewords.get(*pos).copied().unwrap_or(0);
        *pos += 1;
        cw
    };

    loop {
        if row == rows as i64 && col == 0 {
            canvas.corner1(next(&mut pos));
        }
        if row == rows as i64 - 2 && col == 0 && cols % 4 != 0 {
            canvas.corner2(next(&mut pos));
        }
        if row == rows as i64 - 2 && col == 0 && cols % 8 == 4 {
            canvas.corner3(next(&mut pos));
        }
        if row == rows as i64 + 4 && col == 2 && cols % 8 == 0 {
            canvas.corner4(next(&mut pos));
        }

        loop {
            if row < rows as i64 && col >= 0 && !out_of_bounds_placed(&canvas, row, col) {
                canvas.utah(row as usize, col as usize, next(&mut pos));
            }
            row -= 2;
            col += 2;
            if row < 0 || col >= cols as i64 {
                break;
            }
        }
        row += 1;
        col += 3;

        loop {
            if row >= 0 && col < cols as i64 && !out_of_bounds_placed(&canvas, row, col) {
                canvas.utah(row as usize, col as usize, next(&mut pos));
            }
            row += 2;
            col -= 2;
            if row >= rows as i64 || col < 0 {
                break;
            }
        }
        row += 3;
        col += 1;

        if row >= rows as i64 && col >= cols as i64 {
            break;
        }
    }

    // The bottom-right corner module is left unplaced by the sweep for
    // every supported size; ISO/IEC 16022 fixes it and its diagonal
    // neighbor dark.
    if !canvas.is_placed(rows - 1, cols - 1) {
        let idx = (rows - 1) * cols + (cols - 1);
        canvas.bits[idx] = true;
        canvas.placed[idx] = true;
        let idx2 = (rows - 2) * cols + (cols - 2);
        canvas.bits[idx2] = true;
        canvas.placed[idx2] = true;
    }

    canvas.bits.chunks(cols).map(<[bool]>::to_vec).collect()
}

fn out_of_bounds_placed(canvas: &RegionCanvas, row: i64, col: i64) -> bool {
    if row < 0 || col < 0 || row as usize >= canvas.rows || col as usize >= canvas.cols {
        return false;
    }
    canvas.is_placed(row as usize, col as usize)
}

/// Draws the ECC200 finder pattern around a data region: a solid left
/// column and bottom row, and an alternating (timing) top row and right
/// column.
///
/// `region` is the region's interior data grid (`data_rows x data_cols`);
/// the returned grid is `(data_rows + 2) x (data_cols + 2)`.
#[must_use]
pub fn with_finder_pattern(region: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let data_rows = region.len();
    let data_cols = region.first().map_or(0, Vec::len);
    let total_rows = data_rows + 2;
    let total_cols = data_cols + 2;

    let mut out = vec![vec![false; total_cols]; total_rows];

    // solid left column and bottom row
    for r in out.iter_mut() {
        r[0] = true;
    }
    for c in out[total_rows - 1].iter_mut() {
        *c = true;
    }
    // alternating top row and right column
    for (c, cell) in out[0].iter_mut().enumerate() {
        *cell = c % 2 == 0;
    }
    for (r, row) in out.iter_mut().enumerate() {
        row[total_cols - 1] = r % 2 == 0;
    }

    for (r, row) in region.iter().enumerate() {
        for (c, &dark) in row.iter().enumerate() {
            out[r + 1][c + 1] = dark;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_symbol_places_every_codeword_slot() {
        // 10x10 symbol: 8x8 data region, 1 data + 5 ecc codewords.
        let codewords = [0xAAu8, 1, 2, 3, 4, 5];
        let grid = place_region(&codewords, 8, 8);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid[0].len(), 8);
    }

    #[test]
    fn finder_pattern_adds_solid_and_alternating_borders() {
        let region = vec![vec![false; 4]; 4];
        let framed = with_finder_pattern(&region);
        assert_eq!(framed.len(), 6);
        assert_eq!(framed[0].len(), 6);
        // left column solid
        assert!(framed.iter().all(|row| row[0]));
        // bottom row solid
        assert!(framed[5].iter().all(|&c| c));
        // top row alternates starting dark
        assert_eq!(framed[0], vec![true, false, true, false, true, false]);
    }

    #[test]
    fn placement_is_deterministic() {
        let codewords: Vec<u8> = (0..20).collect();
        let a = place_region(&codewords, 12, 12);
        let b = place_region(&codewords, 12, 12);
        assert_eq!(a, b);
    }
}
