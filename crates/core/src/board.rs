//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is either empty or holds the kind of the
//! piece that was locked there. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, COLS, ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (COLS as usize) * (ROWS as usize);

/// Upper bound on rows cleared in one pass
pub const ROW_COUNT: usize = ROWS as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * COLS + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= COLS as i8 || y < 0 || y >= ROWS as i8 {
            return None;
        }
        Some((y as usize) * (COLS as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        COLS
    }

    pub fn height(&self) -> u8 {
        ROWS
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Borrow one row of cells, or None past the bottom edge
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= ROWS as usize {
            return None;
        }
        let start = y * COLS as usize;
        Some(&self.cells[start..start + COLS as usize])
    }

    /// Fill an entire row with one kind. Returns false if `y` is off the board.
    pub fn fill_row(&mut self, y: usize, kind: PieceKind) -> bool {
        if y >= ROWS as usize {
            return false;
        }
        let start = y * COLS as usize;
        for cell in &mut self.cells[start..start + COLS as usize] {
            *cell = Some(kind);
        }
        true
    }

    /// Remove every full row, shifting the rows above down and refilling the top
    /// with empty rows.
    ///
    /// Equivalent to scanning bottom-to-top, splicing out each full row, pushing an
    /// empty row on top and re-testing the same index. Implemented as a single
    /// two-pointer compaction so nothing is allocated.
    ///
    /// Returns the original indices of the removed rows, bottom to top.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, ROW_COUNT> {
        let mut cleared_rows = ArrayVec::new();
        let width = COLS as usize;
        let mut write_y = ROWS as usize;

        for read_y in (0..ROWS as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    // copy_within handles the overlap
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// Write color indices (0 = empty) into a row-major grid
    pub fn write_color_grid(&self, out: &mut [[u8; COLS as usize]; ROWS as usize]) {
        for (y, row) in out.iter_mut().enumerate() {
            let start = y * COLS as usize;
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = self.cells[start + x].map_or(0, |kind| kind.color_index());
            }
        }
    }

    /// True when no cell is filled
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Create from a 2D vector for testing (converts to flat array)
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        assert_eq!(cells_2d.len(), ROWS as usize);
        assert!(cells_2d.iter().all(|row| row.len() == COLS as usize));

        let mut flat = [None; BOARD_SIZE];
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                flat[y * COLS as usize + x] = *cell;
            }
        }
        Self { cells: flat }
    }

    /// Convert to 2D vector for testing/display
    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        self.cells
            .chunks(COLS as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
