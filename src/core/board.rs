//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty, part of the active
//! falling piece, or locked in place. Uses a flat array for cache locality
//! and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (top to bottom).

use arrayvec::ArrayVec;

use crate::types::{Cell, Coord, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
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

    /// Check if a single position may be entered by a falling piece:
    /// within bounds and not locked. The active piece's own falling cells
    /// never block, so a piece may always re-occupy its current position.
    pub fn is_legal_cell(&self, x: i8, y: i8) -> bool {
        match self.get(x, y) {
            Some(cell) => !cell.is_locked(),
            None => false,
        }
    }

    /// Check that all 4 candidate cells are in-bounds and unlocked.
    ///
    /// Pure query, no side effects. The per-cell bounds check covers the
    /// column boundary for every mino individually, so a shift can never
    /// wrap to an adjacent row.
    pub fn is_legal(&self, cells: &[Coord; 4]) -> bool {
        cells.iter().all(|&(x, y)| self.is_legal_cell(x, y))
    }

    /// Mark 4 cells as falling with the given kind.
    ///
    /// Caller must have validated the cells via `is_legal`.
    pub fn set_falling(&mut self, cells: &[Coord; 4], kind: PieceKind) {
        for &(x, y) in cells {
            self.set(x, y, Cell::Falling(kind));
        }
    }

    /// Clear 4 cells back to empty (erase a falling piece before moving it)
    pub fn clear_cells(&mut self, cells: &[Coord; 4]) {
        for &(x, y) in cells {
            self.set(x, y, Cell::Empty);
        }
    }

    /// Convert 4 falling cells to locked, retaining the kind
    pub fn lock_cells(&mut self, cells: &[Coord; 4], kind: PieceKind) {
        for &(x, y) in cells {
            self.set(x, y, Cell::Locked(kind));
        }
    }

    /// Check if a row is completely locked
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_locked())
    }

    /// Clear all full rows and compact the remaining locked rows downward.
    /// Returns the row indices that were cleared, sorted top to bottom.
    ///
    /// Two-pointer pass with zero allocation: rows are scanned bottom-up,
    /// non-full rows are copied down to the write cursor, and the vacated
    /// rows at the top become empty. Must only run while no piece is
    /// falling (all non-empty cells locked).
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared_rows = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    // copy_within handles overlapping ranges safely
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Vacated rows at the top become empty
        for cell in &mut self.cells[..write_y * width] {
            *cell = Cell::Empty;
        }

        // Reverse to get top-to-bottom order
        cleared_rows.reverse();
        cleared_rows
    }

    /// All currently falling cells, top-left first (for invariant checks)
    pub fn falling_cells(&self) -> Vec<Coord> {
        let width = BOARD_WIDTH as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_falling())
            .map(|(idx, _)| ((idx % width) as i8, (idx / width) as i8))
            .collect()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::Empty;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
