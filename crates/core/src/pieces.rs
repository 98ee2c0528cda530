//! Pieces module - tetromino shape matrices and naive rotation
//!
//! Each kind has one canonical boolean matrix (its spawn orientation). Rotation
//! builds a new matrix by transposing and reversing each resulting row, which is a
//! 90° clockwise turn about the matrix corner. There are no wall kicks: a rotation
//! that collides is simply rejected by the engine.

use crate::types::PieceKind;

/// Largest side of any shape matrix
pub const MAX_SHAPE_SIDE: usize = 4;

/// Immutable boolean shape matrix, `cells[row][col]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

const fn shape<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Shape {
    let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
    let mut r = 0;
    while r < H {
        let mut c = 0;
        while c < W {
            cells[r][c] = rows[r][c] != 0;
            c += 1;
        }
        r += 1;
    }
    Shape {
        width: W as u8,
        height: H as u8,
        cells,
    }
}

const I_SHAPE: Shape = shape([[1, 1, 1, 1]]);
const J_SHAPE: Shape = shape([[1, 0, 0], [1, 1, 1]]);
const L_SHAPE: Shape = shape([[0, 0, 1], [1, 1, 1]]);
const O_SHAPE: Shape = shape([[1, 1], [1, 1]]);
const S_SHAPE: Shape = shape([[0, 1, 1], [1, 1, 0]]);
const T_SHAPE: Shape = shape([[0, 1, 0], [1, 1, 1]]);
const Z_SHAPE: Shape = shape([[1, 1, 0], [0, 1, 1]]);

impl Shape {
    /// Canonical spawn shape for a piece kind
    pub fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => I_SHAPE,
            PieceKind::J => J_SHAPE,
            PieceKind::L => L_SHAPE,
            PieceKind::O => O_SHAPE,
            PieceKind::S => S_SHAPE,
            PieceKind::T => T_SHAPE,
            PieceKind::Z => Z_SHAPE,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the matrix cell at (col, row) is filled. Outside the matrix is empty.
    pub fn is_filled(&self, col: u8, row: u8) -> bool {
        col < self.width && row < self.height && self.cells[row as usize][col as usize]
    }

    /// Rotated copy: transpose, then reverse each row.
    ///
    /// `new[r][c] = old[height - 1 - c][r]`, so a `w x h` matrix becomes `h x w`.
    pub fn rotated(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        let (w, h) = (self.width as usize, self.height as usize);
        for (r, row) in cells.iter_mut().enumerate().take(w) {
            for (c, cell) in row.iter_mut().enumerate().take(h) {
                *cell = self.cells[h - 1 - c][r];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Offsets (dx, dy) of filled cells, row-major
    pub fn filled_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width)
                .filter(move |&col| self.cells[row as usize][col as usize])
                .map(move |col| (col as i8, row as i8))
        })
    }
}
