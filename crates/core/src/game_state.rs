//! Game state module - the value object the engine owns
//!
//! [`GameState`] holds the board, the current/next piece pair, the counters and the
//! run flags. It has no behavior beyond queries and the collision predicate; every
//! mutation goes through [`crate::GameEngine`].

use crate::board::Board;
use crate::pieces::Shape;
use crate::scoring::get_drop_interval_ms;
use crate::types::{PieceKind, COLS, ROWS};

/// A positioned piece
///
/// `x`/`y` are the board coordinates of the shape matrix's top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece at its spawn position: horizontally centered, top row
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = Shape::of(kind);
        Self {
            kind,
            shape,
            x: (COLS / 2) as i8 - (shape.width() / 2) as i8,
            y: 0,
        }
    }

    /// Board color index (1..=7)
    pub fn color_index(&self) -> u8 {
        self.kind.color_index()
    }

    /// Copy moved by (dx, dy)
    pub fn offset(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Copy with the shape turned 90° clockwise, same x/y
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            ..*self
        }
    }

    /// Absolute board coordinates of filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Collision test at offset (dx, dy)
    ///
    /// A cell collides when its column is outside `0..COLS`, its row is at or past
    /// `ROWS`, or it sits on a filled board cell. Rows above the board (y < 0) are
    /// exempt from the occupancy check but still bounded horizontally.
    pub fn collides(&self, board: &Board, dx: i8, dy: i8) -> bool {
        self.cells().any(|(x, y)| {
            let (x, y) = (x + dx, y + dy);
            if x < 0 || x >= COLS as i8 || y >= ROWS as i8 {
                return true;
            }
            y >= 0 && board.is_occupied(x, y)
        })
    }
}

/// Lifecycle phase derived from the run flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) current: Option<Piece>,
    pub(crate) next: Option<Piece>,
    pub(crate) score: u32,
    pub(crate) lines: u32,
    pub(crate) level: u32,
    pub(crate) drop_interval_ms: u32,
    pub(crate) running: bool,
    pub(crate) paused: bool,
    pub(crate) game_over: bool,
}

impl GameState {
    /// Fresh idle state with the given level-1 gravity interval
    pub fn new(initial_drop_ms: u32) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: initial_drop_ms,
            running: false,
            paused: false,
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Total lines cleared this game
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        match (self.running, self.paused, self.game_over) {
            (true, true, _) => Phase::Paused,
            (true, false, _) => Phase::Running,
            (false, _, true) => Phase::GameOver,
            (false, _, false) => Phase::Idle,
        }
    }

    /// Collision predicate against this state's board
    pub fn is_collision(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece.collides(&self.board, dx, dy)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(get_drop_interval_ms(1))
    }
}
