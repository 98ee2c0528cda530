//! Shared types module - constants, piece kinds, commands and sound events
//!
//! Everything here is plain data with no external dependencies, so it can be used
//! by the engine, the scheduling driver and any front-end alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//!
//! # Timing and Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `INITIAL_DROP_SPEED_MS` | 1000 | Gravity interval at level 1 |
//! | `LEVEL_SPEED_DECREASE_MS` | 100 | Interval shaved off per level |
//! | `MIN_DROP_SPEED_MS` | 100 | Interval floor |
//! | `POINTS_PER_LINE` | 100 | Line clear points, multiplied by level |
//! | `LINES_PER_LEVEL` | 10 | Lines needed per level |
//! | `SOFT_DROP_POINTS` | 1 | Awarded per soft drop step |
//! | `HARD_DROP_POINTS_PER_ROW` | 2 | Awarded per row descended by a hard drop |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Difficulty, PieceKind, COLS, ROWS};
//!
//! assert_eq!(PieceKind::T.color_index(), 6);
//! assert_eq!(PieceKind::from_color_index(6), Some(PieceKind::T));
//! assert_eq!(Difficulty::parse("nightmare"), Difficulty::Normal);
//!
//! assert_eq!(COLS, 10);
//! assert_eq!(ROWS, 20);
//! ```

/// Board width in cells (10 columns)
pub const COLS: u8 = 10;

/// Board height in cells (20 rows)
pub const ROWS: u8 = 20;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const INITIAL_DROP_SPEED_MS: u32 = 1000;

/// Interval reduction applied for every level above 1
pub const LEVEL_SPEED_DECREASE_MS: u32 = 100;

/// Gravity interval floor
pub const MIN_DROP_SPEED_MS: u32 = 100;

/// Base points per cleared line (multiplied by the level at clear time)
pub const POINTS_PER_LINE: u32 = 100;

/// Cleared lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points for one soft drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row descended during a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// The seven tetromino kinds
///
/// Declaration order follows the color index used on the board:
/// I=1, J=2, L=3, O=4, S=5, T=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds, in color-index order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Board color index (1..=7). 0 is reserved for empty cells.
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.color_index(), 1);
    /// assert_eq!(PieceKind::Z.color_index(), 7);
    /// ```
    pub fn color_index(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color_index`]. Returns `None` for 0 and anything above 7.
    pub fn from_color_index(index: u8) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// Display color as `#RRGGBB`.
    pub fn hex_color(&self) -> &'static str {
        match self {
            PieceKind::I => "#FF0D72",
            PieceKind::J => "#0DC2FF",
            PieceKind::L => "#0DFF72",
            PieceKind::O => "#F538FF",
            PieceKind::S => "#FF8E0D",
            PieceKind::T => "#FFE138",
            PieceKind::Z => "#3877FF",
        }
    }

    /// Display color as an `(r, g, b)` triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.hex_color().as_bytes();
        let channel = |i: usize| (nibble(hex[i]) << 4) | nibble(hex[i + 1]);
        (channel(1), channel(3), channel(5))
    }
}

fn nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

/// A cell on the game board
///
/// - `None`: empty
/// - `Some(kind)`: locked block, drawn with `kind`'s color index
pub type Cell = Option<PieceKind>;

/// Commands the engine accepts
///
/// Human input and any scripted driver funnel through this one enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate,
    /// One gravity step with soft drop scoring
    SoftDrop,
    /// Drop to the lowest legal row and lock
    HardDrop,
    /// Start a new game, or resume a paused one
    Start,
    /// Toggle pause
    Pause,
    /// Clear everything back to the idle state
    Reset,
}

/// Named difficulty, selecting the gravity interval a fresh game starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty key. Unknown keys fall back to [`Difficulty::Normal`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Gravity interval at the start of a game.
    pub fn initial_drop_ms(&self) -> u32 {
        match self {
            Difficulty::Easy => 1500,
            Difficulty::Normal => INITIAL_DROP_SPEED_MS,
            Difficulty::Hard => 500,
        }
    }
}

/// Symbolic sound cue emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Move,
    Rotate,
    Drop,
    Clear,
    GameOver,
}

/// Oscillator shape for a [`Tone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One scheduled tone of a sound cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub volume: f32,
    pub duration_ms: u32,
    pub waveform: Waveform,
    /// Offset from the start of the cue.
    pub delay_ms: u32,
}

const fn tone(freq_hz: f32, volume: f32, duration_ms: u32, waveform: Waveform, delay_ms: u32) -> Tone {
    Tone {
        freq_hz,
        volume,
        duration_ms,
        waveform,
        delay_ms,
    }
}

const MOVE_TONES: [Tone; 1] = [tone(800.0, 0.03, 80, Waveform::Sine, 0)];

const ROTATE_TONES: [Tone; 2] = [
    tone(600.0, 0.05, 100, Waveform::Square, 0),
    tone(900.0, 0.04, 80, Waveform::Square, 30),
];

const DROP_TONES: [Tone; 3] = [
    tone(80.0, 0.2, 80, Waveform::Sawtooth, 0),
    tone(60.0, 0.15, 120, Waveform::Triangle, 40),
    tone(200.0, 0.08, 150, Waveform::Sine, 60),
];

// C5 E5 G5 C6
const CLEAR_TONES: [Tone; 4] = [
    tone(523.0, 0.15, 80, Waveform::Sine, 0),
    tone(659.0, 0.15, 80, Waveform::Sine, 50),
    tone(784.0, 0.15, 80, Waveform::Sine, 100),
    tone(1047.0, 0.15, 80, Waveform::Sine, 150),
];

// C5 down to C4
const GAME_OVER_TONES: [Tone; 7] = [
    tone(523.0, 0.2, 150, Waveform::Triangle, 0),
    tone(494.0, 0.2, 150, Waveform::Triangle, 80),
    tone(440.0, 0.2, 150, Waveform::Triangle, 160),
    tone(392.0, 0.2, 150, Waveform::Triangle, 240),
    tone(349.0, 0.2, 150, Waveform::Triangle, 320),
    tone(294.0, 0.2, 150, Waveform::Triangle, 400),
    tone(262.0, 0.2, 150, Waveform::Triangle, 480),
];

impl SoundEvent {
    /// Tone sequence a synthesizing sink should play for this cue.
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEvent::Move => &MOVE_TONES,
            SoundEvent::Rotate => &ROTATE_TONES,
            SoundEvent::Drop => &DROP_TONES,
            SoundEvent::Clear => &CLEAR_TONES,
            SoundEvent::GameOver => &GAME_OVER_TONES,
        }
    }

    /// Total length of the cue in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.tones()
            .iter()
            .map(|t| t.delay_ms + t.duration_ms)
            .max()
            .unwrap_or(0)
    }
}
