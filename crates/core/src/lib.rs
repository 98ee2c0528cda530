//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules and the state machine of the game. It has no
//! dependencies on UI, timers or I/O:
//!
//! - **Deterministic**: a seeded [`RandomPieces`] or a [`ScriptedPieces`] reproduces a game
//! - **Host-driven**: gravity arrives as [`GameEngine::tick`] calls from an outside timer
//! - **Event-based**: sound cues, interval changes and game over are queued as
//!   [`EngineEvent`]s for the host to drain
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of locked cells and full-row compaction
//! - [`pieces`]: shape matrices and naive clockwise rotation
//! - [`game_state`]: positioned pieces, the collision predicate, counters and run flags
//! - [`engine`]: the command/tick state machine
//! - [`rng`]: injectable piece sources
//! - [`scoring`]: line, drop and level arithmetic
//! - [`snapshot`]: render-ready copy of the state
//!
//! # Game Rules
//!
//! - Pieces are drawn uniformly and independently (no bag)
//! - Rotation is clockwise only, with no wall kicks; a blocked rotation is rejected
//! - A piece locks as soon as gravity cannot move it (no lock delay)
//! - Soft drop scores 1 per step, hard drop 2 per row
//! - Clearing `n` lines scores `n * 100 * level`, with the level from before the clear
//! - Level rises every 10 lines; gravity speeds up by 100ms per level, down to 100ms
//! - Game over happens when a newly spawned piece collides
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameEngine, ScriptedPieces, TickOutcome};
//! use blockfall_types::PieceKind;
//!
//! let mut game = GameEngine::new(ScriptedPieces::repeat(PieceKind::O));
//! game.start();
//!
//! game.move_right();
//! assert!(matches!(game.hard_drop(), TickOutcome::Locked(_)));
//!
//! // 18 rows at 2 points each
//! assert_eq!(game.state().score(), 36);
//! ```

pub mod board;
pub mod engine;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use engine::{EngineEvent, GameEngine, LockReport, TickOutcome};
pub use game_state::{GameState, Phase, Piece};
pub use pieces::Shape;
pub use rng::{PieceSource, RandomPieces, ScriptedPieces};
pub use scoring::{calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms};
pub use snapshot::GameSnapshot;
