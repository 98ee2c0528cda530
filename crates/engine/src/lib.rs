//! Scheduling driver for the game engine
//!
//! [`Session`] owns a [`GameEngine`](blockfall_core::GameEngine), a [`GravityTimer`] and
//! the three collaborators the engine talks to:
//!
//! - [`Renderer`]: gets a snapshot after every state-changing operation
//! - [`SoundSink`]: gets one cue per triggering operation, behind a [`SoundSwitch`]
//! - [`HighScoreStore`]: asked to persist the final score once per game over
//!
//! The session never sleeps. A front-end feeds it commands and elapsed time:
//!
//! ```
//! use blockfall_core::{GameEngine, Phase, ScriptedPieces};
//! use blockfall_engine::{MemoryHighScore, MutedSound, NullRenderer, Session};
//! use blockfall_types::{GameCommand, PieceKind};
//!
//! let engine = GameEngine::new(ScriptedPieces::repeat(PieceKind::T));
//! let mut session = Session::new(engine, NullRenderer, MutedSound, MemoryHighScore::new());
//!
//! session.dispatch(GameCommand::Start);
//! assert_eq!(session.advance(2500), 2);
//! assert_eq!(session.phase(), Phase::Running);
//! ```

pub mod session;
pub mod sinks;
pub mod store;
pub mod timer;

pub use session::Session;
pub use sinks::{
    CaptureRenderer, Hud, MutedSound, NullRenderer, RecordingSound, Renderer, SoundSink,
    SoundSwitch,
};
pub use store::{FileHighScore, HighScoreStore, MemoryHighScore};
pub use timer::GravityTimer;
