//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout libraries and instead renders into a simple
//! framebuffer that is diffed and flushed to the terminal.
//!
//! - [`GameView`] lays out the board, ghost, active piece, side panel and overlays
//! - [`TerminalRenderer`] owns raw mode and the alternate screen
//! - [`TerminalScreen`] and [`TerminalBell`] plug the terminal into a session

pub mod fb;
pub mod game_view;
pub mod renderer;
pub mod screen;

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::TerminalRenderer;
pub use screen::{TerminalBell, TerminalScreen};
