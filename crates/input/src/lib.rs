//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameCommand`]s and the
//! session-level controls (restart, sound toggle, quit). Every key press is one
//! command; there is no auto-repeat handling beyond what the terminal sends.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, is_restart, is_sound_toggle, map_key, should_quit, Control};
