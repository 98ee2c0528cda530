//! Runtime configuration from environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `BLOCKFALL_DIFFICULTY` | `easy`, `normal` or `hard` | `normal` |
//! | `BLOCKFALL_SEED` | piece source seed | OS entropy |
//! | `BLOCKFALL_SOUND` | `0`, `false` or `off` mutes the bell | on |
//! | `BLOCKFALL_HIGH_SCORE_PATH` | high score file | `<data dir>/blockfall/high_score.json` |

use std::path::PathBuf;

use crate::types::Difficulty;

pub const HIGH_SCORE_FILE_NAME: &str = "high_score.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub difficulty: Difficulty,
    pub seed: Option<u64>,
    pub sound_enabled: bool,
    pub high_score_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: None,
            sound_enabled: true,
            high_score_path: default_high_score_path(),
        }
    }
}

impl RunConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup; unset or unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let difficulty = lookup("BLOCKFALL_DIFFICULTY")
            .map(|s| Difficulty::parse(&s))
            .unwrap_or_default();

        let seed = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok());

        let sound_enabled = lookup("BLOCKFALL_SOUND")
            .map(|s| !matches!(s.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off"))
            .unwrap_or(true);

        let high_score_path = lookup("BLOCKFALL_HIGH_SCORE_PATH")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
            .unwrap_or_else(default_high_score_path);

        Self {
            difficulty,
            seed,
            sound_enabled,
            high_score_path,
        }
    }
}

/// `<data dir>/blockfall/high_score.json`, or the working directory when the platform
/// has no data dir
pub fn default_high_score_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blockfall")
        .join(HIGH_SCORE_FILE_NAME)
}
