//! High score persistence
//!
//! The stored value is a single number. Stores never fail toward the caller: a read
//! that cannot be completed yields 0 and a write that cannot be completed is dropped,
//! so the high score simply is not retained for that session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub trait HighScoreStore {
    fn load_high_score(&mut self) -> u32;

    /// Persist `score` if it beats the stored value
    fn save_high_score_if_higher(&mut self, score: u32);
}

/// In-memory store that also records every save request
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryHighScore {
    best: u32,
    save_requests: Vec<u32>,
}

impl MemoryHighScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self {
            best,
            save_requests: Vec::new(),
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Scores passed to `save_high_score_if_higher`, in call order
    pub fn save_requests(&self) -> &[u32] {
        &self.save_requests
    }
}

impl HighScoreStore for MemoryHighScore {
    fn load_high_score(&mut self) -> u32 {
        self.best
    }

    fn save_high_score_if_higher(&mut self, score: u32) {
        self.save_requests.push(score);
        self.best = self.best.max(score);
    }
}

/// JSON number in a file
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
    last_error: Option<String>,
}

impl FileHighScore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Most recent I/O or parse failure, for the front-end to report
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Read the stored value; a missing file is 0
    pub fn read(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let score: u32 = serde_json::from_str(text.trim())
            .with_context(|| format!("invalid high score in {}", self.path.display()))?;
        Ok(score)
    }

    /// Overwrite the stored value, creating parent directories as needed
    pub fn write(&self, score: u32) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
            }
        }

        let text = serde_json::to_string(&score)?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl HighScoreStore for FileHighScore {
    fn load_high_score(&mut self) -> u32 {
        match self.read() {
            Ok(score) => score,
            Err(e) => {
                self.last_error = Some(format!("{:#}", e));
                0
            }
        }
    }

    fn save_high_score_if_higher(&mut self, score: u32) {
        // A corrupt file is treated as 0 and replaced
        let stored = self.load_high_score();
        if score <= stored {
            return;
        }
        if let Err(e) = self.write(score) {
            self.last_error = Some(format!("{:#}", e));
        }
    }
}
