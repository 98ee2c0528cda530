//! RNG module - injectable piece sources
//!
//! The engine asks a [`PieceSource`] for every new piece. Two sources ship here:
//!
//! - [`RandomPieces`]: uniform and independent per draw (no bag), backed by a seedable
//!   ChaCha stream so a seed reproduces a game.
//! - [`ScriptedPieces`]: repeats a fixed pattern forever, for tests and demos.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::PieceKind;

/// Supplies the kind of each newly created piece
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

impl<P: PieceSource + ?Sized> PieceSource for Box<P> {
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Uniform random piece source
#[derive(Debug, Clone)]
pub struct RandomPieces {
    rng: ChaCha8Rng,
    seed: u64,
}

impl RandomPieces {
    /// Create a new source with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this source was created with (for replaying the same piece stream)
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomPieces {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PieceSource for RandomPieces {
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())]
    }
}

/// Debug source which repeats a certain pattern of kinds forever
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedPieces {
    pattern: Vec<PieceKind>,
    index: usize,
}

impl ScriptedPieces {
    /// An empty pattern yields `I` pieces.
    pub fn new(pattern: impl Into<Vec<PieceKind>>) -> Self {
        let mut pattern = pattern.into();
        if pattern.is_empty() {
            pattern.push(PieceKind::I);
        }
        Self { pattern, index: 0 }
    }

    /// Always the same kind
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl PieceSource for ScriptedPieces {
    fn next_kind(&mut self) -> PieceKind {
        let kind = self.pattern[self.index];
        self.index = (self.index + 1) % self.pattern.len();
        kind
    }
}
