use crate::game_state::{Phase, Piece};
use crate::types::{Difficulty, COLS, ROWS};

/// Render-ready copy of the engine state
///
/// `board` holds color indices (0 = empty, 1..=7 by piece kind). The active piece is
/// not merged into it; renderers overlay `current` (and `ghost_y`) themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[u8; COLS as usize]; ROWS as usize],
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub ghost_y: Option<i8>,
    pub phase: Phase,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    pub difficulty: Difficulty,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[0u8; COLS as usize]; ROWS as usize];
        self.current = None;
        self.next = None;
        self.ghost_y = None;
        self.phase = Phase::Idle;
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.drop_interval_ms = Difficulty::Normal.initial_drop_ms();
        self.difficulty = Difficulty::Normal;
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[0u8; COLS as usize]; ROWS as usize],
            current: None,
            next: None,
            ghost_y: None,
            phase: Phase::Idle,
            score: 0,
            lines: 0,
            level: 1,
            drop_interval_ms: 0,
            difficulty: Difficulty::Normal,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn default_snapshot_is_idle_level_one() {
        let s = GameSnapshot::default();
        assert_eq!(s.phase, Phase::Idle);
        assert_eq!(s.level, 1);
        assert_eq!(s.drop_interval_ms, 1000);
        assert!(s.board.iter().flatten().all(|&c| c == 0));
    }

    #[test]
    fn clear_resets_reused_snapshot() {
        let mut s = GameSnapshot::default();
        s.board[3][3] = 5;
        s.current = Some(Piece::spawn(PieceKind::S));
        s.phase = Phase::Running;
        s.score = 900;

        s.clear();
        assert_eq!(s, GameSnapshot::default());
    }
}
