//! Game engine module - the state machine driving a [`GameState`]
//!
//! The engine is driven by discrete commands and by an external gravity timer that
//! calls [`GameEngine::tick`]. It never sleeps, schedules or performs I/O. Anything a
//! host needs to react to (sound cues, timer rearming, the final score) is queued as an
//! [`EngineEvent`] and handed out by [`GameEngine::drain_events`].
//!
//! Rejected commands (illegal move, wrong phase) are silent no-ops that return `false`
//! or [`TickOutcome::Ignored`].

use std::vec::Drain;

use crate::game_state::{GameState, Phase, Piece};
use crate::rng::{PieceSource, RandomPieces};
use crate::scoring::{calculate_drop_score, calculate_level, calculate_line_score, get_drop_interval_ms};
use crate::snapshot::GameSnapshot;
use crate::types::{Difficulty, GameCommand, SoundEvent};
use crate::Board;

/// Something the host should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Play this cue
    Sound(SoundEvent),
    /// Cancel the gravity timer and rearm it with this period
    DropIntervalChanged(u32),
    /// The game just ended with this score
    GameOver { score: u32 },
}

/// What a lock did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockReport {
    /// Rows descended by a hard drop before locking (0 for gravity locks)
    pub rows_dropped: u32,
    pub lines_cleared: u32,
    /// The next piece could not spawn
    pub game_over: bool,
}

/// Result of a gravity step or a hard drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, paused, or no active piece
    Ignored,
    /// Piece moved down one row
    Moved,
    /// Piece locked; the next piece was spawned
    Locked(LockReport),
}

impl TickOutcome {
    pub fn is_locked(&self) -> bool {
        matches!(self, TickOutcome::Locked(_))
    }
}

/// Falling-block game engine
#[derive(Debug, Clone)]
pub struct GameEngine<S = RandomPieces> {
    state: GameState,
    pieces: S,
    difficulty: Difficulty,
    events: Vec<EngineEvent>,
}

impl<S: PieceSource> GameEngine<S> {
    /// Create an idle engine at normal difficulty
    pub fn new(pieces: S) -> Self {
        Self::with_difficulty(pieces, Difficulty::Normal)
    }

    pub fn with_difficulty(pieces: S, difficulty: Difficulty) -> Self {
        Self {
            state: GameState::new(difficulty.initial_drop_ms()),
            pieces,
            difficulty,
            events: Vec::with_capacity(8),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Select the difficulty used by the next fresh game.
    ///
    /// Applied immediately when idle; otherwise picked up by the next reset/start.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        if self.state.phase() == Phase::Idle {
            self.state.drop_interval_ms = difficulty.initial_drop_ms();
        }
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.state.drop_interval_ms
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// Mutable board access for scenario setup (puzzles, tests)
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.state.board
    }

    pub fn pieces(&self) -> &S {
        &self.pieces
    }

    /// Collision predicate against the current board
    pub fn is_collision(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        self.state.is_collision(piece, dx, dy)
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Drain<'_, EngineEvent> {
        self.events.drain(..)
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Clear everything back to an idle game
    pub fn reset(&mut self) {
        self.state = GameState::new(self.difficulty.initial_drop_ms());
    }

    /// Start a fresh game, or resume a paused one
    ///
    /// Returns false when a game is already running unpaused.
    pub fn start(&mut self) -> bool {
        if self.state.running && !self.state.paused {
            return false;
        }

        if !self.state.running {
            self.reset();
            self.state.running = true;
            self.spawn_piece();
        }

        self.state.paused = false;
        true
    }

    /// Toggle pause. Only effective while running.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.paused = !self.state.paused;
        true
    }

    /// Active piece, if commands may act on it
    fn playable_piece(&self) -> Option<Piece> {
        if !self.state.running || self.state.paused {
            return None;
        }
        self.state.current
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        let Some(piece) = self.playable_piece() else {
            return false;
        };

        if self.state.is_collision(&piece, dx, 0) {
            return false;
        }

        self.state.current = Some(piece.offset(dx, 0));
        self.emit(EngineEvent::Sound(SoundEvent::Move));
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1)
    }

    /// Rotate 90° clockwise in place; no wall kicks
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.playable_piece() else {
            return false;
        };

        let rotated = piece.rotated();
        if self.state.is_collision(&rotated, 0, 0) {
            return false;
        }

        self.state.current = Some(rotated);
        self.emit(EngineEvent::Sound(SoundEvent::Rotate));
        true
    }

    /// Gravity step: move down one row, or lock and spawn the next piece
    pub fn tick(&mut self) -> TickOutcome {
        let Some(piece) = self.playable_piece() else {
            return TickOutcome::Ignored;
        };

        if !self.state.is_collision(&piece, 0, 1) {
            self.state.current = Some(piece.offset(0, 1));
            return TickOutcome::Moved;
        }

        TickOutcome::Locked(self.lock_and_spawn(0))
    }

    /// Player-driven gravity step, worth one point whether it moves or locks
    pub fn soft_drop_step(&mut self) -> TickOutcome {
        if self.playable_piece().is_none() {
            return TickOutcome::Ignored;
        }

        // Scored before stepping so a game over reports the final total
        self.state.score = self
            .state
            .score
            .saturating_add(calculate_drop_score(1, false));
        self.tick()
    }

    /// Drop to the lowest legal row (two points per row) and lock
    pub fn hard_drop(&mut self) -> TickOutcome {
        let Some(mut piece) = self.playable_piece() else {
            return TickOutcome::Ignored;
        };

        let mut rows: u32 = 0;
        while !self.state.is_collision(&piece, 0, 1) {
            piece = piece.offset(0, 1);
            rows += 1;
        }

        self.state.current = Some(piece);
        self.state.score = self
            .state
            .score
            .saturating_add(calculate_drop_score(rows, true));

        let report = self.lock_and_spawn(rows);
        self.emit(EngineEvent::Sound(SoundEvent::Drop));
        TickOutcome::Locked(report)
    }

    /// Apply a command
    ///
    /// Returns whether the command changed anything.
    pub fn apply(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::MoveLeft => self.move_left(),
            GameCommand::MoveRight => self.move_right(),
            GameCommand::Rotate => self.rotate(),
            GameCommand::SoftDrop => self.soft_drop_step() != TickOutcome::Ignored,
            GameCommand::HardDrop => self.hard_drop() != TickOutcome::Ignored,
            GameCommand::Start => self.start(),
            GameCommand::Pause => self.toggle_pause(),
            GameCommand::Reset => {
                self.reset();
                true
            }
        }
    }

    /// Row the active piece would occupy after a hard drop
    pub fn ghost_y(&self) -> Option<i8> {
        let piece = self.state.current?;

        let mut drop_distance: i8 = 0;
        while !self.state.is_collision(&piece, 0, drop_distance + 1) {
            drop_distance += 1;
        }

        Some(piece.y + drop_distance)
    }

    fn lock_and_spawn(&mut self, rows_dropped: u32) -> LockReport {
        self.merge_piece();
        let lines_cleared = self.clear_lines();
        self.spawn_piece();

        LockReport {
            rows_dropped,
            lines_cleared,
            game_over: self.state.game_over,
        }
    }

    /// Promote `next` (or draw two pieces on the first spawn) and test the spawn
    fn spawn_piece(&mut self) {
        let current = match self.state.next.take() {
            Some(next) => next,
            None => Piece::spawn(self.pieces.next_kind()),
        };
        self.state.next = Some(Piece::spawn(self.pieces.next_kind()));
        self.state.current = Some(current);

        if self.state.is_collision(&current, 0, 0) {
            self.end_game();
        }
    }

    /// Write the active piece into the board
    fn merge_piece(&mut self) {
        let Some(piece) = self.state.current else {
            return;
        };

        for (x, y) in piece.cells() {
            // Rows above the board are dropped
            if y >= 0 {
                self.state.board.set(x, y, Some(piece.kind));
            }
        }
    }

    /// Remove full rows and apply scoring/level/speed changes
    fn clear_lines(&mut self) -> u32 {
        let cleared = self.state.board.clear_full_rows().len() as u32;
        if cleared == 0 {
            return 0;
        }

        let level_before = self.state.level;
        self.state.lines = self.state.lines.saturating_add(cleared);
        self.state.score = self
            .state
            .score
            .saturating_add(calculate_line_score(cleared, level_before));
        self.state.level = calculate_level(self.state.lines);
        self.state.drop_interval_ms = get_drop_interval_ms(self.state.level);

        self.emit(EngineEvent::Sound(SoundEvent::Clear));
        self.emit(EngineEvent::DropIntervalChanged(self.state.drop_interval_ms));
        cleared
    }

    fn end_game(&mut self) {
        self.state.running = false;
        self.state.paused = false;
        self.state.game_over = true;
        self.emit(EngineEvent::Sound(SoundEvent::GameOver));
        self.emit(EngineEvent::GameOver {
            score: self.state.score,
        });
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.board.write_color_grid(&mut out.board);
        out.current = self.state.current;
        out.next = self.state.next;
        out.ghost_y = self.ghost_y();
        out.phase = self.state.phase();
        out.score = self.state.score;
        out.lines = self.state.lines;
        out.level = self.state.level;
        out.drop_interval_ms = self.state.drop_interval_ms;
        out.difficulty = self.difficulty;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RandomPieces, ScriptedPieces};
    use crate::types::{PieceKind, COLS};

    fn engine_with(kinds: &[PieceKind]) -> GameEngine<ScriptedPieces> {
        GameEngine::new(ScriptedPieces::new(kinds.to_vec()))
    }

    fn sounds(engine: &mut GameEngine<ScriptedPieces>) -> Vec<SoundEvent> {
        engine
            .drain_events()
            .filter_map(|e| match e {
                EngineEvent::Sound(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Fill row `y` except the given columns
    fn fill_row_except(engine: &mut GameEngine<ScriptedPieces>, y: i8, holes: &[i8]) {
        for x in 0..COLS as i8 {
            if !holes.contains(&x) {
                engine.board_mut().set(x, y, Some(PieceKind::J));
            }
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = GameEngine::new(RandomPieces::new(12345));
        let state = engine.state();

        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!state.running());
        assert!(!state.paused());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(engine.drop_interval_ms(), 1000);
        assert!(state.current().is_none());
        assert!(state.next().is_none());
    }

    #[test]
    fn test_start_spawns_current_and_next() {
        let mut engine = engine_with(&[PieceKind::T, PieceKind::I, PieceKind::O]);
        assert!(engine.start());

        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.state().current().unwrap().kind, PieceKind::T);
        assert_eq!(engine.state().next().unwrap().kind, PieceKind::I);

        // Already running: no-op
        assert!(!engine.start());
        assert_eq!(engine.state().current().unwrap().kind, PieceKind::T);
    }

    #[test]
    fn test_commands_ignored_while_idle() {
        let mut engine = engine_with(&[PieceKind::T]);
        assert!(!engine.move_left());
        assert!(!engine.rotate());
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.soft_drop_step(), TickOutcome::Ignored);
        assert_eq!(engine.hard_drop(), TickOutcome::Ignored);
        assert!(!engine.toggle_pause());
        assert_eq!(engine.state().score(), 0);
        assert!(!engine.has_events());
    }

    #[test]
    fn test_pause_blocks_piece_commands() {
        let mut engine = engine_with(&[PieceKind::T]);
        engine.start();
        assert!(engine.toggle_pause());
        assert_eq!(engine.phase(), Phase::Paused);

        let before = engine.state().current();
        assert!(!engine.move_right());
        assert!(!engine.rotate());
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(engine.hard_drop(), TickOutcome::Ignored);
        assert_eq!(engine.state().current(), before);

        // Start resumes without resetting
        assert!(engine.start());
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.state().current(), before);
    }

    #[test]
    fn test_move_emits_sound_only_on_success() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();

        assert!(engine.move_left());
        assert_eq!(engine.state().current().unwrap().x, 3);
        assert_eq!(sounds(&mut engine), vec![SoundEvent::Move]);

        for _ in 0..10 {
            engine.move_left();
        }
        assert_eq!(engine.state().current().unwrap().x, 0);
        assert_eq!(sounds(&mut engine).len(), 3);

        assert!(!engine.move_left());
        assert!(sounds(&mut engine).is_empty());
    }

    #[test]
    fn test_rotate_replaces_shape() {
        let mut engine = engine_with(&[PieceKind::T]);
        engine.start();
        let before = engine.state().current().unwrap();

        assert!(engine.rotate());
        let after = engine.state().current().unwrap();
        assert_eq!(after.shape, before.shape.rotated());
        assert_eq!((after.x, after.y), (before.x, before.y));
        assert_eq!(sounds(&mut engine), vec![SoundEvent::Rotate]);
    }

    #[test]
    fn test_four_rotations_restore_piece() {
        for kind in [PieceKind::I, PieceKind::O, PieceKind::T] {
            let mut engine = engine_with(&[kind]);
            engine.start();
            // Away from the walls and the top edge
            for _ in 0..5 {
                engine.tick();
            }
            let before = engine.state().current();

            for _ in 0..4 {
                assert!(engine.rotate(), "{:?}", kind);
            }
            assert_eq!(engine.state().current(), before, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_blocked_is_noop() {
        let mut engine = engine_with(&[PieceKind::I]);
        engine.start();
        // Vertical I needs rows 0..=3 in column 3
        engine.board_mut().set(3, 2, Some(PieceKind::Z));
        let before = engine.state().current();

        assert!(!engine.rotate());
        assert_eq!(engine.state().current(), before);
        assert!(sounds(&mut engine).is_empty());
    }

    #[test]
    fn test_rotate_against_right_wall_is_rejected() {
        let mut engine = engine_with(&[PieceKind::I]);
        engine.start();
        assert!(engine.rotate()); // vertical at x=3
        while engine.move_right() {}
        assert_eq!(engine.state().current().unwrap().x, 9);

        // Horizontal I would need columns 9..=12; no kick moves it back in
        assert!(!engine.rotate());
        assert_eq!(engine.state().current().unwrap().shape.width(), 1);
    }

    #[test]
    fn test_tick_moves_then_locks() {
        let mut engine = engine_with(&[PieceKind::O, PieceKind::T, PieceKind::I]);
        engine.start();

        for row in 1..=18 {
            assert_eq!(engine.tick(), TickOutcome::Moved);
            assert_eq!(engine.state().current().unwrap().y, row);
        }

        let outcome = engine.tick();
        assert_eq!(
            outcome,
            TickOutcome::Locked(LockReport {
                rows_dropped: 0,
                lines_cleared: 0,
                game_over: false,
            })
        );
        assert_eq!(engine.board().get(4, 19), Some(Some(PieceKind::O)));
        assert_eq!(engine.board().get(5, 18), Some(Some(PieceKind::O)));
        assert_eq!(engine.state().current().unwrap().kind, PieceKind::T);
        assert_eq!(engine.state().next().unwrap().kind, PieceKind::I);
        assert_eq!(engine.state().score(), 0);
    }

    #[test]
    fn test_soft_drop_scores_one_per_step() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();

        assert_eq!(engine.soft_drop_step(), TickOutcome::Moved);
        assert_eq!(engine.soft_drop_step(), TickOutcome::Moved);
        assert_eq!(engine.state().score(), 2);

        // Locking step still scores
        for _ in 0..16 {
            engine.tick();
        }
        assert!(engine.soft_drop_step().is_locked());
        assert_eq!(engine.state().score(), 3);
    }

    #[test]
    fn test_hard_drop_scores_two_per_row() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();

        let outcome = engine.hard_drop();
        match outcome {
            TickOutcome::Locked(report) => {
                assert_eq!(report.rows_dropped, 18);
                assert_eq!(report.lines_cleared, 0);
                assert!(!report.game_over);
            }
            other => panic!("expected lock, got {:?}", other),
        }
        assert_eq!(engine.state().score(), 36);
        assert_eq!(sounds(&mut engine), vec![SoundEvent::Drop]);
    }

    #[test]
    fn test_line_clear_scores_by_level_before_clear() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();
        // Two rows missing columns 4 and 5, exactly where the O lands
        fill_row_except(&mut engine, 18, &[4, 5]);
        fill_row_except(&mut engine, 19, &[4, 5]);

        let outcome = engine.hard_drop();
        let TickOutcome::Locked(report) = outcome else {
            panic!("expected lock");
        };
        assert_eq!(report.lines_cleared, 2);
        // 18 rows * 2 + 2 lines * 100 * level 1
        assert_eq!(engine.state().score(), 36 + 200);
        assert_eq!(engine.state().lines(), 2);
        assert!(engine.board().is_empty());

        let events: Vec<_> = engine.drain_events().collect();
        assert_eq!(
            events,
            vec![
                EngineEvent::Sound(SoundEvent::Clear),
                EngineEvent::DropIntervalChanged(1000),
                EngineEvent::Sound(SoundEvent::Drop),
            ]
        );
    }

    #[test]
    fn test_level_up_at_ten_lines() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();
        engine.state.lines = 8;

        fill_row_except(&mut engine, 18, &[4, 5]);
        fill_row_except(&mut engine, 19, &[4, 5]);
        engine.hard_drop();

        assert_eq!(engine.state().lines(), 10);
        assert_eq!(engine.state().level(), 2);
        assert_eq!(engine.drop_interval_ms(), 900);
        // Points use level 1, the level before the clear
        assert_eq!(engine.state().score(), 36 + 200);
        assert!(engine
            .drain_events()
            .any(|e| e == EngineEvent::DropIntervalChanged(900)));
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();
        // Block the spawn area below the falling piece's landing spot
        for y in 2..20 {
            fill_row_except(&mut engine, y, &[0]);
        }

        let outcome = engine.hard_drop();
        let TickOutcome::Locked(report) = outcome else {
            panic!("expected lock");
        };
        assert!(report.game_over);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert!(!engine.state().running());

        let events: Vec<_> = engine.drain_events().collect();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, EngineEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(events.contains(&EngineEvent::Sound(SoundEvent::GameOver)));
        assert!(events.contains(&EngineEvent::GameOver { score: 0 }));

        // Terminal until the next start
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert!(!engine.toggle_pause());
        assert!(engine.start());
        assert!(engine.board().is_empty());
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_soft_drop_lock_counts_toward_final_score() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();
        for y in 2..20 {
            fill_row_except(&mut engine, y, &[0]);
        }

        // The step cannot move, so it locks at the spawn row and the respawn collides
        let outcome = engine.soft_drop_step();
        assert!(matches!(outcome, TickOutcome::Locked(report) if report.game_over));
        assert_eq!(engine.state().score(), 1);
        assert!(engine
            .drain_events()
            .any(|e| e == EngineEvent::GameOver { score: 1 }));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = engine_with(&[PieceKind::O]);
        engine.start();
        engine.hard_drop();
        assert!(engine.state().score() > 0);

        engine.reset();
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.state().score(), 0);
        assert!(engine.board().is_empty());
        assert!(engine.state().current().is_none());
        assert!(engine.state().next().is_none());
    }

    #[test]
    fn test_difficulty_sets_initial_interval() {
        let mut engine = GameEngine::with_difficulty(ScriptedPieces::repeat(PieceKind::O), Difficulty::Hard);
        assert_eq!(engine.drop_interval_ms(), 500);
        engine.start();
        assert_eq!(engine.drop_interval_ms(), 500);

        engine.set_difficulty(Difficulty::Easy);
        // Running game keeps its interval
        assert_eq!(engine.drop_interval_ms(), 500);
        engine.reset();
        assert_eq!(engine.drop_interval_ms(), 1500);
    }

    #[test]
    fn test_ghost_y() {
        let mut engine = engine_with(&[PieceKind::O]);
        assert_eq!(engine.ghost_y(), None);
        engine.start();
        assert_eq!(engine.ghost_y(), Some(18));

        engine.board_mut().set(4, 10, Some(PieceKind::L));
        assert_eq!(engine.ghost_y(), Some(8));
    }

    #[test]
    fn test_apply_dispatches() {
        let mut engine = engine_with(&[PieceKind::O]);
        assert!(engine.apply(GameCommand::Start));
        assert!(engine.apply(GameCommand::MoveRight));
        assert!(engine.apply(GameCommand::SoftDrop));
        assert!(engine.apply(GameCommand::HardDrop));
        assert!(engine.apply(GameCommand::Pause));
        assert!(!engine.apply(GameCommand::MoveLeft));
        assert!(engine.apply(GameCommand::Reset));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_snapshot() {
        let mut engine = engine_with(&[PieceKind::O, PieceKind::T]);
        engine.start();
        engine.board_mut().set(0, 19, Some(PieceKind::Z));

        let snap = engine.snapshot();
        assert_eq!(snap.board[19][0], 7);
        assert_eq!(snap.current.unwrap().kind, PieceKind::O);
        assert_eq!(snap.next.unwrap().kind, PieceKind::T);
        assert_eq!(snap.ghost_y, Some(18));
        assert_eq!(snap.phase, Phase::Running);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.drop_interval_ms, 1000);
    }
}
