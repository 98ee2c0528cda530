//! Session - the engine wired to its collaborators and the gravity timer
//!
//! The session is the only place engine events turn into effects:
//!
//! | Event | Effect |
//! |-------|--------|
//! | `Sound(e)` | forwarded to the sound sink (if enabled) |
//! | `DropIntervalChanged(ms)` | gravity timer rearmed with `ms` |
//! | `GameOver { score }` | one `save_high_score_if_higher`, timer disarmed, cached high score refreshed |
//!
//! Every command and every batch of gravity ticks ends with exactly one render.

use blockfall_core::{EngineEvent, GameEngine, Phase, PieceSource, RandomPieces};
use blockfall_types::{Difficulty, GameCommand};

use crate::sinks::{Hud, Renderer, SoundSink, SoundSwitch};
use crate::store::HighScoreStore;
use crate::timer::GravityTimer;

pub struct Session<S, R, A, H> {
    engine: GameEngine<S>,
    renderer: R,
    sound: SoundSwitch<A>,
    store: H,
    timer: GravityTimer,
    high_score: u32,
}

impl<S, R, A, H> Session<S, R, A, H>
where
    S: PieceSource,
    R: Renderer,
    A: SoundSink,
    H: HighScoreStore,
{
    /// Wire up a session. The stored high score is loaded once here.
    pub fn new(engine: GameEngine<S>, renderer: R, sound: A, mut store: H) -> Self {
        let high_score = store.load_high_score();
        Self {
            engine,
            renderer,
            sound: SoundSwitch::new(sound, true),
            store,
            timer: GravityTimer::new(),
            high_score,
        }
    }

    pub fn engine(&self) -> &GameEngine<S> {
        &self.engine
    }

    /// Direct engine access for scenario setup. Events queued through it are routed
    /// on the next dispatch/advance.
    pub fn engine_mut(&mut self) -> &mut GameEngine<S> {
        &mut self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sound(&self) -> &SoundSwitch<A> {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut SoundSwitch<A> {
        &mut self.sound
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    /// Cached high score, refreshed after each game over
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            high_score: self.high_score,
            sound_enabled: self.sound.enabled(),
        }
    }

    /// Apply a command. Returns whether the engine accepted it.
    pub fn dispatch(&mut self, command: GameCommand) -> bool {
        let accepted = self.engine.apply(command);

        match command {
            GameCommand::Start if accepted => self.timer.arm(self.engine.drop_interval_ms()),
            GameCommand::Pause if accepted => {
                if self.engine.phase() == Phase::Paused {
                    self.timer.disarm();
                } else {
                    self.timer.arm(self.engine.drop_interval_ms());
                }
            }
            GameCommand::Reset => self.timer.disarm(),
            _ => {}
        }

        self.route_events();
        self.render();
        accepted
    }

    /// Reset, then start a fresh game
    pub fn restart(&mut self) -> bool {
        self.engine.reset();
        self.dispatch(GameCommand::Start)
    }

    /// Feed elapsed wall-clock time and run the gravity ticks that fell due.
    ///
    /// Returns the number of ticks applied.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        let due = self.timer.advance(elapsed_ms);

        let mut applied = 0;
        for _ in 0..due {
            if self.engine.phase() != Phase::Running {
                break;
            }
            self.engine.tick();
            applied += 1;

            // Rearmed or disarmed: the rest of this batch belonged to the old period
            if self.route_events() {
                break;
            }
        }

        if applied > 0 {
            self.render();
        }
        applied
    }

    /// Flip the sound flag and return the new value
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.sound.toggle();
        self.render();
        enabled
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound.set_enabled(enabled);
    }

    /// Difficulty for the next fresh game
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.engine.set_difficulty(difficulty);
    }

    pub fn render(&mut self) {
        let snapshot = self.engine.snapshot();
        let hud = self.hud();
        self.renderer.render(&snapshot, &hud);
    }

    /// Apply queued engine events. Returns whether the timer was rearmed or disarmed.
    fn route_events(&mut self) -> bool {
        let mut retimed = false;
        for event in self.engine.drain_events() {
            match event {
                EngineEvent::Sound(cue) => self.sound.play(cue),
                EngineEvent::DropIntervalChanged(ms) => {
                    self.timer.arm(ms);
                    retimed = true;
                }
                EngineEvent::GameOver { score } => {
                    self.store.save_high_score_if_higher(score);
                    self.timer.disarm();
                    self.high_score = self.store.load_high_score().max(score);
                    retimed = true;
                }
            }
        }
        retimed
    }
}

impl<R, A, H> Session<RandomPieces, R, A, H>
where
    R: Renderer,
    A: SoundSink,
    H: HighScoreStore,
{
    /// Seeded random session at the given difficulty
    pub fn seeded(seed: u64, difficulty: Difficulty, renderer: R, sound: A, store: H) -> Self {
        let engine = GameEngine::with_difficulty(RandomPieces::new(seed), difficulty);
        Self::new(engine, renderer, sound, store)
    }
}
