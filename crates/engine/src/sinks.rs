//! Collaborator traits the session feeds, and the stock in-process implementations
//!
//! - [`Renderer`] receives a snapshot after every state-changing operation.
//! - [`SoundSink`] receives one cue per triggering operation, fire-and-forget.
//! - [`HighScoreStore`] is defined in [`crate::store`].

use blockfall_core::GameSnapshot;
use blockfall_types::SoundEvent;

/// Session-level values shown next to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    pub high_score: u32,
    pub sound_enabled: bool,
}

/// Consumes render-ready state
pub trait Renderer {
    fn render(&mut self, snapshot: &GameSnapshot, hud: &Hud);
}

/// Consumes sound cues
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, snapshot: &GameSnapshot, hud: &Hud) {
        (**self).render(snapshot, hud)
    }
}

impl<A: SoundSink + ?Sized> SoundSink for Box<A> {
    fn play(&mut self, event: SoundEvent) {
        (**self).play(event)
    }
}

/// Default renderer: draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &GameSnapshot, _hud: &Hud) {}
}

/// Keeps the latest frame and a frame count; used by headless drivers and tests.
#[derive(Debug, Default, Clone)]
pub struct CaptureRenderer {
    frames: u64,
    last: Option<(GameSnapshot, Hud)>,
}

impl CaptureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_snapshot(&self) -> Option<&GameSnapshot> {
        self.last.as_ref().map(|(s, _)| s)
    }

    pub fn last_hud(&self) -> Option<&Hud> {
        self.last.as_ref().map(|(_, h)| h)
    }
}

impl Renderer for CaptureRenderer {
    fn render(&mut self, snapshot: &GameSnapshot, hud: &Hud) {
        self.frames += 1;
        self.last = Some((*snapshot, *hud));
    }
}

/// Default sound sink: plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct MutedSound;

impl SoundSink for MutedSound {
    fn play(&mut self, _event: SoundEvent) {}
}

/// Records every cue in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingSound {
    events: Vec<SoundEvent>,
}

impl RecordingSound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SoundEvent] {
        &self.events
    }

    pub fn count(&self, event: SoundEvent) -> usize {
        self.events.iter().filter(|&&e| e == event).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SoundSink for RecordingSound {
    fn play(&mut self, event: SoundEvent) {
        self.events.push(event);
    }
}

/// Global enabled/disabled flag in front of another sink
#[derive(Debug, Clone)]
pub struct SoundSwitch<A> {
    inner: A,
    enabled: bool,
}

impl<A: SoundSink> SoundSwitch<A> {
    pub fn new(inner: A, enabled: bool) -> Self {
        Self { inner, enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip the flag and return the new value
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }
}

impl<A: SoundSink> SoundSink for SoundSwitch<A> {
    fn play(&mut self, event: SoundEvent) {
        if self.enabled {
            self.inner.play(event);
        }
    }
}
