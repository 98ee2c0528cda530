//! Session collaborators backed by the real terminal.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::terminal;

use crate::core::GameSnapshot;
use crate::engine::{Hud, Renderer, SoundSink};
use crate::fb::FrameBuffer;
use crate::game_view::{GameView, Viewport};
use crate::renderer::TerminalRenderer;
use crate::types::SoundEvent;

/// Draws every snapshot to the terminal.
///
/// `Renderer::render` cannot fail, so a failed frame is kept in `last_error` and
/// the next frame is drawn in full.
pub struct TerminalScreen {
    view: GameView,
    term: TerminalRenderer,
    fb: FrameBuffer,
    last_error: Option<anyhow::Error>,
}

impl TerminalScreen {
    pub fn new(view: GameView) -> Self {
        Self {
            view,
            term: TerminalRenderer::new(),
            fb: FrameBuffer::new(0, 0),
            last_error: None,
        }
    }

    /// Raw mode + alternate screen
    pub fn enter(&mut self) -> Result<()> {
        self.term.enter().context("failed to enter terminal game mode")
    }

    pub fn exit(&mut self) -> Result<()> {
        self.term.exit().context("failed to restore terminal")
    }

    /// Next frame redraws everything (after a resize)
    pub fn invalidate(&mut self) {
        self.term.invalidate();
    }

    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.last_error.take()
    }

    fn draw(&mut self, snapshot: &GameSnapshot, hud: &Hud) -> Result<()> {
        let (w, h) = terminal::size().context("failed to query terminal size")?;
        self.view.render_into(snapshot, hud, Viewport::new(w, h), &mut self.fb);
        self.term.draw_swap(&mut self.fb)
    }
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new(GameView::default())
    }
}

impl Renderer for TerminalScreen {
    fn render(&mut self, snapshot: &GameSnapshot, hud: &Hud) {
        if let Err(e) = self.draw(snapshot, hud) {
            self.term.invalidate();
            self.last_error = Some(e);
        }
    }
}

/// Rings the terminal bell for sound cues.
///
/// Each tone of a cue's [`SoundEvent::tones`] table becomes one BEL, written when
/// the tone's `delay_ms` has elapsed on the bell's own clock. The front-end feeds
/// that clock through [`TerminalBell::advance`]. Move and rotate cues are frequent
/// enough that they stay silent unless enabled.
#[derive(Debug)]
pub struct TerminalBell<W: Write = io::Stdout> {
    out: W,
    ring_on_moves: bool,
    clock_ms: u64,
    /// Due times of queued bells, ascending
    pending: Vec<u64>,
    rung: u64,
}

impl TerminalBell {
    pub fn new(ring_on_moves: bool) -> Self {
        Self::with_writer(io::stdout(), ring_on_moves)
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn with_writer(out: W, ring_on_moves: bool) -> Self {
        Self {
            out,
            ring_on_moves,
            clock_ms: 0,
            pending: Vec::new(),
            rung: 0,
        }
    }

    pub fn rings_for(&self, event: SoundEvent) -> bool {
        match event {
            SoundEvent::Move | SoundEvent::Rotate => self.ring_on_moves,
            SoundEvent::Drop | SoundEvent::Clear | SoundEvent::GameOver => true,
        }
    }

    /// Bells written so far
    pub fn rung(&self) -> u64 {
        self.rung
    }

    /// Bells still waiting for their tone's delay
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Time until the next queued bell, if any
    pub fn until_next_ms(&self) -> Option<u32> {
        self.pending
            .first()
            .map(|&due| due.saturating_sub(self.clock_ms).min(u32::MAX as u64) as u32)
    }

    /// Move the bell clock forward and ring whatever fell due.
    pub fn advance(&mut self, elapsed_ms: u32) {
        self.clock_ms += elapsed_ms as u64;
        self.ring_due();
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn ring_due(&mut self) {
        let due = self.pending.partition_point(|&t| t <= self.clock_ms);
        if due == 0 {
            return;
        }
        self.pending.drain(..due);

        let bells = vec![BEL; due];
        // Fire-and-forget: a lost bell is not worth surfacing
        if self.out.write_all(&bells).and_then(|_| self.out.flush()).is_ok() {
            self.rung += due as u64;
        }
    }
}

const BEL: u8 = 0x07;

impl<W: Write> SoundSink for TerminalBell<W> {
    fn play(&mut self, event: SoundEvent) {
        if !self.rings_for(event) {
            return;
        }
        for tone in event.tones() {
            let due = self.clock_ms + tone.delay_ms as u64;
            let at = self.pending.partition_point(|&t| t <= due);
            self.pending.insert(at, due);
        }
        self.ring_due();
    }
}
