//! Terminal runner (default binary).
//!
//! Reads [`RunConfig`] from the environment, wires a [`Session`] to the terminal and
//! feeds it key presses and elapsed time until the player quits.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use blockfall::core::{GameEngine, RandomPieces};
use blockfall::engine::{FileHighScore, Session};
use blockfall::input::{map_key, Control};
use blockfall::term::{TerminalBell, TerminalScreen};
use blockfall::RunConfig;

type TermSession = Session<RandomPieces, TerminalScreen, TerminalBell, FileHighScore>;

/// Poll timeout while no gravity tick is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let config = RunConfig::from_env();

    let pieces = match config.seed {
        Some(seed) => RandomPieces::new(seed),
        None => RandomPieces::from_entropy(),
    };
    let engine = GameEngine::with_difficulty(pieces, config.difficulty);
    let store = FileHighScore::new(&config.high_score_path);

    let mut session: TermSession = Session::new(
        engine,
        TerminalScreen::default(),
        TerminalBell::default(),
        store,
    );
    session.set_sound_enabled(config.sound_enabled);

    session.renderer_mut().enter()?;
    let result = run(&mut session);

    // Always try to restore terminal state.
    let restored = session.renderer_mut().exit();

    if let Some(e) = session.renderer_mut().take_error() {
        eprintln!("[Blockfall] drawing failed: {:#}", e);
    }
    if let Some(e) = session.store().last_error() {
        eprintln!("[HighScore] {}", e);
    }
    println!(
        "[Blockfall] score {} / high score {} (seed {}, {})",
        session.engine().state().score(),
        session.high_score(),
        session.engine().pieces().seed(),
        session.engine().difficulty().as_str(),
    );

    result.and(restored)
}

fn run(session: &mut TermSession) -> Result<()> {
    session.render();
    let mut last = Instant::now();

    loop {
        // Gravity first so time spent idle before a start is never replayed
        let elapsed = last.elapsed().as_millis().min(u32::MAX as u128) as u32;
        last += Duration::from_millis(elapsed as u64);
        session.advance(elapsed);
        session.sound_mut().inner_mut().advance(elapsed);

        // Wake for whichever comes first: a gravity tick or a queued bell
        let next_ms = match (
            session.timer().until_next_ms(),
            session.sound().inner().until_next_ms(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let timeout = next_ms
            .map(|ms| Duration::from_millis(ms as u64))
            .unwrap_or(IDLE_POLL);

        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => match map_key(key) {
                Some(Control::Quit) => return Ok(()),
                Some(Control::Restart) => {
                    session.restart();
                }
                Some(Control::ToggleSound) => {
                    session.toggle_sound();
                }
                Some(Control::Command(command)) => {
                    session.dispatch(command);
                }
                None => {}
            },
            Event::Resize(_, _) => {
                session.renderer_mut().invalidate();
                session.render();
            }
            _ => {}
        }
    }
}
