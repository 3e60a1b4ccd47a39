//! Test setup and scripted input.

use crate::event::Event;
use crate::games::{build, Game, GameKind};
use crate::intent::{InputState, Intent};
use crate::snapshot::hash_snapshot;

// =============================================================================
// Setup
// =============================================================================

/// Builds `kind` with stock tuning and confirms past the menu.
///
/// # Panics
///
/// If the stock config fails to build.
pub fn started(kind: GameKind, seed: u64) -> Box<dyn Game> {
    let mut game = build(kind, seed, None).expect("stock config builds");
    game.handle(Intent::ConfirmContinue);
    game.frame(&InputState::IDLE);
    game
}

/// Builds `kind` from a JSON config and confirms past the menu.
///
/// # Panics
///
/// If the config fails to build.
pub fn started_with(kind: GameKind, seed: u64, json: &str) -> Box<dyn Game> {
    let mut game = build(kind, seed, Some(json)).expect("config builds");
    game.handle(Intent::ConfirmContinue);
    game.frame(&InputState::IDLE);
    game
}

// =============================================================================
// Scripted input
// =============================================================================

/// Held keys for frame `i` of a fixed, busy script: steering sweeps left and
/// right, the throttle and fire keys pulse.
pub fn scripted(i: u64) -> InputState {
    InputState {
        up: i % 7 < 3,
        down: i % 11 == 0,
        left: (i / 40) % 2 == 0,
        right: (i / 40) % 2 == 1,
        shoot: i % 5 == 0,
        accelerate: i % 3 != 0,
        brake: i % 17 == 0,
    }
}

/// Discrete presses for frame `i`, if any.
pub fn scripted_press(i: u64) -> Option<Intent> {
    match i % 23 {
        0 => Some(Intent::MoveRight),
        6 => Some(Intent::MoveDown),
        12 => Some(Intent::MoveLeft),
        18 => Some(Intent::MoveUp),
        20 if i % 69 == 20 => Some(Intent::Undo),
        _ => None,
    }
}

/// Runs `frames` frames of the script and returns every event.
pub fn drive(game: &mut dyn Game, frames: u64) -> Vec<Event> {
    let mut events = Vec::new();
    for i in 0..frames {
        if let Some(intent) = scripted_press(i) {
            game.handle(intent);
        }
        events.extend(game.frame(&scripted(i)));
    }
    events
}

/// Digest of `kind` after `frames` scripted frames from `seed`.
pub fn digest_after(kind: GameKind, seed: u64, frames: u64) -> u64 {
    let mut game = started(kind, seed);
    drive(game.as_mut(), frames);
    hash_snapshot(&game.snapshot())
}
