//! The six games built on the core.
//!
//! Every game owns its world (a [`WorldStore`](strata::WorldStore) grid or a
//! [`FieldSimulation`](crate::simulation::FieldSimulation)), a [`Session`]
//! and an intent queue. A driver calls [`Game::handle`] for discrete presses
//! as they arrive and [`Game::frame`] once per render callback; queued
//! intents are applied at the start of the next frame.
//!
//! | game        | world | rules                                          |
//! |-------------|-------|------------------------------------------------|
//! | [`Digger`]    | grid  | digging, gems, gravity, crush deaths          |
//! | [`Warehouse`] | grid  | crate pushing onto goals, undo, passwords     |
//! | [`Railway`]   | grid  | locomotive collecting wagons, undo, passwords |
//! | [`River`]     | field | scrolling shooter over a banked river         |
//! | [`Rally`]     | field | driving through a table of stages             |
//! | [`Heli`]      | field | helicopter taxi over rolling ground           |

mod digger;
mod heli;
mod rally;
mod railway;
mod river;
mod warehouse;

pub use digger::{Digger, DiggerConfig};
pub use heli::{Heli, HeliConfig};
pub use rally::{Rally, RallyConfig, Stage, STAGES};
pub use railway::{Railway, RailwayConfig};
pub use river::{River, RiverConfig};
pub use warehouse::{Warehouse, WarehouseConfig};

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata::{Dir, LevelCatalog, LevelDescriptor, LevelError};
use thiserror::Error;

use crate::cadence::RepeatGate;
use crate::error::{ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::intent::{InputState, Intent, IntentKind};
use crate::session::{LifeLoss, LossCause, Session};
use crate::snapshot::Snapshot;

/// Which game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Falling-sand digging
    Digger,
    /// Crate pushing
    Warehouse,
    /// Locomotive and wagons
    Railway,
    /// Scrolling river shooter
    River,
    /// Cross-country driving
    Rally,
    /// Helicopter taxi
    Heli,
}

impl GameKind {
    /// Every game.
    pub const ALL: [GameKind; 6] = [
        Self::Digger,
        Self::Warehouse,
        Self::Railway,
        Self::River,
        Self::Rally,
        Self::Heli,
    ];

    /// Lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Digger => "digger",
            Self::Warehouse => "warehouse",
            Self::Railway => "railway",
            Self::River => "river",
            Self::Rally => "rally",
            Self::Heli => "heli",
        }
    }

    /// True for the tile games.
    #[must_use]
    pub const fn is_grid(self) -> bool {
        matches!(self, Self::Digger | Self::Warehouse | Self::Railway)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A game name that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game {0:?}")]
pub struct UnknownGame(pub String);

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

/// A running game.
pub trait Game: Send {
    /// Which game this is.
    fn kind(&self) -> GameKind;

    /// Queue a discrete intent for the next frame. Never fails; intents that
    /// do not apply in the current phase are dropped when the frame runs.
    fn handle(&mut self, intent: Intent);

    /// Run one render callback with `held` keys and return what happened.
    fn frame(&mut self, held: &InputState) -> Vec<Event>;

    /// Progress so far.
    fn session(&self) -> &Session;

    /// Copy of the state after the last frame.
    fn snapshot(&self) -> Snapshot;
}

/// A game whose levels come from text descriptors.
pub trait TileGame: Game {
    /// Replace the current level. On error the previous level stays loaded.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed descriptor.
    fn load_level(&mut self, descriptor: &LevelDescriptor) -> Result<(), LevelError>;
}

/// Build a game with its default levels, or with a JSON config.
///
/// # Errors
///
/// Returns a [`ConfigError`] when `config_json` does not decode or validate,
/// or when a built-in level fails to parse.
pub fn build(kind: GameKind, seed: u64, config_json: Option<&str>) -> Result<Box<dyn Game>, ConfigError> {
    fn config<C: GameConfig>(json: Option<&str>) -> Result<C, ConfigError> {
        match json {
            Some(json) => C::from_json(json),
            None => Ok(C::default()),
        }
    }

    let game: Box<dyn Game> = match kind {
        GameKind::Digger => Box::new(Digger::new(config(config_json)?, seed)),
        GameKind::Warehouse => Box::new(Warehouse::new(config(config_json)?, LevelCatalog::builtin())?),
        GameKind::Railway => Box::new(Railway::new(config(config_json)?, LevelCatalog::builtin())?),
        GameKind::River => Box::new(River::new(config(config_json)?, seed)),
        GameKind::Rally => Box::new(Rally::new(config(config_json)?, seed)),
        GameKind::Heli => Box::new(Heli::new(config(config_json)?, seed)),
    };
    tracing::debug!(game = %kind, seed, "game built");
    Ok(game)
}

// =============================================================================
// Shared plumbing
// =============================================================================

/// Queued intents plus the repeat gate that rate-limits moves and shots.
#[derive(Debug, Clone)]
pub(crate) struct Inbox {
    queue: VecDeque<Intent>,
    gate: RepeatGate,
    frame: u64,
}

impl Inbox {
    pub(crate) fn new(repeat: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            gate: RepeatGate::new(repeat),
            frame: 0,
        }
    }

    pub(crate) fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    /// Start a frame and return the queued intents that pass the gate.
    pub(crate) fn begin_frame(&mut self) -> Vec<Intent> {
        self.frame += 1;
        let frame = self.frame;
        let gate = &mut self.gate;
        self.queue
            .drain(..)
            .filter(|intent| !is_repeatable(intent.kind()) || gate.admit(intent.kind(), frame))
            .collect()
    }

    /// The first held direction the gate lets through this frame.
    pub(crate) fn held_move(&mut self, held: &InputState) -> Option<Dir> {
        let frame = self.frame;
        let dir = held.directions().next()?;
        self.gate.admit(Intent::from_dir(dir).kind(), frame).then_some(dir)
    }

    /// Whether a held fire key may shoot this frame.
    pub(crate) fn held_shot(&mut self, held: &InputState) -> bool {
        held.shoot && self.gate.admit(IntentKind::Shoot, self.frame)
    }

    /// Frames begun so far.
    pub(crate) const fn frame(&self) -> u64 {
        self.frame
    }
}

const fn is_repeatable(kind: IntentKind) -> bool {
    matches!(
        kind,
        IntentKind::MoveUp
            | IntentKind::MoveDown
            | IntentKind::MoveLeft
            | IntentKind::MoveRight
            | IntentKind::Push
            | IntentKind::Shoot
    )
}

/// Apply the one-frame presses in `intents` on top of the held keys.
pub(crate) fn merged_input(held: &InputState, intents: &[Intent]) -> InputState {
    let mut input = *held;
    for intent in intents {
        input.press(intent);
    }
    input
}

/// Spend a life and log what it cost.
pub(crate) fn lose_life(session: &mut Session, cause: LossCause, events: &mut EventLog) -> LifeLoss {
    let loss = session.lose_life(cause);
    match loss {
        LifeLoss::Ignored => {}
        LifeLoss::Continue { lives_left } | LifeLoss::Respawning { lives_left } => {
            events.push(Event::LifeLost { cause, lives_left });
        }
        LifeLoss::GameOver => {
            events.push(Event::LifeLost { cause, lives_left: 0 });
            events.push(Event::GameOver);
        }
    }
    loss
}

/// Finish the level with `bonus` and log it. False if not playing.
pub(crate) fn finish_level(session: &mut Session, bonus: f64, events: &mut EventLog) -> bool {
    if !session.complete_level(bonus) {
        return false;
    }
    events.push(Event::LevelComplete {
        level: session.level(),
        bonus,
    });
    true
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Queue `intent` and run enough frames for the repeat gate to reopen.
    pub(crate) fn act(game: &mut dyn Game, intent: Intent) -> Vec<Event> {
        game.handle(intent);
        run(game, 9)
    }

    /// Run `frames` idle frames.
    pub(crate) fn run(game: &mut dyn Game, frames: usize) -> Vec<Event> {
        (0..frames).flat_map(|_| game.frame(&InputState::IDLE)).collect()
    }
}
