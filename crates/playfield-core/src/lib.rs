//! # Playfield Core
//!
//! Deterministic simulation core for six small arcade and puzzle games.
//!
//! Two kinds of world share one session, intent and event model:
//!
//! - **Tile worlds**: a [`strata`] grid stepped by move interpretation
//!   ([`command`]), falling-object rules ([`gravity`]) and undo
//!   ([`undo`]), for the digger, warehouse and railway games
//! - **Field worlds**: an [`EntityRegistry`] of bodies stepped by a
//!   [`FieldSimulation`] pipeline of [`Resolver`]s, for the river, rally and
//!   heli games
//!
//! Every game is driven the same way: queue discrete presses with
//! [`Game::handle`], call [`Game::frame`] once per render callback with the
//! held keys, and read back [`Event`]s and a [`Snapshot`]. Given a seed and
//! the same inputs, frames replay bit for bit.
//!
//! ## Usage
//!
//! ```
//! use playfield_core::{build, GameKind, InputState, Intent};
//!
//! let mut game = build(GameKind::Warehouse, 7, None).unwrap();
//! game.handle(Intent::ConfirmContinue);
//! let events = game.frame(&InputState::IDLE);
//! assert!(!events.is_empty());
//! assert!(game.session().is_playing());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export strata for grid access
pub use strata;

pub mod cadence;
pub mod command;
pub mod convoy;
pub mod course;
pub mod entity;
pub mod error;
pub mod event;
pub mod games;
pub mod gauge;
pub mod gravity;
pub mod intent;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod simulation;
pub mod snapshot;
pub mod undo;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use cadence::{FrameCadence, RepeatGate};
pub use command::{interpret_move, MoveOutcome, MoveRecord, MoveRules};
pub use convoy::Convoy;
pub use course::{Course, Environment, HeliTerrain, Lane, RiverCourse, RoadCourse};
pub use entity::{Body, Entity, EntityId, EntityInner, EntityTag};
pub use error::{ConfigError, GameConfig};
pub use event::{Event, EventLog};
pub use games::{build, Game, GameKind, TileGame, UnknownGame};
pub use gauge::{Drain, ResourceGauge};
pub use gravity::{GravityReport, GravityRule};
pub use intent::{InputState, Intent, IntentKind};
pub use registry::EntityRegistry;
pub use resolver::{FrameContext, Resolver};
pub use session::{LifeLoss, LossCause, Phase, Session};
pub use simulation::FieldSimulation;
pub use snapshot::{hash_snapshot, Snapshot, WorldSnapshot};
pub use undo::{UndoHistory, UndoOutcome, UndoRecord};

/// Fixed timestep, seconds per frame.
pub const FIXED_DT: f32 = 1.0 / 60.0;
