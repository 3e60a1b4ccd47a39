//! Crate pushing.
//!
//! The keeper pushes crates one cell at a time, on either axis, onto goal
//! squares. A level is done when no crate is off a goal. Every accepted move
//! can be undone, including the one that finished the level.

use serde::{Deserialize, Serialize};
use strata::level::parse;
use strata::{CellKind, Dialect, Dir, LevelCatalog, LevelDescriptor, LevelError, ParsedLevel};

use crate::command::{interpret_move, MoveOutcome, MoveRules};
use crate::error::{ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::intent::{InputState, Intent};
use crate::session::{Phase, Session};
use crate::snapshot::{GridSnapshot, SessionSnapshot, Snapshot, WorldSnapshot};
use crate::undo::{UndoHistory, UndoOutcome, UndoRecord};

use super::{finish_level, Game, GameKind, Inbox, TileGame};

/// Warehouse tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Frames between repeated moves
    pub move_repeat: u32,
    /// Undo entries kept, `None` for all
    pub undo_limit: Option<usize>,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            move_repeat: 9,
            undo_limit: None,
        }
    }
}

impl GameConfig for WarehouseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// The crate-pushing game.
#[derive(Debug, Clone)]
pub struct Warehouse {
    config: WarehouseConfig,
    catalog: LevelCatalog,
    index: usize,
    start: ParsedLevel,
    level: ParsedLevel,
    facing: Dir,
    history: UndoHistory<UndoRecord>,
    session: Session,
    inbox: Inbox,
}

impl Warehouse {
    /// A game in the menu showing the first level of `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Empty`] for an empty catalog, or the parse error
    /// of its first level.
    pub fn new(config: WarehouseConfig, catalog: LevelCatalog) -> Result<Self, LevelError> {
        let first = catalog.by_index(0).ok_or(LevelError::Empty)?;
        let start = parse(first, Dialect::Warehouse)?;
        let history = match config.undo_limit {
            Some(limit) => UndoHistory::bounded(limit),
            None => UndoHistory::unbounded(),
        };
        Ok(Self {
            inbox: Inbox::new(config.move_repeat),
            config,
            catalog,
            index: 0,
            level: start.clone(),
            start,
            facing: Dir::Down,
            history,
            session: Session::new(1, 0),
        })
    }

    /// The current level state.
    #[must_use]
    pub const fn level(&self) -> &ParsedLevel {
        &self.level
    }

    /// Crates not yet on a goal.
    #[must_use]
    pub fn crates_left(&self) -> usize {
        self.level.grid.count(CellKind::Box)
    }

    /// Zero-based catalog index of the current level.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    fn install(&mut self, start: ParsedLevel) {
        self.level = start.clone();
        self.start = start;
        self.facing = Dir::Down;
        self.history.clear();
        self.session.reset_counters();
        tracing::debug!(index = self.index, crates = self.crates_left(), "warehouse level");
    }

    fn install_index(&mut self, index: usize) -> Result<(), LevelError> {
        let descriptor = self.catalog.by_index(index).ok_or(LevelError::Empty)?;
        let parsed = parse(descriptor, Dialect::Warehouse)?;
        self.index = index;
        self.install(parsed);
        Ok(())
    }

    fn apply(&mut self, intent: Intent, events: &mut EventLog) {
        match intent {
            Intent::ConfirmContinue => self.confirm(events),
            Intent::Restart => {
                if matches!(self.session.phase(), Phase::Playing | Phase::LevelComplete) {
                    self.session.reopen_level();
                    self.install(self.start.clone());
                    events.push(Event::Restarted);
                }
            }
            Intent::Undo => {
                if self.undo() == UndoOutcome::Restored {
                    events.push(Event::Undone);
                }
            }
            Intent::EnterPassword(word) => self.enter_password(&word, events),
            Intent::Push => {
                if self.session.is_playing() {
                    self.step(self.facing, events);
                }
            }
            other => {
                if let (Some(dir), true) = (other.direction(), self.session.is_playing()) {
                    self.step(dir, events);
                }
            }
        }
    }

    fn confirm(&mut self, events: &mut EventLog) {
        let next = match self.session.phase() {
            Phase::Menu | Phase::GameOver | Phase::Victory => {
                self.session.start();
                0
            }
            Phase::LevelComplete => {
                let has_next = self.index + 1 < self.catalog.len();
                if self.session.confirm_continue(has_next).is_none() {
                    events.push(Event::Victory);
                    return;
                }
                self.index + 1
            }
            Phase::Playing | Phase::Respawning { .. } => return,
        };
        match self.install_index(next) {
            Ok(()) => events.push(Event::LevelLoaded {
                level: self.session.level(),
            }),
            Err(err) => tracing::warn!(%err, index = next, "warehouse level rejected"),
        }
    }

    fn enter_password(&mut self, word: &str, events: &mut EventLog) {
        let Some((index, _)) = self.catalog.by_password(word) else {
            events.push(Event::PasswordRejected);
            return;
        };
        if let Err(err) = self.install_index(index) {
            tracing::warn!(%err, index, "warehouse level rejected");
            events.push(Event::PasswordRejected);
            return;
        }
        let level = u32::try_from(index + 1).unwrap_or(u32::MAX);
        self.session.jump_to_level(level);
        events.push(Event::LevelLoaded { level });
    }

    fn undo(&mut self) -> UndoOutcome {
        if !matches!(self.session.phase(), Phase::Playing | Phase::LevelComplete) {
            return UndoOutcome::Empty;
        }
        let Some(entry) = self.history.pop() else {
            return UndoOutcome::Empty;
        };
        entry.restore(&mut self.level.grid, &mut self.session);
        self.level.player = entry.record.from;
        self.facing = entry.facing;
        self.session.reopen_level();
        UndoOutcome::Restored
    }

    fn step(&mut self, dir: Dir, events: &mut EventLog) {
        let facing = self.facing;
        let player = self.level.player;
        let outcome = interpret_move(
            &mut self.level.grid,
            &self.level.goals,
            player,
            dir,
            &MoveRules::warehouse(),
            0,
        );
        let MoveOutcome::Accepted(record) = outcome else {
            return;
        };

        self.level.player = record.to;
        self.facing = dir;
        events.push(Event::Moved {
            from: record.from,
            to: record.to,
        });
        if let Some((from, to)) = record.pushed {
            events.push(Event::Pushed { from, to });
        }
        let pushed = record.pushed.is_some();
        self.history.push(UndoRecord::capture(record, facing, &self.session));
        self.session.record_move(pushed);

        if pushed && self.crates_left() == 0 {
            finish_level(&mut self.session, 0.0, events);
        }
    }
}

impl Game for Warehouse {
    fn kind(&self) -> GameKind {
        GameKind::Warehouse
    }

    fn handle(&mut self, intent: Intent) {
        self.inbox.push(intent);
    }

    fn frame(&mut self, held: &InputState) -> Vec<Event> {
        let mut events = EventLog::new();
        for intent in self.inbox.begin_frame() {
            self.apply(intent, &mut events);
        }
        if self.session.is_playing() {
            if let Some(dir) = self.inbox.held_move(held) {
                self.step(dir, &mut events);
            }
        }
        events.drain()
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: GameKind::Warehouse,
            frame: self.inbox.frame(),
            tick: u64::from(self.session.moves()),
            session: SessionSnapshot::of(&self.session, "none", Vec::new()),
            world: WorldSnapshot::Grid(GridSnapshot {
                grid: self.level.grid.clone(),
                dialect: Dialect::Warehouse,
                player: Some(self.level.player),
                facing: self.facing,
                convoy: None,
                threshold: None,
                undo_depth: self.history.len(),
            }),
        }
    }
}

impl TileGame for Warehouse {
    fn load_level(&mut self, descriptor: &LevelDescriptor) -> Result<(), LevelError> {
        let parsed = parse(descriptor, Dialect::Warehouse).map_err(|err| {
            tracing::warn!(%err, title = %descriptor.title, "warehouse level rejected");
            err
        })?;
        self.session.reopen_level();
        self.install(parsed);
        Ok(())
    }
}
