//! Locomotive and wagons.
//!
//! The locomotive collects every wagon on the board, each joining the end of
//! the train, then parks on a goal. The train cannot cross itself.

use serde::{Deserialize, Serialize};
use strata::level::parse;
use strata::{CellKind, Dialect, Dir, LevelCatalog, LevelDescriptor, LevelError, ParsedLevel};

use crate::command::{interpret_move, MoveOutcome, MoveRules};
use crate::convoy::{Convoy, ConvoyMove};
use crate::error::{ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::intent::{InputState, Intent};
use crate::session::{Phase, Session};
use crate::snapshot::{GridSnapshot, SessionSnapshot, Snapshot, WorldSnapshot};
use crate::undo::{UndoHistory, UndoRecord};

use super::{finish_level, Game, GameKind, Inbox, TileGame};

/// Railway tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailwayConfig {
    /// Frames between repeated moves
    pub move_repeat: u32,
    /// Undo entries kept, `None` for all
    pub undo_limit: Option<usize>,
}

impl Default for RailwayConfig {
    fn default() -> Self {
        Self {
            move_repeat: 9,
            undo_limit: None,
        }
    }
}

impl GameConfig for RailwayConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

type Step = (UndoRecord, ConvoyMove);

/// The convoy game.
#[derive(Debug, Clone)]
pub struct Railway {
    config: RailwayConfig,
    catalog: LevelCatalog,
    index: usize,
    start: ParsedLevel,
    level: ParsedLevel,
    convoy: Convoy,
    history: UndoHistory<Step>,
    session: Session,
    inbox: Inbox,
}

impl Railway {
    /// A game in the menu showing the first level of `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Empty`] for an empty catalog, or the parse error
    /// of its first level.
    pub fn new(config: RailwayConfig, catalog: LevelCatalog) -> Result<Self, LevelError> {
        let first = catalog.by_index(0).ok_or(LevelError::Empty)?;
        let start = parse(first, Dialect::Railway)?;
        let history = match config.undo_limit {
            Some(limit) => UndoHistory::bounded(limit),
            None => UndoHistory::unbounded(),
        };
        Ok(Self {
            inbox: Inbox::new(config.move_repeat),
            config,
            catalog,
            index: 0,
            convoy: Convoy::new(start.player, Dir::Right),
            level: start.clone(),
            start,
            history,
            session: Session::new(1, 0),
        })
    }

    /// The train.
    #[must_use]
    pub const fn convoy(&self) -> &Convoy {
        &self.convoy
    }

    /// The current level state.
    #[must_use]
    pub const fn level(&self) -> &ParsedLevel {
        &self.level
    }

    /// Wagons still waiting on the board.
    #[must_use]
    pub fn wagons_left(&self) -> usize {
        self.level.grid.count(CellKind::Collectible)
    }

    fn install(&mut self, start: ParsedLevel) {
        self.convoy = Convoy::new(start.player, Dir::Right);
        self.level = start.clone();
        self.start = start;
        self.history.clear();
        self.session.reset_counters();
        tracing::debug!(index = self.index, wagons = self.wagons_left(), "railway level");
    }

    fn install_index(&mut self, index: usize) -> Result<(), LevelError> {
        let descriptor = self.catalog.by_index(index).ok_or(LevelError::Empty)?;
        let parsed = parse(descriptor, Dialect::Railway)?;
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
                if self.undo() {
                    events.push(Event::Undone);
                }
            }
            Intent::EnterPassword(word) => match self.catalog.by_password(&word).map(|(i, _)| i) {
                Some(index) if self.install_index(index).is_ok() => {
                    let level = u32::try_from(index + 1).unwrap_or(u32::MAX);
                    self.session.jump_to_level(level);
                    events.push(Event::LevelLoaded { level });
                }
                _ => events.push(Event::PasswordRejected),
            },
            Intent::Push => {
                if self.session.is_playing() {
                    self.step(self.convoy.heading(), events);
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
            Err(err) => tracing::warn!(%err, index = next, "railway level rejected"),
        }
    }

    fn undo(&mut self) -> bool {
        if !matches!(self.session.phase(), Phase::Playing | Phase::LevelComplete) {
            return false;
        }
        let Some((entry, step)) = self.history.pop() else {
            return false;
        };
        entry.restore(&mut self.level.grid, &mut self.session);
        self.convoy.retreat(&step);
        self.level.player = self.convoy.head();
        self.session.reopen_level();
        true
    }

    fn step(&mut self, dir: Dir, events: &mut EventLog) {
        let head = self.convoy.head();
        if self.convoy.occupies(head.step(dir)) {
            return;
        }
        let outcome = interpret_move(
            &mut self.level.grid,
            &self.level.goals,
            head,
            dir,
            &MoveRules::warehouse(),
            self.session.collected(),
        );
        let MoveOutcome::Accepted(record) = outcome else {
            return;
        };

        let join = record.consumed == Some(CellKind::Collectible);
        let entry = UndoRecord::capture(record, self.convoy.heading(), &self.session);
        let step = self.convoy.advance(dir, join);
        self.level.player = self.convoy.head();
        events.push(Event::Moved {
            from: entry.record.from,
            to: entry.record.to,
        });
        self.session.record_move(false);
        if join {
            let count = self.session.record_collect();
            events.push(Event::Collected {
                at: entry.record.to,
                count,
            });
        }
        self.history.push((entry, step));

        if self.wagons_left() == 0 && self.level.goals.contains(self.convoy.head()) {
            finish_level(&mut self.session, 0.0, events);
        }
    }
}

impl Game for Railway {
    fn kind(&self) -> GameKind {
        GameKind::Railway
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
            game: GameKind::Railway,
            frame: self.inbox.frame(),
            tick: u64::from(self.session.moves()),
            session: SessionSnapshot::of(&self.session, "none", Vec::new()),
            world: WorldSnapshot::Grid(GridSnapshot {
                grid: self.level.grid.clone(),
                dialect: Dialect::Railway,
                player: Some(self.convoy.head()),
                facing: self.convoy.heading(),
                convoy: Some(self.convoy.clone()),
                threshold: None,
                undo_depth: self.history.len(),
            }),
        }
    }
}

impl TileGame for Railway {
    fn load_level(&mut self, descriptor: &LevelDescriptor) -> Result<(), LevelError> {
        let parsed = parse(descriptor, Dialect::Railway).map_err(|err| {
            tracing::warn!(%err, title = %descriptor.title, "railway level rejected");
            err
        })?;
        self.session.reopen_level();
        self.install(parsed);
        Ok(())
    }
}
