//! Falling-sand digging.
//!
//! The player digs through dirt and collects gems while rocks and gems fall
//! and roll on a fixed cadence. Collecting enough gems opens the exit;
//! walking into it finishes the level. A falling object that lands on the
//! player costs a life and regenerates the level after a delay.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strata::level::parse;
use strata::{CellKind, CellSet, Dialect, Dir, Grid, LevelDescriptor, LevelError, Pos, WorldStore};

use crate::cadence::FrameCadence;
use crate::command::{interpret_move, MoveOutcome, MoveRules};
use crate::error::{ensure_nonzero, ensure_positive, ensure_range, ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::gravity::GravityRule;
use crate::intent::{InputState, Intent};
use crate::session::{LossCause, Phase, PhaseSignal, Session};
use crate::snapshot::{GridSnapshot, SessionSnapshot, Snapshot, WorldSnapshot};

use super::{finish_level, lose_life, Game, GameKind, Inbox, TileGame};

const PLAYER_START: Pos = Pos::new(2, 2);

/// Digger tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiggerConfig {
    /// Generated grid width, border included
    pub width: u32,
    /// Generated grid height, border included
    pub height: u32,
    /// Lives per run
    pub lives: u32,
    /// Score per dug cell
    pub dig_value: f64,
    /// Score per gem
    pub collect_value: f64,
    /// Base term of the gem threshold `base + step * level`
    pub base_threshold: u32,
    /// Extra gems needed per level
    pub threshold_step: u32,
    /// Bonus per gem beyond the threshold
    pub surplus_bonus: f64,
    /// Bonus per level number on completion
    pub level_bonus: f64,
    /// Frames between gravity ticks
    pub gravity_every: u32,
    /// Frames between repeated moves
    pub move_repeat: u32,
    /// Frames between a crush and the regenerated level
    pub respawn_delay: u32,
    /// Fill draw below which a cell is dirt
    pub dirt_below: f64,
    /// Fill draw below which a cell is rock
    pub rock_below: f64,
    /// Fill draw below which a cell is a gem
    pub gem_below: f64,
    /// Roll tie-break
    pub gravity: GravityRule,
}

impl Default for DiggerConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            lives: 3,
            dig_value: 1.0,
            collect_value: 10.0,
            base_threshold: 10,
            threshold_step: 2,
            surplus_bonus: 5.0,
            level_bonus: 50.0,
            gravity_every: 6,
            move_repeat: 9,
            respawn_delay: 60,
            dirt_below: 0.6,
            rock_below: 0.75,
            gem_below: 0.85,
            gravity: GravityRule::default(),
        }
    }
}

impl GameConfig for DiggerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("width", f64::from(self.width), 8.0, 256.0)?;
        ensure_range("height", f64::from(self.height), 8.0, 256.0)?;
        ensure_nonzero("lives", self.lives)?;
        ensure_nonzero("gravity_every", self.gravity_every)?;
        ensure_positive("collect_value", self.collect_value)?;
        ensure_range("dirt_below", self.dirt_below, 0.0, self.rock_below)?;
        ensure_range("rock_below", self.rock_below, self.dirt_below, self.gem_below)?;
        ensure_range("gem_below", self.gem_below, self.rock_below, 1.0)?;
        self.gravity.validate()
    }
}

impl DiggerConfig {
    /// Gems needed to open the exit on `level`.
    #[must_use]
    pub const fn threshold(&self, level: u32) -> u32 {
        self.base_threshold + self.threshold_step * level
    }
}

/// The digging game.
#[derive(Debug, Clone)]
pub struct Digger {
    config: DiggerConfig,
    store: WorldStore,
    goals: CellSet,
    player: Option<Pos>,
    facing: Dir,
    threshold: u32,
    custom: Option<(Grid, Pos)>,
    level_start_score: f64,
    session: Session,
    inbox: Inbox,
    cadence: FrameCadence,
}

impl Digger {
    /// A game in the menu with a generated first level.
    #[must_use]
    pub fn new(config: DiggerConfig, seed: u64) -> Self {
        let grid = Grid::bordered(config.width, config.height);
        let goals = CellSet::new(config.width, config.height);
        let mut game = Self {
            store: WorldStore::from_grid(grid, seed),
            goals,
            player: None,
            facing: Dir::Right,
            threshold: config.threshold(1),
            custom: None,
            level_start_score: 0.0,
            session: Session::new(config.lives, config.respawn_delay),
            inbox: Inbox::new(config.move_repeat),
            cadence: FrameCadence::new(config.gravity_every),
            config,
        };
        game.install_level();
        game
    }

    /// The settled grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.store.grid()
    }

    /// Player cell, `None` while crushed.
    #[must_use]
    pub const fn player(&self) -> Option<Pos> {
        self.player
    }

    /// Gems needed on this level.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    fn generate(&mut self) -> Grid {
        let (width, height) = (self.config.width, self.config.height);
        let mut grid = Grid::bordered(width, height);
        let rng = self.store.rng_mut();
        let interior: Vec<Pos> = grid.positions().filter(|p| grid.is_interior(*p)).collect();
        for pos in interior {
            let draw: f64 = rng.gen();
            let kind = if draw < self.config.dirt_below {
                CellKind::Dirt
            } else if draw < self.config.rock_below {
                CellKind::Rock
            } else if draw < self.config.gem_below {
                CellKind::Collectible
            } else {
                CellKind::Empty
            };
            grid.set(pos, kind);
        }

        clear_area(&mut grid, PLAYER_START, 2);
        grid.set(PLAYER_START, CellKind::PlayerMarker);
        // Sides fit in i32; validate caps them at 256.
        #[allow(clippy::cast_possible_wrap)]
        let exit = Pos::new(width as i32 - 3, height as i32 - 3);
        clear_area(&mut grid, exit, 1);
        grid.set(exit, CellKind::ExitClosed);
        grid
    }

    /// Build the current level from the loaded descriptor or the generator.
    fn install_level(&mut self) {
        let level = self.session.level();
        let (grid, player) = match &self.custom {
            Some((grid, player)) => (grid.clone(), *player),
            None => (self.generate(), PLAYER_START),
        };
        self.threshold = self.config.threshold(level);
        if self.custom.is_some() {
            let gems = u32::try_from(grid.count(CellKind::Collectible)).unwrap_or(u32::MAX);
            self.threshold = self.threshold.min(gems);
        }
        self.goals = CellSet::new(grid.width(), grid.height());
        self.store.load(grid);
        if self.threshold == 0 {
            self.store.grid_mut().replace_all(CellKind::ExitClosed, CellKind::ExitOpen);
        }
        self.player = Some(player);
        self.facing = Dir::Right;
        self.cadence.reset();
        self.session.reset_counters();
        self.level_start_score = self.session.score();
        tracing::debug!(level, threshold = self.threshold, custom = self.custom.is_some(), "digger level");
    }

    fn apply(&mut self, intent: Intent, events: &mut EventLog) {
        match intent {
            Intent::ConfirmContinue => self.confirm(events),
            Intent::Restart => self.restart(events),
            Intent::Push => {
                if self.session.is_playing() {
                    self.step_player(self.facing, events);
                }
            }
            other => {
                if let (Some(dir), true) = (other.direction(), self.session.is_playing()) {
                    self.step_player(dir, events);
                }
            }
        }
    }

    fn confirm(&mut self, events: &mut EventLog) {
        match self.session.phase() {
            Phase::Menu | Phase::GameOver | Phase::Victory => self.session.start(),
            Phase::LevelComplete => {
                if self.session.confirm_continue(true).is_none() {
                    return;
                }
                self.custom = None;
            }
            Phase::Playing | Phase::Respawning { .. } => return,
        }
        self.install_level();
        events.push(Event::LevelLoaded {
            level: self.session.level(),
        });
    }

    fn restart(&mut self, events: &mut EventLog) {
        if matches!(self.session.phase(), Phase::Menu) || self.session.phase().is_terminal() {
            return;
        }
        self.session.cancel_pending();
        self.session.reopen_level();
        let score = self.level_start_score;
        self.install_level();
        self.session.restore_score(score);
        self.level_start_score = score;
        events.push(Event::Restarted);
    }

    fn step_player(&mut self, dir: Dir, events: &mut EventLog) {
        let Some(player) = self.player else {
            return;
        };
        let rules = MoveRules::mine(self.config.dig_value, self.config.collect_value, self.threshold);
        let outcome = interpret_move(
            self.store.grid_mut(),
            &self.goals,
            player,
            dir,
            &rules,
            self.session.collected(),
        );
        let MoveOutcome::Accepted(record) = outcome else {
            return;
        };

        self.player = Some(record.to);
        self.facing = dir;
        events.push(Event::Moved {
            from: record.from,
            to: record.to,
        });
        if let Some((from, to)) = record.pushed {
            self.store.clear_falling(from);
            events.push(Event::Pushed { from, to });
        }
        self.session.record_move(record.pushed.is_some());
        self.session.add_score(record.score);
        match record.consumed {
            Some(CellKind::Dirt) => events.push(Event::Dug { at: record.to }),
            Some(CellKind::Collectible) => {
                let count = self.session.record_collect();
                events.push(Event::Collected { at: record.to, count });
            }
            _ => {}
        }
        if !record.exit_opened.is_empty() {
            events.push(Event::ExitOpened {
                cells: record.exit_opened.len(),
            });
        }
        if record.reached_exit {
            let surplus = self.session.collected().saturating_sub(self.threshold);
            let bonus = self.config.surplus_bonus * f64::from(surplus)
                + self.config.level_bonus * f64::from(self.session.level());
            finish_level(&mut self.session, bonus, events);
        }
    }

    fn settle(&mut self, events: &mut EventLog) {
        let report = self.config.gravity.apply(&mut self.store);
        let Some(at) = report.crushed else {
            return;
        };
        self.store.set(at, CellKind::Empty);
        self.player = None;
        events.push(Event::Crushed { at });
        lose_life(&mut self.session, LossCause::Crushed, events);
    }
}

fn clear_area(grid: &mut Grid, centre: Pos, radius: i32) {
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            grid.set(centre.offset(dx, dy), CellKind::Empty);
        }
    }
}

impl Game for Digger {
    fn kind(&self) -> GameKind {
        GameKind::Digger
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
                self.step_player(dir, &mut events);
            }
        }
        if self.session.is_playing() && self.player.is_some() && self.cadence.tick() {
            self.settle(&mut events);
        }
        if let Some(PhaseSignal::Respawn) = self.session.tick_phase() {
            self.install_level();
            events.push(Event::Respawned);
        }
        events.drain()
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            game: GameKind::Digger,
            frame: self.inbox.frame(),
            tick: self.store.tick(),
            session: SessionSnapshot::of(&self.session, "none", Vec::new()),
            world: WorldSnapshot::Grid(GridSnapshot {
                grid: self.store.grid().clone(),
                dialect: Dialect::Mine,
                player: self.player,
                facing: self.facing,
                convoy: None,
                threshold: Some(self.threshold),
                undo_depth: 0,
            }),
        }
    }
}

impl TileGame for Digger {
    fn load_level(&mut self, descriptor: &LevelDescriptor) -> Result<(), LevelError> {
        let parsed = parse(descriptor, Dialect::Mine).map_err(|err| {
            tracing::warn!(%err, title = %descriptor.title, "mine level rejected");
            err
        })?;
        self.custom = Some((parsed.grid, parsed.player));
        self.session.cancel_pending();
        self.session.reopen_level();
        self.install_level();
        Ok(())
    }
}
