//! Grid command interpreter.
//!
//! [`interpret_move`] applies one orthogonal step of the player marker to a
//! settled grid. Every write is recorded with the kind it replaced, so the
//! resulting [`MoveRecord`] doubles as the undo entry for the move.
//!
//! | target                | effect                                           |
//! |-----------------------|--------------------------------------------------|
//! | empty / goal          | player relocates                                 |
//! | diggable              | dug away, player relocates                       |
//! | collectible           | collected, player relocates, exit may open       |
//! | pushable              | pushed one cell if the cell beyond is free       |
//! | open exit             | player relocates onto it, level ends             |
//! | anything else         | rejected, nothing changes                        |

use serde::{Deserialize, Serialize};
use strata::{CellKind, CellSet, Dir, Grid, Pos};

/// Scoring and pushing rules for one grid game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRules {
    /// Score for digging one cell
    pub dig_value: f64,
    /// Score for one collectible
    pub collect_value: f64,
    /// Whether pushes along the vertical axis are allowed
    pub vertical_push: bool,
    /// Collected count that opens every closed exit
    pub exit_threshold: Option<u32>,
}

impl MoveRules {
    /// Digging rules: horizontal pushes only, gems open the exit.
    #[must_use]
    pub const fn mine(dig_value: f64, collect_value: f64, exit_threshold: u32) -> Self {
        Self {
            dig_value,
            collect_value,
            vertical_push: false,
            exit_threshold: Some(exit_threshold),
        }
    }

    /// Crate rules: pushes on both axes, no scoring.
    #[must_use]
    pub const fn warehouse() -> Self {
        Self {
            dig_value: 0.0,
            collect_value: 0.0,
            vertical_push: true,
            exit_threshold: None,
        }
    }
}

/// One cell write and the kind it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    /// Cell written
    pub pos: Pos,
    /// Kind before the write
    pub before: CellKind,
}

/// Everything an accepted move did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Player cell before the move
    pub from: Pos,
    /// Player cell after the move
    pub to: Pos,
    /// Direction moved
    pub dir: Dir,
    /// Dirt or collectible taken from the target cell
    pub consumed: Option<CellKind>,
    /// Pushed block's cells, before and after
    pub pushed: Option<(Pos, Pos)>,
    /// Exit cells that opened because of this move
    pub exit_opened: Vec<Pos>,
    /// The player stepped onto an open exit
    pub reached_exit: bool,
    /// Score earned
    pub score: f64,
    /// Writes in application order
    pub changes: Vec<CellChange>,
}

impl MoveRecord {
    /// Revert the move's writes on `grid`, newest first.
    pub fn revert(&self, grid: &mut Grid) {
        for change in self.changes.iter().rev() {
            grid.set(change.pos, change.before);
        }
    }
}

/// Result of [`interpret_move`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Blocked; the grid is unchanged.
    Rejected,
    /// Applied.
    Accepted(MoveRecord),
}

impl MoveOutcome {
    /// The record of an accepted move.
    #[must_use]
    pub fn record(&self) -> Option<&MoveRecord> {
        match self {
            Self::Rejected => None,
            Self::Accepted(record) => Some(record),
        }
    }
}

struct Writer<'a> {
    grid: &'a mut Grid,
    changes: Vec<CellChange>,
}

impl Writer<'_> {
    fn write(&mut self, pos: Pos, kind: CellKind) {
        let before = self.grid.get(pos);
        if self.grid.set(pos, kind) {
            self.changes.push(CellChange { pos, before });
        }
    }
}

/// Kind left behind when something leaves `pos`.
fn underlay(goals: &CellSet, pos: Pos) -> CellKind {
    if goals.contains(pos) {
        CellKind::Goal
    } else {
        CellKind::Empty
    }
}

/// Step the player at `player` one cell in `dir`.
///
/// `collected` is the count before this move; the exit threshold is checked
/// against the count after it. `goals` marks goal squares so crates and the
/// player restore them when they leave.
pub fn interpret_move(
    grid: &mut Grid,
    goals: &CellSet,
    player: Pos,
    dir: Dir,
    rules: &MoveRules,
    collected: u32,
) -> MoveOutcome {
    let target = player.step(dir);
    if !grid.is_interior(player) || !grid.is_interior(target) {
        return MoveOutcome::Rejected;
    }
    let kind = grid.get(target);

    let mut consumed = None;
    let mut pushed = None;
    let mut reached_exit = false;
    let mut score = 0.0;

    match kind {
        CellKind::Empty | CellKind::Goal => {}
        CellKind::Dirt => {
            consumed = Some(kind);
            score = rules.dig_value;
        }
        CellKind::Collectible => {
            consumed = Some(kind);
            score = rules.collect_value;
        }
        CellKind::ExitOpen => reached_exit = true,
        CellKind::Rock | CellKind::Box | CellKind::BoxOnGoal => {
            if !dir.is_horizontal() && !rules.vertical_push {
                return MoveOutcome::Rejected;
            }
            let beyond = target.step(dir);
            let free = match grid.get(beyond) {
                CellKind::Empty => true,
                CellKind::Goal => kind.is_box(),
                _ => false,
            };
            if !free || !grid.is_interior(beyond) {
                return MoveOutcome::Rejected;
            }
            pushed = Some((target, beyond));
        }
        CellKind::Wall | CellKind::PlayerMarker | CellKind::ExitClosed => {
            return MoveOutcome::Rejected;
        }
    }

    let mut writer = Writer {
        grid,
        changes: Vec::with_capacity(3),
    };
    if let Some((block, beyond)) = pushed {
        let moved = match kind {
            CellKind::Box | CellKind::BoxOnGoal if goals.contains(beyond) => CellKind::BoxOnGoal,
            CellKind::Box | CellKind::BoxOnGoal => CellKind::Box,
            other => other,
        };
        writer.write(beyond, moved);
        writer.write(block, underlay(goals, block));
    }
    writer.write(player, underlay(goals, player));
    writer.write(target, CellKind::PlayerMarker);

    let mut exit_opened = Vec::new();
    if consumed == Some(CellKind::Collectible) {
        if let Some(threshold) = rules.exit_threshold {
            if collected + 1 >= threshold {
                exit_opened = writer.grid.positions_of(CellKind::ExitClosed);
                for pos in &exit_opened {
                    writer.write(*pos, CellKind::ExitOpen);
                }
            }
        }
    }

    tracing::debug!(?dir, from = ?player, to = ?target, ?consumed, pushed = pushed.is_some(), "move");
    MoveOutcome::Accepted(MoveRecord {
        from: player,
        to: target,
        dir,
        consumed,
        pushed,
        exit_opened,
        reached_exit,
        score,
        changes: writer.changes,
    })
}
