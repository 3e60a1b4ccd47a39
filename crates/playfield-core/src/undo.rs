//! Bounded undo history for the puzzle games.
//!
//! Entries are pushed only for accepted moves. Each entry holds the move's
//! cell writes plus the counters and score before it, so undo cost follows
//! the size of the change rather than the size of the grid.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strata::{Dir, Grid};

use crate::command::MoveRecord;
use crate::session::Session;

/// Result of an undo request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoOutcome {
    /// The last move was reverted.
    Restored,
    /// Nothing to undo.
    Empty,
}

/// Pre-move state of one accepted grid move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoRecord {
    /// The move and its cell writes
    pub record: MoveRecord,
    /// Facing before the move
    pub facing: Dir,
    /// Moves counter before the move
    pub moves: u32,
    /// Pushes counter before the move
    pub pushes: u32,
    /// Collected counter before the move
    pub collected: u32,
    /// Score before the move
    pub score: f64,
}

impl UndoRecord {
    /// Capture the session counters alongside an accepted move. Call before
    /// the move's effects are applied to the session.
    #[must_use]
    pub fn capture(record: MoveRecord, facing: Dir, session: &Session) -> Self {
        Self {
            record,
            facing,
            moves: session.moves(),
            pushes: session.pushes(),
            collected: session.collected(),
            score: session.score(),
        }
    }

    /// Put the grid and session back as they were before the move.
    pub fn restore(&self, grid: &mut Grid, session: &mut Session) {
        self.record.revert(grid);
        session.restore_counters(self.moves, self.pushes, self.collected);
        session.restore_score(self.score);
    }
}

/// Stack of undo entries, oldest dropped first once `limit` is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoHistory<T> {
    entries: VecDeque<T>,
    limit: Option<usize>,
}

impl<T> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> UndoHistory<T> {
    /// History without a size limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            limit: None,
        }
    }

    /// History keeping at most `limit` entries. Zero keeps none.
    #[must_use]
    pub fn bounded(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(256)),
            limit: Some(limit),
        }
    }

    /// Record an entry.
    pub fn push(&mut self, entry: T) {
        if self.limit == Some(0) {
            return;
        }
        self.entries.push_back(entry);
        if let Some(limit) = self.limit {
            while self.entries.len() > limit {
                self.entries.pop_front();
            }
        }
    }

    /// Take the newest entry.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    /// Newest entry without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Forget everything (level load).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there is nothing to undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Size limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }
}
