//! A locomotive and the wagons trailing behind it.
//!
//! Each accepted move shifts the cars tail-first: every car takes the cell
//! the car ahead of it held before the move, the first car takes the
//! locomotive's old cell. A wagon picked up on the move joins at the cell the
//! old tail vacated.

use serde::{Deserialize, Serialize};
use strata::{Dir, Pos};

/// Locomotive position, heading and trailing cars (nearest first).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Convoy {
    head: Pos,
    heading: Dir,
    cars: Vec<Pos>,
}

/// What [`Convoy::advance`] changed, enough to take it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoyMove {
    /// Locomotive cell before the move
    pub head_before: Pos,
    /// Heading before the move
    pub heading_before: Dir,
    /// Cell no part of the train occupies any more, unless a car joined there
    pub vacated: Pos,
    /// A wagon was appended
    pub joined: bool,
}

impl Convoy {
    /// A bare locomotive.
    #[must_use]
    pub fn new(head: Pos, heading: Dir) -> Self {
        Self {
            head,
            heading,
            cars: Vec::new(),
        }
    }

    /// Locomotive cell.
    #[must_use]
    pub const fn head(&self) -> Pos {
        self.head
    }

    /// Direction of the last move.
    #[must_use]
    pub const fn heading(&self) -> Dir {
        self.heading
    }

    /// Trailing cars, nearest the locomotive first.
    #[must_use]
    pub fn cars(&self) -> &[Pos] {
        &self.cars
    }

    /// Number of trailing cars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    /// True for a bare locomotive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Whether the locomotive or any car stands on `pos`.
    #[must_use]
    pub fn occupies(&self, pos: Pos) -> bool {
        self.head == pos || self.cars.contains(&pos)
    }

    /// Move the locomotive one cell and pull the cars along. With `join`, a
    /// new car is appended at the cell the tail left.
    pub fn advance(&mut self, dir: Dir, join: bool) -> ConvoyMove {
        let head_before = self.head;
        let heading_before = self.heading;
        let vacated = self.cars.last().copied().unwrap_or(head_before);

        for i in (1..self.cars.len()).rev() {
            self.cars[i] = self.cars[i - 1];
        }
        if let Some(first) = self.cars.first_mut() {
            *first = head_before;
        }
        self.head = head_before.step(dir);
        self.heading = dir;
        if join {
            self.cars.push(vacated);
        }

        ConvoyMove {
            head_before,
            heading_before,
            vacated,
            joined: join,
        }
    }

    /// Undo an [`advance`](Self::advance).
    pub fn retreat(&mut self, step: &ConvoyMove) {
        if step.joined {
            self.cars.pop();
        }
        let n = self.cars.len();
        for i in 0..n.saturating_sub(1) {
            self.cars[i] = self.cars[i + 1];
        }
        if let Some(last) = self.cars.last_mut() {
            *last = step.vacated;
        }
        self.head = step.head_before;
        self.heading = step.heading_before;
    }
}
