//! # Strata
//!
//! Tile grid substrate for deterministic arcade and puzzle simulations.
//!
//! Strata represents a level as a fixed-size grid of [`CellKind`]s bordered by
//! immovable boundary cells. On top of the grid it provides:
//!
//! - **Bounds-checked access**: out-of-bounds reads return a solid sentinel so
//!   rule code never special-cases edges
//! - **Double buffering**: [`WorldStore`] computes a full next-state grid from
//!   the current one and swaps, so every transition observes a consistent
//!   "before" snapshot
//! - **Coordinate bitsets**: [`CellSet`] replaces ad hoc coordinate keys for
//!   per-cell flags such as "was falling last tick"
//! - **Level descriptors**: text grids parsed per [`Dialect`] into an initial
//!   grid, with password/index lookup through [`LevelCatalog`]
//!
//! ## Quick Start
//!
//! ```
//! use strata::{CellKind, Grid, Pos};
//!
//! let mut grid = Grid::bordered(5, 5);
//! assert!(grid.set(Pos::new(2, 1), CellKind::Rock));
//!
//! // Boundary cells never mutate
//! assert!(!grid.set(Pos::new(0, 0), CellKind::Empty));
//!
//! // Out-of-bounds reads are solid
//! assert_eq!(grid.get(Pos::new(-1, 7)), CellKind::Wall);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod cell;
pub mod grid;
pub mod hash;
pub mod level;
pub mod set;
pub mod store;

// Re-exports for convenience
pub use catalog::{LevelCatalog, PASSWORDS};
pub use cell::{CellKind, CellTraits};
pub use grid::Grid;
pub use hash::{hash_grid, hash_store};
pub use level::{Dialect, LevelDescriptor, LevelError, ParsedLevel, Tint};
pub use set::CellSet;
pub use store::{StoreConfig, TickView, WorldStore};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate. `y` grows downward.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl Pos {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Coordinate one cell away in `dir`.
    #[must_use]
    pub const fn step(self, dir: Dir) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Coordinate offset by an arbitrary delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// One of the four orthogonal move directions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dir {
    /// Toward row 0
    Up,
    /// Toward the last row
    Down,
    /// Toward column 0
    Left,
    /// Toward the last column
    Right,
}

impl Dir {
    /// All directions in a fixed order.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Unit delta `(dx, dy)`; always satisfies `|dx| + |dy| == 1`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// True for `Left` and `Right`.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}
