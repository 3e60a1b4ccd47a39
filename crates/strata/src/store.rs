//! World store: the double-buffered grid owned by one simulation session.
//!
//! A tick never edits the grid it is reading. [`WorldStore::begin_tick`]
//! copies `current` into `next`, rules read `current` and write `next`, and
//! [`WorldStore::commit`] swaps the two. The falling set is buffered the same
//! way so impact checks see the previous tick's flags.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cell::CellKind;
use crate::grid::Grid;
use crate::set::CellSet;
use crate::Pos;

/// Configuration for a fresh [`WorldStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Grid width in cells
    pub width: u32,
    /// Grid height in cells
    pub height: u32,
    /// Seed for the store's RNG
    pub seed: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            seed: 0,
        }
    }
}

impl StoreConfig {
    /// Config with the given dimensions and the default seed.
    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

/// Split borrow of a store for the duration of one tick.
///
/// Rules read `current` and `falling` (the previous tick's flags) and write
/// `next` and `next_falling`.
#[derive(Debug)]
pub struct TickView<'a> {
    /// Settled grid, read-only during the tick
    pub current: &'a Grid,
    /// Grid under construction
    pub next: &'a mut Grid,
    /// Cells that moved during the previous tick
    pub falling: &'a CellSet,
    /// Cells that move during this tick
    pub next_falling: &'a mut CellSet,
    /// The store's RNG
    pub rng: &'a mut ChaCha8Rng,
}

/// Double-buffered grid plus per-cell falling flags and a seeded RNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldStore {
    current: Grid,
    next: Grid,
    falling: CellSet,
    next_falling: CellSet,
    tick: u64,
    seed: u64,
    /// Deterministic RNG (skipped in serialization, rebuilt from `seed`)
    #[serde(skip)]
    rng: Option<ChaCha8Rng>,
}

impl WorldStore {
    /// Create a store with a bordered, empty grid.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self::from_grid(Grid::bordered(config.width, config.height), config.seed)
    }

    /// Create a store around an existing grid.
    #[must_use]
    pub fn from_grid(grid: Grid, seed: u64) -> Self {
        let (w, h) = (grid.width(), grid.height());
        Self {
            next: grid.clone(),
            current: grid,
            falling: CellSet::new(w, h),
            next_falling: CellSet::new(w, h),
            tick: 0,
            seed,
            rng: Some(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Replace the grid (level load), clearing falling flags. The RNG stream continues.
    pub fn load(&mut self, grid: Grid) {
        let (w, h) = (grid.width(), grid.height());
        self.next = grid.clone();
        self.current = grid;
        self.falling = CellSet::new(w, h);
        self.next_falling = CellSet::new(w, h);
    }

    /// The settled grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.current
    }

    /// Mutable access to the settled grid, for commands issued between ticks.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.current
    }

    /// Cells that moved during the last committed tick.
    #[must_use]
    pub fn falling(&self) -> &CellSet {
        &self.falling
    }

    /// Forget a falling flag (the cell was disturbed by a command).
    pub fn clear_falling(&mut self, pos: Pos) {
        self.falling.remove(pos);
    }

    /// Start a tick: `next` becomes a copy of `current` and next-falling is emptied.
    pub fn begin_tick(&mut self) {
        self.next.clone_from(&self.current);
        self.next_falling.clear();
    }

    /// Borrow both buffers and the RNG at once. Call after [`begin_tick`](Self::begin_tick).
    pub fn tick_view(&mut self) -> TickView<'_> {
        let seed = self.seed;
        TickView {
            current: &self.current,
            next: &mut self.next,
            falling: &self.falling,
            next_falling: &mut self.next_falling,
            rng: self.rng.get_or_insert_with(|| ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Finish a tick: swap buffers and advance the tick counter.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        std::mem::swap(&mut self.falling, &mut self.next_falling);
        self.tick += 1;
    }

    /// Kind at `pos` in the settled grid.
    #[must_use]
    pub fn get(&self, pos: Pos) -> CellKind {
        self.current.get(pos)
    }

    /// Write to the settled grid (bounds- and boundary-checked).
    pub fn set(&mut self, pos: Pos, kind: CellKind) -> bool {
        self.current.set(pos, kind)
    }

    /// Committed tick count.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed the RNG was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The store's RNG, rebuilt from the seed if the store was deserialized.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        let seed = self.seed;
        self.rng.get_or_insert_with(|| ChaCha8Rng::seed_from_u64(seed))
    }
}
