//! Bounds-checked tile grid.
//!
//! The [`Grid`] is a fixed-size row-major array of [`CellKind`]s. Its outer
//! ring is the boundary: it is written once at construction and never again,
//! which lets rule code step off any interior cell without checking edges.
//!
//! # Sentinel reads
//!
//! Reading outside the grid returns [`CellKind::Wall`]. Rules therefore treat
//! "off the map" exactly like "solid", with no special case.

use serde::{Deserialize, Serialize};

use crate::cell::CellKind;
use crate::Pos;

/// Fixed-size tile grid with an immutable boundary ring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Kind reported for any coordinate outside the grid.
    pub const OUT_OF_BOUNDS: CellKind = CellKind::Wall;

    /// A grid filled with [`CellKind::Empty`], boundary included.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![CellKind::Empty; width as usize * height as usize],
        }
    }

    /// A grid whose boundary ring is [`CellKind::Wall`] and interior is empty.
    #[must_use]
    pub fn bordered(width: u32, height: u32) -> Self {
        let mut grid = Self::new(width, height);
        for pos in grid.positions().collect::<Vec<_>>() {
            if !grid.is_interior(pos) {
                grid.put(pos, CellKind::Wall);
            }
        }
        grid
    }

    /// Build a grid from row-major cells, boundary included.
    ///
    /// Returns `None` when `cells.len() != width * height`.
    #[must_use]
    pub fn from_cells(width: u32, height: u32, cells: Vec<CellKind>) -> Option<Self> {
        (cells.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let (Ok(x), Ok(y)) = (u32::try_from(pos.x), u32::try_from(pos.y)) else {
            return None;
        };
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Whether `pos` lies inside the grid.
    #[must_use]
    pub fn is_in_bounds(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Whether `pos` lies strictly inside the boundary ring.
    #[must_use]
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.x >= 1
            && pos.y >= 1
            && i64::from(pos.x) < i64::from(self.width) - 1
            && i64::from(pos.y) < i64::from(self.height) - 1
    }

    /// Kind at `pos`, or [`Grid::OUT_OF_BOUNDS`] outside the grid.
    #[must_use]
    pub fn get(&self, pos: Pos) -> CellKind {
        self.index(pos).map_or(Self::OUT_OF_BOUNDS, |i| self.cells[i])
    }

    /// Write `kind` at `pos`.
    ///
    /// Returns false without mutating anything when `pos` is outside the grid
    /// or on the boundary ring.
    pub fn set(&mut self, pos: Pos, kind: CellKind) -> bool {
        if !self.is_interior(pos) {
            return false;
        }
        self.put(pos, kind)
    }

    /// Unchecked-boundary write used while a grid is being built.
    pub(crate) fn put(&mut self, pos: Pos, kind: CellKind) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = kind;
                true
            }
            None => false,
        }
    }

    /// Every coordinate in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        // Grid dimensions are far below i32::MAX for any playable level.
        #[allow(clippy::cast_possible_wrap)]
        (0..h as i32).flat_map(move |y| (0..w as i32).map(move |x| Pos::new(x, y)))
    }

    /// Coordinates holding `kind`, row-major.
    #[must_use]
    pub fn positions_of(&self, kind: CellKind) -> Vec<Pos> {
        self.positions().filter(|p| self.get(*p) == kind).collect()
    }

    /// Number of cells holding `kind`.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| **c == kind).count()
    }

    /// Replace every interior `from` cell with `to`, returning the touched coordinates.
    pub fn replace_all(&mut self, from: CellKind, to: CellKind) -> Vec<Pos> {
        let touched: Vec<Pos> = self
            .positions()
            .filter(|p| self.is_interior(*p) && self.get(*p) == from)
            .collect();
        for pos in &touched {
            self.put(*pos, to);
        }
        touched
    }

    /// Row-major view of all cells.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bordered_grid_has_wall_ring() {
        let grid = Grid::bordered(4, 3);
        assert_eq!(grid.count(CellKind::Wall), 10);
        assert_eq!(grid.get(Pos::new(1, 1)), CellKind::Empty);
        assert_eq!(grid.get(Pos::new(2, 1)), CellKind::Empty);
    }

    #[test]
    fn out_of_bounds_reads_are_walls() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.get(Pos::new(-1, 0)), CellKind::Wall);
        assert_eq!(grid.get(Pos::new(0, 3)), CellKind::Wall);
        assert_eq!(grid.get(Pos::new(1, 1)), CellKind::Empty);
    }

    #[test]
    fn boundary_writes_are_rejected() {
        let mut grid = Grid::bordered(5, 5);
        assert!(!grid.set(Pos::new(0, 2), CellKind::Empty));
        assert!(!grid.set(Pos::new(4, 4), CellKind::Rock));
        assert!(!grid.set(Pos::new(9, 9), CellKind::Rock));
        assert_eq!(grid.get(Pos::new(0, 2)), CellKind::Wall);
        assert!(grid.set(Pos::new(2, 2), CellKind::Rock));
        assert_eq!(grid.get(Pos::new(2, 2)), CellKind::Rock);
    }

    #[test]
    fn replace_all_touches_interior_only() {
        let mut grid = Grid::bordered(6, 6);
        grid.set(Pos::new(1, 1), CellKind::ExitClosed);
        grid.set(Pos::new(4, 4), CellKind::ExitClosed);
        let touched = grid.replace_all(CellKind::ExitClosed, CellKind::ExitOpen);
        assert_eq!(touched, vec![Pos::new(1, 1), Pos::new(4, 4)]);
        assert_eq!(grid.count(CellKind::ExitOpen), 2);
        assert_eq!(grid.count(CellKind::ExitClosed), 0);
    }

    #[test]
    fn from_cells_checks_length() {
        assert!(Grid::from_cells(2, 2, vec![CellKind::Empty; 3]).is_none());
        let grid = Grid::from_cells(2, 2, vec![CellKind::Dirt; 4]).unwrap();
        assert_eq!(grid.count(CellKind::Dirt), 4);
    }
}
