//! Falling and rolling for grid games.
//!
//! One gravity tick scans the interior bottom-to-top, left-to-right over the
//! settled grid and writes moves into the store's next buffer:
//!
//! - A falling cell with an empty cell below drops one row.
//! - A falling cell resting on a rounded cell rolls to a side whose own
//!   square and the square below it are both empty. With both sides free the
//!   RNG picks, left with probability [`GravityRule::roll_left_bias`].
//! - A cell that was falling last tick and now rests on the player crushes it.
//!
//! A destination already claimed in the next buffer is blocked, so the first
//! cell in scan order wins a contested square.

use rand::Rng;
use serde::{Deserialize, Serialize};
use strata::{CellKind, Pos, WorldStore};

use crate::error::{ensure_range, ConfigError};

/// Tie-break parameters for the gravity automaton.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityRule {
    /// Chance of rolling left when both sides are free
    pub roll_left_bias: f64,
}

impl Default for GravityRule {
    fn default() -> Self {
        Self { roll_left_bias: 0.5 }
    }
}

/// What one gravity tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityReport {
    /// Cells that dropped one row
    pub moved: usize,
    /// Cells that rolled sideways
    pub rolled: usize,
    /// Player cell hit by a falling cell
    pub crushed: Option<Pos>,
}

impl GravityReport {
    /// True when nothing moved.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.moved == 0 && self.rolled == 0
    }
}

impl GravityRule {
    /// Rule with the given left bias.
    #[must_use]
    pub const fn with_bias(roll_left_bias: f64) -> Self {
        Self { roll_left_bias }
    }

    /// Check the bias lies in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfRange`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_range("roll_left_bias", self.roll_left_bias, 0.0, 1.0)
    }

    /// Run one gravity tick on `store` and commit it.
    pub fn apply(&self, store: &mut WorldStore) -> GravityReport {
        let mut report = GravityReport::default();
        store.begin_tick();
        {
            let mut view = store.tick_view();
            let (width, height) = (view.current.width(), view.current.height());
            // Grid sides fit in i32 for every playable level.
            #[allow(clippy::cast_possible_wrap)]
            let (width, height) = (width as i32, height as i32);

            for y in (1..height - 1).rev() {
                for x in 1..width - 1 {
                    let pos = Pos::new(x, y);
                    let kind = view.current.get(pos);
                    if !kind.falls() {
                        continue;
                    }

                    let below = pos.offset(0, 1);
                    let under = view.current.get(below);
                    if under == CellKind::Empty {
                        if view.next.get(below) == CellKind::Empty {
                            view.next.set(pos, CellKind::Empty);
                            view.next.set(below, kind);
                            view.next_falling.insert(below);
                            report.moved += 1;
                        }
                        continue;
                    }

                    if under == CellKind::PlayerMarker {
                        if view.falling.contains(pos) && report.crushed.is_none() {
                            report.crushed = Some(below);
                        }
                        continue;
                    }

                    if !under.is_rounded() {
                        continue;
                    }
                    let free = |dx: i32| {
                        let side = pos.offset(dx, 0);
                        view.current.get(side) == CellKind::Empty
                            && view.current.get(side.offset(0, 1)) == CellKind::Empty
                            && view.next.get(side) == CellKind::Empty
                    };
                    let dx = match (free(-1), free(1)) {
                        (true, true) => {
                            if view.rng.gen::<f64>() < self.roll_left_bias {
                                -1
                            } else {
                                1
                            }
                        }
                        (true, false) => -1,
                        (false, true) => 1,
                        (false, false) => continue,
                    };
                    let side = pos.offset(dx, 0);
                    view.next.set(pos, CellKind::Empty);
                    view.next.set(side, kind);
                    view.next_falling.insert(side);
                    report.rolled += 1;
                }
            }
        }
        store.commit();
        tracing::trace!(
            tick = store.tick(),
            moved = report.moved,
            rolled = report.rolled,
            crushed = report.crushed.is_some(),
            "gravity"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata::Grid;

    fn store_with(width: u32, height: u32, cells: &[(i32, i32, CellKind)], seed: u64) -> WorldStore {
        let mut grid = Grid::bordered(width, height);
        for &(x, y, kind) in cells {
            grid.set(Pos::new(x, y), kind);
        }
        WorldStore::from_grid(grid, seed)
    }

    mod fall_tests {
        use super::*;

        #[test]
        fn rock_falls_one_row_per_tick() {
            let mut store = store_with(5, 5, &[(1, 1, CellKind::Rock)], 0);
            let rule = GravityRule::default();

            let report = rule.apply(&mut store);
            assert_eq!(report.moved, 1);
            assert_eq!(store.get(Pos::new(1, 1)), CellKind::Empty);
            assert_eq!(store.get(Pos::new(1, 2)), CellKind::Rock);
            assert!(store.falling().contains(Pos::new(1, 2)));

            rule.apply(&mut store);
            assert_eq!(store.get(Pos::new(1, 3)), CellKind::Rock);

            let report = rule.apply(&mut store);
            assert!(report.is_settled());
            assert!(store.falling().is_empty());
        }

        #[test]
        fn only_unsupported_cells_fall() {
            let mut store = store_with(
                5,
                7,
                &[
                    (2, 1, CellKind::Rock),
                    (2, 2, CellKind::Collectible),
                    (2, 3, CellKind::Rock),
                    (1, 2, CellKind::Dirt),
                    (3, 2, CellKind::Dirt),
                ],
                0,
            );
            let report = GravityRule::default().apply(&mut store);
            // Only the bottom rock sees an empty cell in the pre-tick grid.
            assert_eq!(report.moved, 1);
            assert_eq!(store.get(Pos::new(2, 4)), CellKind::Rock);
            assert_eq!(store.get(Pos::new(2, 3)), CellKind::Empty);
            assert_eq!(store.get(Pos::new(2, 2)), CellKind::Collectible);
        }

        #[test]
        fn dirt_and_boxes_do_not_fall() {
            let mut store = store_with(5, 5, &[(1, 1, CellKind::Dirt), (2, 1, CellKind::Box)], 0);
            assert!(GravityRule::default().apply(&mut store).is_settled());
        }
    }

    mod roll_tests {
        use super::*;

        #[test]
        fn single_free_side_is_taken() {
            let mut store = store_with(
                6,
                6,
                &[
                    (2, 3, CellKind::Rock),
                    (2, 4, CellKind::Wall),
                    (1, 3, CellKind::Dirt),
                ],
                0,
            );
            let report = GravityRule::with_bias(1.0).apply(&mut store);
            assert_eq!(report.rolled, 1);
            assert_eq!(store.get(Pos::new(3, 3)), CellKind::Rock);
            assert!(store.falling().contains(Pos::new(3, 3)));
        }

        #[test]
        fn bias_decides_when_both_sides_are_free() {
            let cells = [(2, 3, CellKind::Rock), (2, 4, CellKind::Rock)];
            let mut left = store_with(6, 6, &cells, 3);
            GravityRule::with_bias(1.0).apply(&mut left);
            assert_eq!(left.get(Pos::new(1, 3)), CellKind::Rock);

            let mut right = store_with(6, 6, &cells, 3);
            GravityRule::with_bias(0.0).apply(&mut right);
            assert_eq!(right.get(Pos::new(3, 3)), CellKind::Rock);
        }

        #[test]
        fn contested_square_goes_to_the_first_in_scan_order() {
            // Two rocks on rounded supports both want (3, 3).
            let mut store = store_with(
                7,
                6,
                &[
                    (2, 3, CellKind::Rock),
                    (2, 4, CellKind::Wall),
                    (1, 3, CellKind::Wall),
                    (4, 3, CellKind::Rock),
                    (4, 4, CellKind::Wall),
                    (5, 3, CellKind::Wall),
                ],
                0,
            );
            let report = GravityRule::default().apply(&mut store);
            assert_eq!(report.rolled, 1);
            assert_eq!(store.get(Pos::new(3, 3)), CellKind::Rock);
            assert_eq!(store.get(Pos::new(2, 3)), CellKind::Empty);
            assert_eq!(store.get(Pos::new(4, 3)), CellKind::Rock);
        }

        #[test]
        fn no_roll_off_flat_ground() {
            let mut store = store_with(6, 6, &[(2, 3, CellKind::Rock), (2, 4, CellKind::Dirt)], 0);
            assert!(GravityRule::default().apply(&mut store).is_settled());
        }
    }

    mod crush_tests {
        use super::*;

        #[test]
        fn impact_is_one_tick_delayed() {
            let mut store = store_with(5, 6, &[(2, 1, CellKind::Rock), (2, 3, CellKind::PlayerMarker)], 0);
            let rule = GravityRule::default();

            let first = rule.apply(&mut store);
            assert_eq!(first.crushed, None);
            assert_eq!(store.get(Pos::new(2, 2)), CellKind::Rock);

            let second = rule.apply(&mut store);
            assert_eq!(second.crushed, Some(Pos::new(2, 3)));
        }

        #[test]
        fn resting_rock_never_crushes() {
            let mut store = store_with(5, 6, &[(2, 2, CellKind::Rock), (2, 3, CellKind::PlayerMarker)], 0);
            assert_eq!(GravityRule::default().apply(&mut store).crushed, None);
        }
    }

    #[test]
    fn validate_rejects_bias_outside_unit_range() {
        assert!(GravityRule::with_bias(1.2).validate().is_err());
        assert!(GravityRule::default().validate().is_ok());
    }
}
