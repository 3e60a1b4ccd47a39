//! Level descriptors and glyph dialects.
//!
//! A [`LevelDescriptor`] is a text grid plus dimensions and an optional
//! password. [`parse`] turns it into a [`ParsedLevel`] according to a
//! [`Dialect`], which fixes what each glyph means for one family of games.
//!
//! Parsing either yields a complete initial grid with exactly one player
//! marker or fails with a [`LevelError`]; there is no partially loaded state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::CellKind;
use crate::grid::Grid;
use crate::set::CellSet;
use crate::Pos;

/// Smallest grid that still has an interior cell.
const MIN_SIDE: u32 = 3;

/// Errors from parsing a level descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The descriptor has no rows or zero dimensions.
    #[error("level has no cells")]
    Empty,
    /// Dimensions leave no interior.
    #[error("level {width}x{height} is too small (minimum 3x3)")]
    TooSmall {
        /// Declared width
        width: u32,
        /// Declared height
        height: u32,
    },
    /// Number of rows differs from the declared height.
    #[error("expected {expected} rows, found {found}")]
    RowCount {
        /// Declared height
        expected: u32,
        /// Rows present
        found: usize,
    },
    /// A row is longer than the declared width.
    #[error("row {row} has {found} glyphs, width is {expected}")]
    RowTooLong {
        /// Offending row index
        row: usize,
        /// Declared width
        expected: u32,
        /// Glyphs present
        found: usize,
    },
    /// A glyph has no meaning in the dialect.
    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph {
        /// The glyph
        glyph: char,
        /// Column
        x: i32,
        /// Row
        y: i32,
    },
    /// No player marker.
    #[error("level has no player marker")]
    MissingPlayer,
    /// More than one player marker.
    #[error("level has more than one player marker: {first:?} and {second:?}")]
    MultiplePlayers {
        /// First marker seen
        first: Pos,
        /// Second marker seen
        second: Pos,
    },
    /// The player marker sits on the boundary ring.
    #[error("player marker at {0:?} is on the boundary")]
    PlayerOnBoundary(Pos),
    /// A level pack could not be decoded.
    #[error("level pack: {0}")]
    Pack(String),
}

/// Cosmetic variant of a crate or wagon. Carried through for presentation only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Tint {
    /// `$`
    #[default]
    Blue,
    /// `B`
    Green,
    /// `Y`
    Yellow,
    /// `R`
    Red,
}

/// Glyph vocabulary for one family of games.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Digging/falling levels: ` ` empty, `.` dirt, `#` wall, `o` rock,
    /// `d` gem, `@` player, `E` closed exit, `X` open exit.
    Mine,
    /// Crate levels: ` ` empty, `#` wall, `.` goal, `@` player, `+` player on
    /// goal, `$`/`B`/`Y`/`R` crate, `*` crate on goal.
    Warehouse,
    /// Convoy levels: ` ` empty, `#` wall, `.` goal, `@` locomotive,
    /// `$`/`B`/`Y`/`R` wagon.
    Railway,
}

/// What one glyph decodes to.
struct Glyph {
    kind: CellKind,
    player: bool,
    goal: bool,
    tint: Option<Tint>,
}

impl Glyph {
    const fn cell(kind: CellKind) -> Self {
        Self {
            kind,
            player: false,
            goal: false,
            tint: None,
        }
    }

    const fn tinted(kind: CellKind, tint: Tint) -> Self {
        Self {
            kind,
            player: false,
            goal: false,
            tint: Some(tint),
        }
    }
}

fn tint_of(glyph: char) -> Option<Tint> {
    match glyph {
        '$' => Some(Tint::Blue),
        'B' => Some(Tint::Green),
        'Y' => Some(Tint::Yellow),
        'R' => Some(Tint::Red),
        _ => None,
    }
}

impl Dialect {
    fn decode(self, glyph: char) -> Option<Glyph> {
        let player = Glyph {
            kind: CellKind::PlayerMarker,
            player: true,
            goal: false,
            tint: None,
        };
        match (self, glyph) {
            (_, ' ') => Some(Glyph::cell(CellKind::Empty)),
            (_, '#') => Some(Glyph::cell(CellKind::Wall)),
            (_, '@') => Some(player),
            (Self::Mine, '.') => Some(Glyph::cell(CellKind::Dirt)),
            (Self::Mine, 'o') => Some(Glyph::cell(CellKind::Rock)),
            (Self::Mine, 'd') => Some(Glyph::cell(CellKind::Collectible)),
            (Self::Mine, 'E') => Some(Glyph::cell(CellKind::ExitClosed)),
            (Self::Mine, 'X') => Some(Glyph::cell(CellKind::ExitOpen)),
            (Self::Warehouse | Self::Railway, '.') => Some(Glyph {
                goal: true,
                ..Glyph::cell(CellKind::Goal)
            }),
            (Self::Warehouse, '+') => Some(Glyph {
                goal: true,
                ..player
            }),
            (Self::Warehouse, '*') => Some(Glyph {
                goal: true,
                ..Glyph::cell(CellKind::BoxOnGoal)
            }),
            (Self::Warehouse, c) => tint_of(c).map(|t| Glyph::tinted(CellKind::Box, t)),
            (Self::Railway, c) => tint_of(c).map(|t| Glyph::tinted(CellKind::Collectible, t)),
            (Self::Mine, _) => None,
        }
    }

    /// Glyph used for `kind` when rendering a grid back to text.
    #[must_use]
    pub const fn glyph(self, kind: CellKind) -> char {
        match (self, kind) {
            (_, CellKind::Empty) => ' ',
            (_, CellKind::Wall) => '#',
            (_, CellKind::PlayerMarker) => '@',
            (_, CellKind::Rock) => 'o',
            (_, CellKind::ExitClosed) => 'E',
            (_, CellKind::ExitOpen) => 'X',
            (_, CellKind::BoxOnGoal) => '*',
            (Self::Mine, CellKind::Dirt) => '.',
            (Self::Mine, CellKind::Collectible) => 'd',
            (_, CellKind::Collectible | CellKind::Box) => '$',
            (_, CellKind::Goal) => '.',
            // Dirt has no glyph outside the mine dialect.
            (_, CellKind::Dirt) => ':',
        }
    }

    /// Render a grid as text rows in this dialect.
    #[must_use]
    pub fn render(self, grid: &Grid) -> Vec<String> {
        let width = grid.width() as usize;
        grid.cells()
            .chunks(width.max(1))
            .map(|row| row.iter().map(|k| self.glyph(*k)).collect())
            .collect()
    }
}

/// Text description of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    /// Password that unlocks the level, if any.
    #[serde(default)]
    pub password: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    /// One string per row; short rows are padded with empty cells.
    pub rows: Vec<String>,
}

impl LevelDescriptor {
    /// Descriptor sized to fit `rows` exactly.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let rows: Vec<String> = rows.iter().map(|r| r.as_ref().to_string()).collect();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        Self {
            password: None,
            title: String::new(),
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(rows.len()).unwrap_or(u32::MAX),
            rows,
        }
    }

    /// Attach a password.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Attach a title.
    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

/// Result of parsing a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLevel {
    /// Initial grid; the player cell holds [`CellKind::PlayerMarker`].
    pub grid: Grid,
    /// Player (or locomotive) position.
    pub player: Pos,
    /// Goal squares, including ones currently covered by the player or a crate.
    pub goals: CellSet,
    /// Tints of crates and wagons by position.
    pub tints: BTreeMap<Pos, Tint>,
}

/// Parse `descriptor` according to `dialect`.
///
/// # Errors
///
/// Returns a [`LevelError`] when the dimensions are inconsistent, a glyph is
/// unknown to the dialect, or the player marker is missing, repeated or on
/// the boundary ring.
pub fn parse(descriptor: &LevelDescriptor, dialect: Dialect) -> Result<ParsedLevel, LevelError> {
    let (width, height) = (descriptor.width, descriptor.height);
    if width == 0 || height == 0 || descriptor.rows.is_empty() {
        return Err(LevelError::Empty);
    }
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(LevelError::TooSmall { width, height });
    }
    if descriptor.rows.len() != height as usize {
        return Err(LevelError::RowCount {
            expected: height,
            found: descriptor.rows.len(),
        });
    }

    let mut grid = Grid::new(width, height);
    let mut goals = CellSet::new(width, height);
    let mut tints = BTreeMap::new();
    let mut player: Option<Pos> = None;

    for (row_index, row) in descriptor.rows.iter().enumerate() {
        let glyphs = row.chars().count();
        if glyphs > width as usize {
            return Err(LevelError::RowTooLong {
                row: row_index,
                expected: width,
                found: glyphs,
            });
        }
        for (col, ch) in row.chars().enumerate() {
            // Bounded by width/height, both u32 and checked above.
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let pos = Pos::new(col as i32, row_index as i32);
            let glyph = dialect.decode(ch).ok_or(LevelError::UnknownGlyph {
                glyph: ch,
                x: pos.x,
                y: pos.y,
            })?;
            if glyph.player {
                if !grid.is_interior(pos) {
                    return Err(LevelError::PlayerOnBoundary(pos));
                }
                if let Some(first) = player {
                    return Err(LevelError::MultiplePlayers { first, second: pos });
                }
                player = Some(pos);
            }
            if glyph.goal {
                goals.insert(pos);
            }
            if let Some(tint) = glyph.tint {
                tints.insert(pos, tint);
            }
            grid.put(pos, glyph.kind);
        }
    }

    let player = player.ok_or(LevelError::MissingPlayer)?;
    tracing::debug!(width, height, ?player, goals = goals.len(), "parsed level");
    Ok(ParsedLevel {
        grid,
        player,
        goals,
        tints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warehouse(rows: &[&str]) -> Result<ParsedLevel, LevelError> {
        parse(&LevelDescriptor::from_rows(rows), Dialect::Warehouse)
    }

    #[test]
    fn parses_warehouse_glyphs() {
        let level = warehouse(&["#####", "#@$.#", "#*+ #", "#####"]);
        assert!(matches!(level, Err(LevelError::MultiplePlayers { .. })));

        let level = warehouse(&["#####", "#@$.#", "#* B#", "#####"]).unwrap();
        assert_eq!(level.player, Pos::new(1, 1));
        assert_eq!(level.grid.get(Pos::new(2, 1)), CellKind::Box);
        assert_eq!(level.grid.get(Pos::new(3, 1)), CellKind::Goal);
        assert_eq!(level.grid.get(Pos::new(1, 2)), CellKind::BoxOnGoal);
        assert!(level.goals.contains(Pos::new(3, 1)));
        assert!(level.goals.contains(Pos::new(1, 2)));
        assert_eq!(level.tints.get(&Pos::new(3, 2)), Some(&Tint::Green));
    }

    #[test]
    fn player_on_goal_records_goal() {
        let level = warehouse(&["####", "#+$#", "####"]).unwrap();
        assert_eq!(level.grid.get(level.player), CellKind::PlayerMarker);
        assert!(level.goals.contains(level.player));
    }

    #[test]
    fn railway_wagons_are_collectibles() {
        let level = parse(
            &LevelDescriptor::from_rows(&["#####", "#@$R#", "#. .#", "#####"]),
            Dialect::Railway,
        )
        .unwrap();
        assert_eq!(level.grid.count(CellKind::Collectible), 2);
        assert_eq!(level.goals.len(), 2);
        assert_eq!(level.tints.get(&Pos::new(3, 1)), Some(&Tint::Red));
    }

    #[test]
    fn mine_glyphs() {
        let level = parse(
            &LevelDescriptor::from_rows(&["#####", "#@.o#", "#dEX#", "#####"]),
            Dialect::Mine,
        )
        .unwrap();
        assert_eq!(level.grid.get(Pos::new(2, 1)), CellKind::Dirt);
        assert_eq!(level.grid.get(Pos::new(3, 1)), CellKind::Rock);
        assert_eq!(level.grid.get(Pos::new(1, 2)), CellKind::Collectible);
        assert_eq!(level.grid.get(Pos::new(2, 2)), CellKind::ExitClosed);
        assert_eq!(level.grid.get(Pos::new(3, 2)), CellKind::ExitOpen);
    }

    #[test]
    fn short_rows_are_padded() {
        let mut descriptor = LevelDescriptor::from_rows(&["####", "#@", "####"]);
        descriptor.width = 4;
        let level = parse(&descriptor, Dialect::Warehouse).unwrap();
        assert_eq!(level.grid.get(Pos::new(3, 1)), CellKind::Empty);
    }

    mod malformed {
        use super::*;

        #[test]
        fn missing_player() {
            assert_eq!(warehouse(&["###", "# #", "###"]), Err(LevelError::MissingPlayer));
        }

        #[test]
        fn player_on_the_boundary() {
            assert_eq!(
                warehouse(&["#######", "@ $ . #", "#######"]),
                Err(LevelError::PlayerOnBoundary(Pos::new(0, 1)))
            );
        }

        #[test]
        fn unknown_glyph() {
            assert_eq!(
                warehouse(&["###", "#@#", "#?#"]),
                Err(LevelError::UnknownGlyph { glyph: '?', x: 1, y: 2 })
            );
        }

        #[test]
        fn row_count_mismatch() {
            let mut descriptor = LevelDescriptor::from_rows(&["###", "#@#", "###"]);
            descriptor.height = 4;
            assert_eq!(
                parse(&descriptor, Dialect::Warehouse),
                Err(LevelError::RowCount { expected: 4, found: 3 })
            );
        }

        #[test]
        fn row_too_long() {
            let mut descriptor = LevelDescriptor::from_rows(&["####", "#@#", "###"]);
            descriptor.width = 3;
            assert!(matches!(
                parse(&descriptor, Dialect::Warehouse),
                Err(LevelError::RowTooLong { row: 0, .. })
            ));
        }

        #[test]
        fn too_small_and_empty() {
            assert_eq!(
                warehouse(&["@"]),
                Err(LevelError::TooSmall { width: 1, height: 1 })
            );
            let empty: [&str; 0] = [];
            assert_eq!(warehouse(&empty), Err(LevelError::Empty));
        }
    }

    #[test]
    fn render_roundtrips_mine_rows() {
        let rows = ["#####", "#@.o#", "#dE #", "#####"];
        let level = parse(&LevelDescriptor::from_rows(&rows), Dialect::Mine).unwrap();
        assert_eq!(Dialect::Mine.render(&level.grid), rows);
    }
}
