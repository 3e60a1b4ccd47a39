//! Ordered level packs with password lookup.

use serde::{Deserialize, Serialize};

use crate::level::{LevelDescriptor, LevelError};

/// Unlock words in pack order. The built-in pack ships the first ten levels;
/// later words are reserved for packs loaded from JSON.
pub const PASSWORDS: [&str; 30] = [
    "GOLEM", "KRONE", "MYDLO", "LEDEN", "STROP", "LILIE", "RYBKA", "KLAUN", "BRAUN", "WHITE",
    "MOUSE", "DREAM", "IDEAL", "ILUZE", "SAINT", "BELLS", "TROJA", "EMOCE", "BASTL", "ISLAM",
    "JEANS", "METAL", "MIKRO", "SENZA", "GALAX", "STONE", "SLAVE", "FORTE", "LUCIE", "NATUR",
];

struct BuiltinLevel {
    password: &'static str,
    width: u32,
    height: u32,
    rows: &'static [&'static str],
}

const BUILTIN: [BuiltinLevel; 10] = [
    BuiltinLevel {
        password: "GOLEM",
        width: 19,
        height: 11,
        rows: &[
            "    #####          ",
            "    #   #          ",
            "    #$  #          ",
            "  ###  $##         ",
            "  #  $ $ #         ",
            "### # ## #   ######",
            "#   # ## #####  ..#",
            "# $  $          ..#",
            "##### ### #@##  ..#",
            "    #     #########",
            "    #######        ",
        ],
    },
    BuiltinLevel {
        password: "KRONE",
        width: 15,
        height: 11,
        rows: &[
            "  ####         ",
            "  #  ###       ",
            "  #$   #       ",
            "###    ###     ",
            "#   ##   #     ",
            "# $  $ ###     ",
            "### $  # #     ",
            "  #  ### #     ",
            "  #.@.   #     ",
            "  #....###     ",
            "  ######       ",
        ],
    },
    BuiltinLevel {
        password: "MYDLO",
        width: 17,
        height: 11,
        rows: &[
            "       ####      ",
            " #######  ##     ",
            "##  $ $    #     ",
            "#   # # $  #     ",
            "#  $      ##     ",
            "## # #$  ##      ",
            "## #  # ##       ",
            "##  $ @ #        ",
            "##.....##        ",
            "#......#         ",
            "########         ",
        ],
    },
    BuiltinLevel {
        password: "LEDEN",
        width: 13,
        height: 13,
        rows: &[
            "  #######    ",
            "  #     #    ",
            "  # $$$ #    ",
            "### # # ##   ",
            "#  $  $ ##   ",
            "#  #@#   #   ",
            "## $ $ $ #   ",
            "### # # ##   ",
            "  # ### #    ",
            "  #.....#    ",
            "  #.....#    ",
            "  #######    ",
            "             ",
        ],
    },
    BuiltinLevel {
        password: "STROP",
        width: 15,
        height: 13,
        rows: &[
            "    ######     ",
            "##### ....#    ",
            "#     ....#    ",
            "#  # $ #  #    ",
            "# $  $ $ ##    ",
            "###$  $ $ #    ",
            "  #  $# # #    ",
            "  ## $  $ #    ",
            "   #   ####    ",
            "   # @ #       ",
            "   #  ##       ",
            "   ####        ",
            "               ",
        ],
    },
    BuiltinLevel {
        password: "LILIE",
        width: 17,
        height: 11,
        rows: &[
            "######  ###      ",
            "#..  #  # ####   ",
            "#..  ####    #   ",
            "#..     $ $  #   ",
            "#..  # # $ $ #   ",
            "#..### # $ $ #   ",
            "#### $  $  $ #   ",
            "   #  $ $ $  #   ",
            "   #    #    #   ",
            "   ######  @##   ",
            "          ###    ",
        ],
    },
    BuiltinLevel {
        password: "RYBKA",
        width: 15,
        height: 13,
        rows: &[
            "       ####    ",
            " #######  #    ",
            "## $ $ $ $#    ",
            "#  @      #    ",
            "# $ $ $ $ #    ",
            "##       ##    ",
            " ####  ###     ",
            "    # ##       ",
            "    # #        ",
            "  ###.#        ",
            "  #...#        ",
            "  #...#        ",
            "  #####        ",
        ],
    },
    BuiltinLevel {
        password: "KLAUN",
        width: 13,
        height: 13,
        rows: &[
            "  #####      ",
            "  #   #      ",
            "  #$  ####   ",
            " ##  $   #   ",
            " # $@$   #   ",
            " #   $ ###   ",
            " # $  ## #   ",
            " ##  ## ##   ",
            "  #### # #   ",
            "     #...#   ",
            "     #...#   ",
            "     #####   ",
            "             ",
        ],
    },
    BuiltinLevel {
        password: "BRAUN",
        width: 17,
        height: 11,
        rows: &[
            "      ####       ",
            "####### @#       ",
            "#     $  #       ",
            "#  $## $ #       ",
            "## #..#  #       ",
            " # $..# ##       ",
            " # #..#  #       ",
            " #  .. $ #       ",
            " #  #   ##       ",
            " ##   ###        ",
            "  #####          ",
        ],
    },
    BuiltinLevel {
        password: "WHITE",
        width: 15,
        height: 13,
        rows: &[
            "     #####     ",
            "  ####   #     ",
            "### $ $$ #     ",
            "#   #  $ #     ",
            "# @ # #  #     ",
            "#### ## ##     ",
            "#  ....  #     ",
            "# #....  #     ",
            "# #  .  ##     ",
            "#  ######      ",
            "####           ",
            "               ",
            "               ",
        ],
    },
];

/// An ordered list of level descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    levels: Vec<LevelDescriptor>,
}

impl LevelCatalog {
    /// Catalog over `levels`, in order.
    #[must_use]
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    /// The ten crate/convoy levels shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        let levels = BUILTIN
            .iter()
            .enumerate()
            .map(|(i, level)| LevelDescriptor {
                password: Some(level.password.to_string()),
                title: format!("Level {} - {}", i + 1, level.password),
                width: level.width,
                height: level.height,
                rows: level.rows.iter().map(|r| (*r).to_string()).collect(),
            })
            .collect();
        Self { levels }
    }

    /// Decode a catalog from a JSON array of descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::Pack`] when the JSON does not describe a list of levels.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelDescriptor> =
            serde_json::from_str(json).map_err(|e| LevelError::Pack(e.to_string()))?;
        tracing::debug!(levels = levels.len(), "loaded level pack");
        Ok(Self { levels })
    }

    /// Level at `index`, if any.
    #[must_use]
    pub fn by_index(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    /// Index and descriptor of the level unlocked by `password` (case-insensitive).
    #[must_use]
    pub fn by_password(&self, password: &str) -> Option<(usize, &LevelDescriptor)> {
        let wanted = password.trim().to_ascii_uppercase();
        self.levels.iter().enumerate().find(|(_, level)| {
            level
                .password
                .as_deref()
                .is_some_and(|p| p.to_ascii_uppercase() == wanted)
        })
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True when the catalog holds no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// All descriptors in order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{parse, Dialect};

    #[test]
    fn builtin_levels_parse_in_both_dialects() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        for level in catalog.iter() {
            let crates = parse(level, Dialect::Warehouse).unwrap();
            let convoy = parse(level, Dialect::Railway).unwrap();
            assert_eq!(crates.player, convoy.player, "{}", level.title);
            assert!(!crates.goals.is_empty(), "{}", level.title);
        }
    }

    #[test]
    fn builtin_passwords_follow_the_list() {
        let catalog = LevelCatalog::builtin();
        for (i, level) in catalog.iter().enumerate() {
            assert_eq!(level.password.as_deref(), Some(PASSWORDS[i]));
        }
    }

    #[test]
    fn password_lookup_is_case_insensitive() {
        let catalog = LevelCatalog::builtin();
        let (index, level) = catalog.by_password("leden").unwrap();
        assert_eq!(index, 3);
        assert_eq!(level.title, "Level 4 - LEDEN");
        assert!(catalog.by_password("MOUSE").is_none());
        assert!(catalog.by_password("").is_none());
    }

    #[test]
    fn by_index_bounds() {
        let catalog = LevelCatalog::builtin();
        assert!(catalog.by_index(9).is_some());
        assert!(catalog.by_index(10).is_none());
    }

    #[test]
    fn json_pack_roundtrip_and_rejection() {
        let catalog = LevelCatalog::new(vec![
            LevelDescriptor::from_rows(&["####", "#@.#", "####"]).with_password("abc"),
        ]);
        let json = serde_json::to_string(&catalog.levels).unwrap();
        let back = LevelCatalog::from_json(&json).unwrap();
        assert_eq!(back, catalog);
        assert_eq!(back.by_password("ABC").map(|(i, _)| i), Some(0));
        assert!(matches!(LevelCatalog::from_json("{"), Err(LevelError::Pack(_))));
    }
}
