//! Cell kinds and the rule traits derived from them.
//!
//! A [`CellKind`] is the only state a grid cell carries. Its [`CellTraits`]
//! decide passability, pushability and fall-eligibility, so rule code asks
//! "does this cell fall?" rather than matching on kinds directly.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Rule properties of a cell kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CellTraits: u8 {
        /// Blocks movement outright.
        const SOLID = 1 << 0;
        /// Removed when the player walks into it.
        const DIGGABLE = 1 << 1;
        /// Moved one cell when the player walks into it and the cell beyond is free.
        const PUSHABLE = 1 << 2;
        /// Subject to gravity.
        const FALLS = 1 << 3;
        /// Lets a falling cell roll off its top surface.
        const ROUNDED = 1 << 4;
        /// Consumed for score when the player walks into it.
        const COLLECTIBLE = 1 << 5;
        /// Level exit, open or closed.
        const EXIT = 1 << 6;
    }
}

/// Closed set of tile kinds shared by every grid game.
///
/// Not every game uses every kind. Out-of-bounds reads report [`CellKind::Wall`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    /// Nothing here.
    #[default]
    Empty,
    /// Soft ground that the player digs through.
    Dirt,
    /// Immovable solid; also the boundary kind.
    Wall,
    /// Heavy object that falls and can be pushed sideways.
    Rock,
    /// Gem or wagon picked up by the player.
    Collectible,
    /// The single player-controlled cell.
    PlayerMarker,
    /// Exit that has not been unlocked yet.
    ExitClosed,
    /// Exit that completes the level when entered.
    ExitOpen,
    /// Crate pushed by the player.
    Box,
    /// Crate resting on a goal.
    BoxOnGoal,
    /// Target square for crates or the convoy.
    Goal,
}

impl CellKind {
    /// Every kind, in declaration order.
    pub const ALL: [CellKind; 11] = [
        CellKind::Empty,
        CellKind::Dirt,
        CellKind::Wall,
        CellKind::Rock,
        CellKind::Collectible,
        CellKind::PlayerMarker,
        CellKind::ExitClosed,
        CellKind::ExitOpen,
        CellKind::Box,
        CellKind::BoxOnGoal,
        CellKind::Goal,
    ];

    /// Rule traits for this kind.
    #[must_use]
    pub const fn traits(self) -> CellTraits {
        match self {
            Self::Empty | Self::Goal => CellTraits::empty(),
            Self::Dirt => CellTraits::DIGGABLE,
            Self::Wall => CellTraits::SOLID.union(CellTraits::ROUNDED),
            Self::Rock => CellTraits::SOLID
                .union(CellTraits::PUSHABLE)
                .union(CellTraits::FALLS)
                .union(CellTraits::ROUNDED),
            Self::Collectible => CellTraits::COLLECTIBLE
                .union(CellTraits::FALLS)
                .union(CellTraits::ROUNDED),
            Self::PlayerMarker | Self::ExitClosed => CellTraits::SOLID,
            Self::ExitOpen => CellTraits::EXIT,
            Self::Box | Self::BoxOnGoal => CellTraits::SOLID.union(CellTraits::PUSHABLE),
        }
    }

    /// Subject to gravity.
    #[must_use]
    pub const fn falls(self) -> bool {
        self.traits().contains(CellTraits::FALLS)
    }

    /// Lets a falling cell roll off it.
    #[must_use]
    pub const fn is_rounded(self) -> bool {
        self.traits().contains(CellTraits::ROUNDED)
    }

    /// Moved by the player.
    #[must_use]
    pub const fn is_pushable(self) -> bool {
        self.traits().contains(CellTraits::PUSHABLE)
    }

    /// A crate, with or without a goal underneath.
    #[must_use]
    pub const fn is_box(self) -> bool {
        matches!(self, Self::Box | Self::BoxOnGoal)
    }

    /// Passable without side effects.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Empty | Self::Goal)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Dirt => "dirt",
            Self::Wall => "wall",
            Self::Rock => "rock",
            Self::Collectible => "collectible",
            Self::PlayerMarker => "player",
            Self::ExitClosed => "exit (closed)",
            Self::ExitOpen => "exit (open)",
            Self::Box => "box",
            Self::BoxOnGoal => "box on goal",
            Self::Goal => "goal",
        };
        f.write_str(name)
    }
}
