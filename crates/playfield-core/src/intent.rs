//! Player intents and held-input state.
//!
//! An [`Intent`] is a discrete press delivered by the input source. Games
//! queue intents and apply them at the start of the next frame. Continuous
//! games additionally read [`InputState`], the set of keys held during a frame.

use serde::{Deserialize, Serialize};
use strata::Dir;

/// A discrete command from the input source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Step or steer up.
    MoveUp,
    /// Step or steer down.
    MoveDown,
    /// Step or steer left.
    MoveLeft,
    /// Step or steer right.
    MoveRight,
    /// Push in the facing direction.
    Push,
    /// Fire.
    Shoot,
    /// Speed up.
    Accelerate,
    /// Slow down.
    Brake,
    /// Revert the last state-mutating move.
    Undo,
    /// Restart the current level, dropping pending transitions.
    Restart,
    /// Start from the menu, or advance past a completed level.
    ConfirmContinue,
    /// Jump to the level unlocked by a password.
    EnterPassword(String),
}

/// Payload-free discriminant of an [`Intent`], used as a rate-limit key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntentKind {
    /// [`Intent::MoveUp`]
    MoveUp,
    /// [`Intent::MoveDown`]
    MoveDown,
    /// [`Intent::MoveLeft`]
    MoveLeft,
    /// [`Intent::MoveRight`]
    MoveRight,
    /// [`Intent::Push`]
    Push,
    /// [`Intent::Shoot`]
    Shoot,
    /// [`Intent::Accelerate`]
    Accelerate,
    /// [`Intent::Brake`]
    Brake,
    /// [`Intent::Undo`]
    Undo,
    /// [`Intent::Restart`]
    Restart,
    /// [`Intent::ConfirmContinue`]
    ConfirmContinue,
    /// [`Intent::EnterPassword`]
    EnterPassword,
}

impl Intent {
    /// The payload-free kind.
    #[must_use]
    pub const fn kind(&self) -> IntentKind {
        match self {
            Self::MoveUp => IntentKind::MoveUp,
            Self::MoveDown => IntentKind::MoveDown,
            Self::MoveLeft => IntentKind::MoveLeft,
            Self::MoveRight => IntentKind::MoveRight,
            Self::Push => IntentKind::Push,
            Self::Shoot => IntentKind::Shoot,
            Self::Accelerate => IntentKind::Accelerate,
            Self::Brake => IntentKind::Brake,
            Self::Undo => IntentKind::Undo,
            Self::Restart => IntentKind::Restart,
            Self::ConfirmContinue => IntentKind::ConfirmContinue,
            Self::EnterPassword(_) => IntentKind::EnterPassword,
        }
    }

    /// Direction for the four move intents.
    #[must_use]
    pub const fn direction(&self) -> Option<Dir> {
        match self {
            Self::MoveUp => Some(Dir::Up),
            Self::MoveDown => Some(Dir::Down),
            Self::MoveLeft => Some(Dir::Left),
            Self::MoveRight => Some(Dir::Right),
            _ => None,
        }
    }

    /// Move intent for a direction.
    #[must_use]
    pub const fn from_dir(dir: Dir) -> Self {
        match dir {
            Dir::Up => Self::MoveUp,
            Dir::Down => Self::MoveDown,
            Dir::Left => Self::MoveLeft,
            Dir::Right => Self::MoveRight,
        }
    }
}

/// Keys held down during one frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputState {
    /// Up / thrust
    pub up: bool,
    /// Down
    pub down: bool,
    /// Left
    pub left: bool,
    /// Right
    pub right: bool,
    /// Fire
    pub shoot: bool,
    /// Accelerate
    pub accelerate: bool,
    /// Brake
    pub brake: bool,
}

impl InputState {
    /// Nothing held.
    pub const IDLE: Self = Self {
        up: false,
        down: false,
        left: false,
        right: false,
        shoot: false,
        accelerate: false,
        brake: false,
    };

    /// Mark the key behind a move/shoot/speed intent as held. Other intents are ignored.
    pub fn press(&mut self, intent: &Intent) {
        self.set(intent, true);
    }

    /// Mark the key behind an intent as released.
    pub fn release(&mut self, intent: &Intent) {
        self.set(intent, false);
    }

    fn set(&mut self, intent: &Intent, held: bool) {
        match intent {
            Intent::MoveUp => self.up = held,
            Intent::MoveDown => self.down = held,
            Intent::MoveLeft => self.left = held,
            Intent::MoveRight => self.right = held,
            Intent::Shoot => self.shoot = held,
            Intent::Accelerate => self.accelerate = held,
            Intent::Brake => self.brake = held,
            _ => {}
        }
    }

    /// Held move directions in [`Dir::ALL`] order.
    pub fn directions(&self) -> impl Iterator<Item = Dir> + '_ {
        Dir::ALL.into_iter().filter(move |dir| match dir {
            Dir::Up => self.up,
            Dir::Down => self.down,
            Dir::Left => self.left,
            Dir::Right => self.right,
        })
    }

    /// Horizontal axis: -1 left, +1 right, 0 for neither or both.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        f32::from(i8::from(self.right) - i8::from(self.left))
    }

    /// Vertical axis: -1 up, +1 down, 0 for neither or both.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        f32::from(i8::from(self.down) - i8::from(self.up))
    }
}
