//! Events emitted by rules and games during a frame.
//!
//! Events are informational: the presentation layer plays sounds or flashes
//! from them, tests assert on them. State never depends on them.

use serde::{Deserialize, Serialize};
use strata::Pos;

use crate::entity::{EntityId, HostileKind, PickupKind};
use crate::session::LossCause;

/// Something that happened this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Grid games
    /// Player walked to an empty cell
    Moved {
        /// Previous cell
        from: Pos,
        /// New cell
        to: Pos,
    },
    /// Player dug through dirt
    Dug {
        /// Dug cell
        at: Pos,
    },
    /// Player collected a gem or wagon
    Collected {
        /// Cell of the collectible
        at: Pos,
        /// Collected count afterwards
        count: u32,
    },
    /// Player pushed a box or rock
    Pushed {
        /// Cell the object left
        from: Pos,
        /// Cell the object entered
        to: Pos,
    },
    /// Exits opened
    ExitOpened {
        /// Number of exit cells converted
        cells: usize,
    },
    /// A falling object landed on the player
    Crushed {
        /// Player cell
        at: Pos,
    },
    /// The previous command was reverted
    Undone,
    /// The level was restarted
    Restarted,
    /// A level was loaded
    LevelLoaded {
        /// One-based level number
        level: u32,
    },
    /// A password did not match any level
    PasswordRejected,

    // Field games
    /// A projectile was fired
    Shot {
        /// New projectile
        id: EntityId,
    },
    /// A projectile struck a hostile
    Hit {
        /// The projectile
        projectile: EntityId,
        /// The hostile
        target: EntityId,
    },
    /// A hostile was destroyed by fire
    Destroyed {
        /// The hostile
        id: EntityId,
        /// What it was
        kind: HostileKind,
        /// Score awarded
        bounty: f64,
    },
    /// The craft collided with a hostile
    Rammed {
        /// The hostile
        id: EntityId,
        /// What it was
        kind: HostileKind,
    },
    /// The craft touched a pickup
    PickedUp {
        /// The pickup
        id: EntityId,
        /// What it was
        kind: PickupKind,
        /// Resource it carried
        amount: f64,
        /// Score it carried
        bounty: f64,
    },
    /// The craft left the lane
    OffCourse,
    /// The craft touched the ground too fast
    HardLanding {
        /// Downward speed at contact, px per frame
        impact: f32,
    },
    /// A passenger boarded
    Boarded {
        /// Destination pad index
        destination: usize,
    },
    /// A passenger reached their pad
    Delivered {
        /// Destination pad index
        destination: usize,
    },
    /// The craft took on fuel
    Refueled {
        /// Fuel added
        amount: f64,
    },
    /// A scrolling stage was completed
    StageComplete {
        /// One-based stage just finished
        stage: u32,
        /// Score awarded
        bonus: f64,
    },

    // Session
    /// A life was lost
    LifeLost {
        /// What killed the player
        cause: LossCause,
        /// Lives remaining
        lives_left: u32,
    },
    /// The player came back after a respawn delay
    Respawned,
    /// The level is finished
    LevelComplete {
        /// One-based level number
        level: u32,
        /// Score awarded
        bonus: f64,
    },
    /// No lives left
    GameOver,
    /// No levels left
    Victory,
}

/// Ordered event buffer for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Append several events.
    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        self.events.extend(events);
    }

    /// Take every event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded so far.
    #[must_use]
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True if any event matches `pred`.
    pub fn any<F>(&self, pred: F) -> bool
    where
        F: Fn(&Event) -> bool,
    {
        self.events.iter().any(pred)
    }
}
