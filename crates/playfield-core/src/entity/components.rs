//! Per-kind payloads carried by field entities.
//!
//! Every entity has a [`Body`]; the payload structs hold what only that kind
//! of entity needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position, velocity and bounding extent.
///
/// `position` is the centre of the box; `extent` is its full width and height.
/// Velocity is in pixels per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre of the bounding box
    pub position: Vec2,
    /// Pixels per second
    pub velocity: Vec2,
    /// Full width and height
    pub extent: Vec2,
}

impl Body {
    /// A stationary body.
    #[must_use]
    pub const fn new(position: Vec2, extent: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            extent,
        }
    }

    /// Same body moving at `velocity`.
    #[must_use]
    pub const fn moving(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Top-left corner.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.position - self.extent * 0.5
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.position + self.extent * 0.5
    }

    /// Strict axis-aligned box overlap; touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }
}

/// The player's craft (plane, car, helicopter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftState {
    /// Hit points; games without health leave it at the maximum
    pub health: f32,
    /// Frames of remaining invulnerability
    pub invulnerable_frames: u32,
    /// Forward speed for scrolling crafts, pixels per frame
    pub speed: f32,
    /// Set by the course check: outside the lane this frame
    pub off_course: bool,
}

impl Default for CraftState {
    fn default() -> Self {
        Self {
            health: 100.0,
            invulnerable_frames: 0,
            speed: 0.0,
            off_course: false,
        }
    }
}

impl CraftState {
    /// True while hits are ignored.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerable_frames > 0
    }
}

/// A player shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Health removed from a hostile on contact
    pub damage: f32,
}

impl Default for ProjectileState {
    fn default() -> Self {
        Self { damage: 1.0 }
    }
}

/// What a hostile is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileKind {
    /// River boat
    Boat,
    /// River helicopter
    Helicopter,
    /// Road traffic
    Car,
    /// Slow road traffic
    Truck,
    /// Desert roadside obstacle
    Cactus,
    /// Forest roadside obstacle
    Tree,
    /// Mountain roadside obstacle
    Rock,
    /// Flying reptile
    Pterosaur,
}

/// An enemy unit or road obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostileState {
    /// Kind tag
    pub kind: HostileKind,
    /// Destroyed when this reaches zero
    pub health: f32,
    /// Score for destroying it
    pub bounty: f64,
    /// Box the hostile bounces inside, as (min, max) of its centre
    pub roam: Option<(Vec2, Vec2)>,
}

impl HostileState {
    /// A one-hit hostile with no bounty.
    #[must_use]
    pub const fn new(kind: HostileKind) -> Self {
        Self {
            kind,
            health: 1.0,
            bounty: 0.0,
            roam: None,
        }
    }

    /// Same hostile with a bounty.
    #[must_use]
    pub const fn with_bounty(mut self, bounty: f64) -> Self {
        self.bounty = bounty;
        self
    }

    /// Same hostile confined to a box.
    #[must_use]
    pub const fn roaming(mut self, min: Vec2, max: Vec2) -> Self {
        self.roam = Some((min, max));
        self
    }
}

/// What a pickup gives.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    /// River fuel depot
    FuelDepot,
    /// Roadside fuel station
    FuelStation,
    /// Energy fruit
    Fruit,
    /// Waiting passenger bound for a landing pad
    Passenger {
        /// Index of the destination pad
        destination: usize,
    },
}

/// Something the player collects by touching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupState {
    /// Kind tag
    pub kind: PickupKind,
    /// Resource granted (fuel, energy)
    pub amount: f64,
    /// Score granted
    pub bounty: f64,
}

/// Purely visual, expires after `lifetime` frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    /// Frames left
    pub lifetime: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_strict() {
        let a = Body::new(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0));
        let touching = Body::new(Vec2::new(20.0, 10.0), Vec2::new(10.0, 10.0));
        let inside = Body::new(Vec2::new(19.0, 12.0), Vec2::new(10.0, 10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn corners_from_centre() {
        let body = Body::new(Vec2::new(320.0, 380.0), Vec2::new(24.0, 32.0));
        assert_eq!(body.min(), Vec2::new(308.0, 364.0));
        assert_eq!(body.max(), Vec2::new(332.0, 396.0));
    }

    #[test]
    fn payloads_roundtrip_through_serde() {
        let hostile = HostileState::new(HostileKind::Pterosaur)
            .roaming(Vec2::new(0.0, 50.0), Vec2::new(800.0, 300.0));
        let json = serde_json::to_string(&hostile).unwrap();
        let back: HostileState = serde_json::from_str(&json).unwrap();
        assert_eq!(hostile, back);
    }
}
