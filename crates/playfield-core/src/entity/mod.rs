//! Field entities: identity, category tag and payload.
//!
//! - [`EntityId`]: stable identifier, monotonically assigned by the registry
//! - [`EntityTag`]: collision category
//! - [`EntityInner`]: type-safe payload, one variant per tag
//! - [`Entity`]: id + tag + [`Body`] + payload
//!
//! The tag and the payload variant always agree; [`EntityInner::tag`] derives
//! the one from the other.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use playfield_core::entity::{Body, Entity, EntityId, EntityInner, EntityTag, EffectState};
//!
//! let spark = Entity::new(
//!     EntityId::new(3),
//!     Body::new(Vec2::new(5.0, 5.0), Vec2::ONE),
//!     EntityInner::Effect(EffectState { lifetime: 30 }),
//! );
//!
//! assert_eq!(spark.tag(), EntityTag::Effect);
//! assert!(spark.as_craft().is_none());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    Body, CraftState, EffectState, HostileKind, HostileState, PickupKind, PickupState,
    ProjectileState,
};

/// Unique identifier for an entity.
///
/// Ids are ordered by value; the registry hands them out in increasing order,
/// so id order is spawn order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Wrap a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collision category of an entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// The player's craft
    PlayerCraft,
    /// A player shot
    Projectile,
    /// Enemy or obstacle
    Hostile,
    /// Fuel, fruit, passenger
    Pickup,
    /// Explosion or particle
    Effect,
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlayerCraft => "craft",
            Self::Projectile => "projectile",
            Self::Hostile => "hostile",
            Self::Pickup => "pickup",
            Self::Effect => "effect",
        };
        f.write_str(name)
    }
}

/// Kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player craft
    Craft(CraftState),
    /// Player shot
    Projectile(ProjectileState),
    /// Enemy or obstacle
    Hostile(HostileState),
    /// Collectible
    Pickup(PickupState),
    /// Visual effect
    Effect(EffectState),
}

impl EntityInner {
    /// Tag matching this payload.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Craft(_) => EntityTag::PlayerCraft,
            Self::Projectile(_) => EntityTag::Projectile,
            Self::Hostile(_) => EntityTag::Hostile,
            Self::Pickup(_) => EntityTag::Pickup,
            Self::Effect(_) => EntityTag::Effect,
        }
    }

    /// Short label for snapshots.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Craft(_) => "craft".to_string(),
            Self::Projectile(_) => "bullet".to_string(),
            Self::Hostile(h) => format!("{:?}", h.kind).to_lowercase(),
            Self::Pickup(p) => match p.kind {
                PickupKind::FuelDepot => "fuel_depot".to_string(),
                PickupKind::FuelStation => "fuel_station".to_string(),
                PickupKind::Fruit => "fruit".to_string(),
                PickupKind::Passenger { .. } => "passenger".to_string(),
            },
            Self::Effect(_) => "effect".to_string(),
        }
    }
}

/// A field entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    tag: EntityTag,
    body: Body,
    inner: EntityInner,
}

impl Entity {
    /// Build an entity; the tag is taken from the payload.
    #[must_use]
    pub const fn new(id: EntityId, body: Body, inner: EntityInner) -> Self {
        Self {
            id,
            tag: inner.tag(),
            body,
            inner,
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Collision category.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    /// Physical body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Mutable physical body.
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Payload.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Craft payload, if this is the player craft.
    #[must_use]
    pub const fn as_craft(&self) -> Option<&CraftState> {
        match &self.inner {
            EntityInner::Craft(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable craft payload.
    pub fn as_craft_mut(&mut self) -> Option<&mut CraftState> {
        match &mut self.inner {
            EntityInner::Craft(c) => Some(c),
            _ => None,
        }
    }

    /// Projectile payload.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileState> {
        match &self.inner {
            EntityInner::Projectile(p) => Some(p),
            _ => None,
        }
    }

    /// Hostile payload.
    #[must_use]
    pub const fn as_hostile(&self) -> Option<&HostileState> {
        match &self.inner {
            EntityInner::Hostile(h) => Some(h),
            _ => None,
        }
    }

    /// Mutable hostile payload.
    pub fn as_hostile_mut(&mut self) -> Option<&mut HostileState> {
        match &mut self.inner {
            EntityInner::Hostile(h) => Some(h),
            _ => None,
        }
    }

    /// Pickup payload.
    #[must_use]
    pub const fn as_pickup(&self) -> Option<&PickupState> {
        match &self.inner {
            EntityInner::Pickup(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable effect payload.
    pub fn as_effect_mut(&mut self) -> Option<&mut EffectState> {
        match &mut self.inner {
            EntityInner::Effect(e) => Some(e),
            _ => None,
        }
    }

    /// True for the player craft.
    #[must_use]
    pub const fn is_craft(&self) -> bool {
        matches!(self.tag, EntityTag::PlayerCraft)
    }
}
