//! Entity registry for the continuous-field games.
//!
//! The registry owns every field entity. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Monotonic id assignment, so id order is spawn order
//! - Deferred removal: resolvers mark entities, the frame sweeps them once
//! - Radius queries for proximity pickups
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use playfield_core::entity::{Body, CraftState, EntityInner, EntityTag};
//! use playfield_core::registry::EntityRegistry;
//!
//! let mut registry = EntityRegistry::new();
//! let craft = registry.spawn(
//!     Body::new(Vec2::new(400.0, 500.0), Vec2::splat(16.0)),
//!     EntityInner::Craft(CraftState::default()),
//! );
//!
//! assert_eq!(registry.first_of(EntityTag::PlayerCraft).map(|e| e.id()), Some(craft));
//! assert_eq!(registry.query_radius(Vec2::new(400.0, 510.0), 20.0), vec![craft]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{Body, Entity, EntityId, EntityInner, EntityTag};

/// Container for all field entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRegistry {
    next_id: u64,
    entities: BTreeMap<EntityId, Entity>,
    #[serde(default)]
    doomed: BTreeSet<EntityId>,
    tick: u64,
}

impl EntityRegistry {
    /// An empty registry at tick zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Add an entity and return its id.
    pub fn spawn(&mut self, body: Body, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, body, inner));
        id
    }

    /// Remove an entity immediately.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.doomed.remove(&id);
        self.entities.remove(&id)
    }

    /// Schedule removal at the next [`sweep`](Self::sweep). Returns false if
    /// the entity is unknown or already scheduled.
    pub fn mark_despawn(&mut self, id: EntityId) -> bool {
        self.entities.contains_key(&id) && self.doomed.insert(id)
    }

    /// True if `id` is scheduled for removal.
    #[must_use]
    pub fn is_doomed(&self, id: EntityId) -> bool {
        self.doomed.contains(&id)
    }

    /// Remove every scheduled entity, in id order.
    pub fn sweep(&mut self) -> Vec<Entity> {
        let doomed = std::mem::take(&mut self.doomed);
        doomed
            .into_iter()
            .filter_map(|id| self.entities.remove(&id))
            .collect()
    }

    /// Remove all entities. Id assignment continues from where it was.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.doomed.clear();
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Look up an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up an entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// All entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// All entities in id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Visit every entity in id order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&Entity),
    {
        for entity in self.entities.values() {
            visit(entity);
        }
    }

    /// Ids of entities with `tag`, in id order.
    #[must_use]
    pub fn ids_of(&self, tag: EntityTag) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.tag() == tag)
            .map(Entity::id)
            .collect()
    }

    /// Ids of entities matching `pred`, in id order.
    pub fn query<F>(&self, pred: F) -> Vec<EntityId>
    where
        F: Fn(&Entity) -> bool,
    {
        self.entities
            .values()
            .filter(|e| pred(e))
            .map(Entity::id)
            .collect()
    }

    /// Ids of entities whose centre lies strictly within `radius` of `center`,
    /// sorted by id.
    #[must_use]
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        let radius_sq = radius * radius;
        self.entities
            .values()
            .filter(|e| e.body().position.distance_squared(center) < radius_sq)
            .map(Entity::id)
            .collect()
    }

    /// The lowest-id entity with `tag`.
    #[must_use]
    pub fn first_of(&self, tag: EntityTag) -> Option<&Entity> {
        self.entities.values().find(|e| e.tag() == tag)
    }

    /// The lowest-id entity with `tag`, mutably.
    pub fn first_of_mut(&mut self, tag: EntityTag) -> Option<&mut Entity> {
        self.entities.values_mut().find(|e| e.tag() == tag)
    }

    /// Number of entities with `tag`.
    #[must_use]
    pub fn count_of(&self, tag: EntityTag) -> usize {
        self.entities.values().filter(|e| e.tag() == tag).count()
    }

    /// Total entity count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entities exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Frames advanced so far.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advance the frame counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}
