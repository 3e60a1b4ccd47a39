//! Double-buffered frame loop for the continuous-field games.
//!
//! Each [`FieldSimulation::step`]:
//!
//! 1. **COPY**: `next` is cloned from `current`
//! 2. **RESOLVE**: resolvers run in order, reading `current` and writing `next`
//! 3. **SWEEP**: entities marked for despawn are removed from `next`
//! 4. **APPLY**: the buffers swap and the tick advances
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use playfield_core::course::OpenField;
//! use playfield_core::entity::{Body, EntityInner, HostileKind, HostileState};
//! use playfield_core::intent::InputState;
//! use playfield_core::resolver::MotionResolver;
//! use playfield_core::simulation::FieldSimulation;
//!
//! let mut sim = FieldSimulation::new(7).with_resolver(MotionResolver::new());
//! let boat = sim.registry_mut().spawn(
//!     Body::new(Vec2::ZERO, Vec2::splat(20.0)).moving(Vec2::new(0.0, 60.0)),
//!     EntityInner::Hostile(HostileState::new(HostileKind::Boat)),
//! );
//!
//! for _ in 0..60 {
//!     sim.step(&InputState::IDLE, &OpenField, 0.0);
//! }
//!
//! assert_eq!(sim.tick(), 60);
//! let y = sim.registry().get(boat).unwrap().body().position.y;
//! assert!((y - 60.0).abs() < 1e-2);
//! ```

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::course::Course;
use crate::event::{Event, EventLog};
use crate::intent::InputState;
use crate::registry::EntityRegistry;
use crate::resolver::{FrameContext, Resolver};
use crate::FIXED_DT;

// =============================================================================
// FieldSimulation
// =============================================================================

/// Entity registry pair, resolver pipeline and RNG for one field session.
///
/// Games spawn between frames through [`registry_mut`](Self::registry_mut);
/// resolvers only move, damage and mark entities.
pub struct FieldSimulation {
    current: EntityRegistry,
    next: EntityRegistry,
    resolvers: Vec<Box<dyn Resolver>>,
    dt: f32,
    seed: u64,
    rng: Option<ChaCha8Rng>,
}

impl fmt::Debug for FieldSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSimulation")
            .field("current", &self.current)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("dt", &self.dt)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl FieldSimulation {
    /// Empty simulation with no resolvers, stepping at [`FIXED_DT`].
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            current: EntityRegistry::new(),
            next: EntityRegistry::new(),
            resolvers: Vec::new(),
            dt: FIXED_DT,
            seed,
            rng: Some(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Append a resolver to the pipeline.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Step length in seconds.
    #[must_use]
    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    /// Append a boxed resolver.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Advance one frame and return the events it produced.
    pub fn step(&mut self, input: &InputState, course: &dyn Course, scroll: f32) -> Vec<Event> {
        let tick = self.current.current_tick();
        let seed = self.seed;
        let rng = self.rng.get_or_insert_with(|| ChaCha8Rng::seed_from_u64(seed));
        let mut events = EventLog::new();

        self.next.clone_from(&self.current);
        {
            let mut ctx = FrameContext {
                tick,
                dt: self.dt,
                input,
                course,
                scroll,
                events: &mut events,
                rng,
            };
            for resolver in &self.resolvers {
                resolver.resolve(&self.current, &mut self.next, &mut ctx);
            }
        }
        let swept = self.next.sweep();

        std::mem::swap(&mut self.current, &mut self.next);
        self.current.advance_tick();

        tracing::trace!(tick, events = events.len(), swept = swept.len(), "field step");
        events.drain()
    }

    /// Settled entities.
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.current
    }

    /// Settled entities, for spawning and level setup between frames.
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.current
    }

    /// Frames stepped so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.current.current_tick()
    }

    /// Seed the RNG was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Step length in seconds.
    #[must_use]
    pub const fn dt(&self) -> f32 {
        self.dt
    }

    /// The simulation RNG, shared by resolvers and the game's spawners.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        let seed = self.seed;
        self.rng.get_or_insert_with(|| ChaCha8Rng::seed_from_u64(seed))
    }

    /// Split borrow of the registry and RNG, for spawners that need both.
    pub fn spawn_view(&mut self) -> (&mut EntityRegistry, &mut ChaCha8Rng) {
        let seed = self.seed;
        let rng = self.rng.get_or_insert_with(|| ChaCha8Rng::seed_from_u64(seed));
        (&mut self.current, rng)
    }

    /// Number of resolvers in the pipeline.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::OpenField;
    use crate::entity::{Body, EffectState, EntityInner, EntityTag, HostileKind, HostileState};
    use crate::resolver::{CullResolver, MotionResolver};
    use glam::Vec2;

    struct Marker;

    impl Resolver for Marker {
        fn name(&self) -> &'static str {
            "marker"
        }

        fn resolve(&self, current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
            // Reads see the pre-frame position, not the integrated one.
            for entity in current.iter() {
                if let Some(moved) = next.get(entity.id()) {
                    if moved.body().position != entity.body().position {
                        ctx.events.push(Event::Respawned);
                    }
                }
            }
        }
    }

    fn boat(registry: &mut EntityRegistry, y: f32) -> crate::entity::EntityId {
        registry.spawn(
            Body::new(Vec2::new(100.0, y), Vec2::splat(20.0)).moving(Vec2::new(0.0, 600.0)),
            EntityInner::Hostile(HostileState::new(HostileKind::Boat)),
        )
    }

    mod step_tests {
        use super::*;

        #[test]
        fn step_advances_tick() {
            let mut sim = FieldSimulation::new(1);
            sim.step(&InputState::IDLE, &OpenField, 0.0);
            sim.step(&InputState::IDLE, &OpenField, 0.0);
            assert_eq!(sim.tick(), 2);
            assert_eq!(sim.resolver_count(), 0);
        }

        #[test]
        fn later_resolvers_see_earlier_writes() {
            let mut sim = FieldSimulation::new(1)
                .with_resolver(MotionResolver::new())
                .with_resolver(Marker);
            boat(sim.registry_mut(), 0.0);
            let events = sim.step(&InputState::IDLE, &OpenField, 0.0);
            assert_eq!(events, vec![Event::Respawned]);
        }

        #[test]
        fn marked_entities_are_swept_after_the_pipeline() {
            let mut sim = FieldSimulation::new(1)
                .with_resolver(MotionResolver::new())
                .with_resolver(CullResolver::screen(800.0, 600.0, 50.0));
            let leaving = boat(sim.registry_mut(), 645.0);
            let staying = boat(sim.registry_mut(), 100.0);
            sim.registry_mut().spawn(
                Body::new(Vec2::ZERO, Vec2::ONE),
                EntityInner::Effect(EffectState { lifetime: 1 }),
            );

            sim.step(&InputState::IDLE, &OpenField, 0.0);
            assert!(sim.registry().get(leaving).is_none());
            assert!(sim.registry().get(staying).is_some());
            assert_eq!(sim.registry().count_of(EntityTag::Effect), 0);
        }
    }

    mod determinism_tests {
        use super::*;
        use rand::Rng;

        #[test]
        fn same_seed_same_stream() {
            let mut a = FieldSimulation::new(99);
            let mut b = FieldSimulation::new(99);
            let xs: Vec<u32> = (0..8).map(|_| a.rng_mut().gen()).collect();
            let ys: Vec<u32> = (0..8).map(|_| b.rng_mut().gen()).collect();
            assert_eq!(xs, ys);
        }
    }
}
