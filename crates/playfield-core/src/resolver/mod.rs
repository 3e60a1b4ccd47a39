//! Resolvers for the continuous-field simulation.
//!
//! A frame runs an ordered pipeline of resolvers over a double-buffered pair
//! of registries. Each resolver reads the pre-frame state from `current` and
//! writes into `next`.
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same registries, context and RNG state
//! - Resolvers iterate entities in id order
//! - Resolvers remove entities only through [`EntityRegistry::mark_despawn`];
//!   the simulation sweeps once after the whole pipeline ran
//! - A later resolver sees the writes of earlier ones in `next`
//!
//! # Available Resolvers
//!
//! - [`MotionResolver`]: integrates velocity, ticks timers, bounces roaming hostiles
//! - [`CollisionResolver`]: AABB category matrix between shots, hostiles, pickups and the craft
//! - [`CourseResolver`]: lane departure checks against the [`Course`]
//! - [`CullResolver`]: despawns entities that left the play area
//! - [`TerrainResolver`]: ground contact and hard landings
//! - [`RiverPilot`], [`RallyPilot`], [`HeliFlight`]: per-game craft handling

mod collision;
mod cull;
mod lane;
mod motion;
mod pilot;
mod terrain;

pub use collision::{CollisionResolver, PickupReach, RamPolicy};
pub use cull::CullResolver;
pub use lane::{CoursePolicy, CourseResolver, LaneSpan};
pub use motion::MotionResolver;
pub use pilot::{HeliFlight, RallyPilot, RiverPilot};
pub use terrain::TerrainResolver;

use rand_chacha::ChaCha8Rng;

use crate::course::Course;
use crate::event::EventLog;
use crate::intent::InputState;
use crate::registry::EntityRegistry;

/// Everything a resolver may consult besides the registries.
pub struct FrameContext<'a> {
    /// Frame being computed (the current registry's tick)
    pub tick: u64,
    /// Seconds per frame
    pub dt: f32,
    /// Keys held this frame
    pub input: &'a InputState,
    /// Lane and ground geometry
    pub course: &'a dyn Course,
    /// Pixels travelled so far
    pub scroll: f32,
    /// Events emitted this frame
    pub events: &'a mut EventLog,
    /// The simulation's RNG
    pub rng: &'a mut ChaCha8Rng,
}

impl std::fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("tick", &self.tick)
            .field("dt", &self.dt)
            .field("input", &self.input)
            .field("scroll", &self.scroll)
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

/// One stage of the field pipeline.
///
/// # Example
///
/// ```
/// use playfield_core::registry::EntityRegistry;
/// use playfield_core::resolver::{FrameContext, Resolver};
///
/// struct Freeze;
///
/// impl Resolver for Freeze {
///     fn name(&self) -> &'static str {
///         "freeze"
///     }
///
///     fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, _ctx: &mut FrameContext<'_>) {
///         for entity in next.iter_mut() {
///             entity.body_mut().velocity = glam::Vec2::ZERO;
///         }
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Apply this stage to `next`.
    fn resolve(&self, current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::course::OpenField;
    use rand::SeedableRng;

    /// Run one resolver on a copy of `registry` with an open course.
    pub(crate) fn run(
        resolver: &dyn Resolver,
        registry: &EntityRegistry,
        input: &InputState,
        course: &dyn Course,
    ) -> (EntityRegistry, EventLog) {
        let mut next = registry.clone();
        let mut events = EventLog::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ctx = FrameContext {
            tick: registry.current_tick(),
            dt: crate::FIXED_DT,
            input,
            course,
            scroll: 0.0,
            events: &mut events,
            rng: &mut rng,
        };
        resolver.resolve(registry, &mut next, &mut ctx);
        (next, events)
    }

    /// [`run`] with no input on an open field.
    pub(crate) fn run_idle(resolver: &dyn Resolver, registry: &EntityRegistry) -> (EntityRegistry, EventLog) {
        run(resolver, registry, &InputState::IDLE, &OpenField)
    }
}
