//! Ground contact for flying crafts.

use crate::entity::EntityTag;
use crate::event::Event;
use crate::registry::EntityRegistry;

use super::{FrameContext, Resolver};

/// Stops the craft on the course floor and punishes fast landings.
///
/// Speeds are in pixels per frame. A craft whose bottom edge reaches the
/// floor is snapped onto it with zero vertical velocity; if it arrived faster
/// than `safe_speed` it also loses `damage` health.
#[derive(Debug, Clone)]
pub struct TerrainResolver {
    safe_speed: f32,
    damage: f32,
}

impl TerrainResolver {
    /// Landing rule with the given threshold and penalty.
    #[must_use]
    pub const fn new(safe_speed: f32, damage: f32) -> Self {
        Self { safe_speed, damage }
    }
}

impl Resolver for TerrainResolver {
    fn name(&self) -> &'static str {
        "terrain"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let Some(craft) = next.first_of_mut(EntityTag::PlayerCraft) else {
            return;
        };
        let body = *craft.body();
        let Some(floor) = ctx.course.floor_at(body.position.x) else {
            return;
        };
        if body.max().y < floor {
            return;
        }
        let impact = body.velocity.y * ctx.dt;
        if impact.abs() > self.safe_speed {
            if let Some(state) = craft.as_craft_mut() {
                state.health -= self.damage;
            }
            ctx.events.push(Event::HardLanding { impact });
        }
        let body = craft.body_mut();
        body.position.y = floor - body.extent.y * 0.5;
        body.velocity.y = 0.0;
    }
}
