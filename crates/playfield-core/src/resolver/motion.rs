//! Motion integration.
//!
//! Every frame, in id order:
//! - `position += velocity * dt`
//! - roaming hostiles reverse a velocity component when outside their box
//! - the craft is clamped to its bounds, zeroing velocity on the clamped axis
//! - effect lifetimes and craft invulnerability count down

use glam::Vec2;

use crate::entity::EntityTag;
use crate::registry::EntityRegistry;

use super::{FrameContext, Resolver};

/// Integrates velocities and ticks per-entity timers.
#[derive(Debug, Clone)]
pub struct MotionResolver {
    craft_bounds: Option<(Vec2, Vec2)>,
}

impl Default for MotionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionResolver {
    /// Motion with an unbounded craft.
    #[must_use]
    pub const fn new() -> Self {
        Self { craft_bounds: None }
    }

    /// Keep the craft's centre inside `[min, max]`.
    #[must_use]
    pub const fn with_craft_bounds(min: Vec2, max: Vec2) -> Self {
        Self {
            craft_bounds: Some((min, max)),
        }
    }

    fn clamp_axis(position: &mut f32, velocity: &mut f32, min: f32, max: f32) {
        if *position < min {
            *position = min;
            *velocity = 0.0;
        } else if *position > max {
            *position = max;
            *velocity = 0.0;
        }
    }
}

impl Resolver for MotionResolver {
    fn name(&self) -> &'static str {
        "motion"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let dt = ctx.dt;
        let mut expired = Vec::new();

        for entity in next.iter_mut() {
            let id = entity.id();
            let velocity = entity.body().velocity;
            entity.body_mut().position += velocity * dt;

            match entity.tag() {
                EntityTag::Hostile => {
                    if let Some((min, max)) = entity.as_hostile().and_then(|h| h.roam) {
                        let body = entity.body_mut();
                        if body.position.x < min.x || body.position.x > max.x {
                            body.velocity.x = -body.velocity.x;
                        }
                        if body.position.y < min.y || body.position.y > max.y {
                            body.velocity.y = -body.velocity.y;
                        }
                    }
                }
                EntityTag::PlayerCraft => {
                    if let Some((min, max)) = self.craft_bounds {
                        let body = entity.body_mut();
                        Self::clamp_axis(&mut body.position.x, &mut body.velocity.x, min.x, max.x);
                        Self::clamp_axis(&mut body.position.y, &mut body.velocity.y, min.y, max.y);
                    }
                    if let Some(craft) = entity.as_craft_mut() {
                        craft.invulnerable_frames = craft.invulnerable_frames.saturating_sub(1);
                    }
                }
                EntityTag::Effect => {
                    if let Some(effect) = entity.as_effect_mut() {
                        effect.lifetime = effect.lifetime.saturating_sub(1);
                        if effect.lifetime == 0 {
                            expired.push(id);
                        }
                    }
                }
                EntityTag::Projectile | EntityTag::Pickup => {}
            }
        }

        for id in expired {
            next.mark_despawn(id);
        }
    }
}
