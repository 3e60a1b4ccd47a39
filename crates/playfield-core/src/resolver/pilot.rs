//! Craft handling for each field game.
//!
//! Pilots run first in a pipeline: they turn held keys into craft velocity,
//! which [`MotionResolver`](super::MotionResolver) then integrates. Handling
//! constants are expressed per frame, as the games were tuned that way, and
//! converted to per-second velocities with `dt`.

use rand::Rng;

use crate::course::Environment;
use crate::entity::EntityTag;
use crate::registry::EntityRegistry;

use super::{FrameContext, Resolver};

// =============================================================================
// River
// =============================================================================

/// Direct eight-way steering at a fixed speed.
#[derive(Debug, Clone)]
pub struct RiverPilot {
    /// Pixels per second on each axis
    pub speed: f32,
}

impl Default for RiverPilot {
    fn default() -> Self {
        Self { speed: 300.0 }
    }
}

impl Resolver for RiverPilot {
    fn name(&self) -> &'static str {
        "river-pilot"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        if let Some(craft) = next.first_of_mut(EntityTag::PlayerCraft) {
            let body = craft.body_mut();
            body.velocity.x = ctx.input.horizontal() * self.speed;
            body.velocity.y = ctx.input.vertical() * self.speed;
        }
    }
}

// =============================================================================
// Rally
// =============================================================================

/// Car handling with surface-dependent grip.
///
/// The car stays on its screen row; everything else on the road moves down
/// at the car's speed.
#[derive(Debug, Clone)]
pub struct RallyPilot {
    /// Speed gained per frame at full grip
    pub acceleration: f32,
    /// Coasting loss per frame; braking removes twice this
    pub deceleration: f32,
    /// Top speed, px per frame
    pub max_speed: f32,
    /// Coasting never drops below this
    pub min_speed: f32,
    /// Lateral speed gained per frame at top speed and full grip
    pub turn_speed: f32,
    /// Lateral speed cap, px per frame
    pub max_lateral: f32,
}

impl Default for RallyPilot {
    fn default() -> Self {
        Self {
            acceleration: 0.5,
            deceleration: 0.3,
            max_speed: 12.0,
            min_speed: 3.0,
            turn_speed: 5.0,
            max_lateral: 15.0,
        }
    }
}

impl RallyPilot {
    fn throttle(&self, speed: f32, accelerate: bool, brake: bool, friction: f32) -> f32 {
        if accelerate {
            (speed + self.acceleration * friction).min(self.max_speed)
        } else if brake {
            (speed - self.deceleration * 2.0).max(0.0)
        } else {
            (speed - self.deceleration * 0.5).max(self.min_speed)
        }
    }

    /// Surface effects: ice and aquaplaning nudge the car sideways, grades
    /// and heat change its speed. Returns the new `(speed, lateral)`.
    fn surface<R: Rng>(
        &self,
        env: Environment,
        speed: f32,
        lateral: f32,
        scroll: f32,
        rng: &mut R,
    ) -> (f32, f32) {
        match env {
            Environment::Snow => {
                let roll: f64 = rng.gen();
                let nudge: f32 = rng.gen();
                if roll < 0.02 {
                    return (speed, lateral + (nudge - 0.5) * 3.0);
                }
            }
            Environment::Rain => {
                let roll: f64 = rng.gen();
                let nudge: f32 = rng.gen();
                if roll < 0.01 && speed > 8.0 {
                    return (speed, lateral + (nudge - 0.5) * 5.0);
                }
            }
            Environment::Mountain => {
                let grade = (scroll * 0.005).sin();
                let speed = if grade > 0.0 {
                    speed * 0.98
                } else {
                    (speed * 1.01).min(self.max_speed * 1.2)
                };
                return (speed, lateral);
            }
            Environment::Desert => {
                let distance = scroll / 10.0;
                if distance % 1000.0 < 100.0 && distance > 500.0 {
                    return (speed * 0.97, lateral);
                }
            }
            Environment::Plains | Environment::Forest | Environment::Coastal | Environment::Urban => {}
        }
        (speed, lateral)
    }
}

impl Resolver for RallyPilot {
    fn name(&self) -> &'static str {
        "rally-pilot"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let env = ctx.course.environment().unwrap_or(Environment::Plains);
        let friction = env.friction();
        let dt = ctx.dt;
        let input = *ctx.input;

        let Some(car) = next.first_of_mut(EntityTag::PlayerCraft) else {
            return;
        };
        let Some(speed) = car.as_craft().map(|c| c.speed) else {
            return;
        };
        let mut speed = self.throttle(
            speed,
            input.up || input.accelerate,
            input.down || input.brake,
            friction,
        );

        let mut lateral = car.body().velocity.x * dt;
        let turn = self.turn_speed * friction * (speed / self.max_speed);
        lateral += input.horizontal() * turn;
        lateral *= env.lateral_damping();
        (speed, lateral) = self.surface(env, speed, lateral, ctx.scroll, &mut *ctx.rng);
        lateral = lateral.clamp(-self.max_lateral, self.max_lateral);

        if let Some(state) = car.as_craft_mut() {
            state.speed = speed;
        }
        let body = car.body_mut();
        body.velocity.x = lateral / dt;
        body.velocity.y = 0.0;

        for entity in next.iter_mut() {
            if matches!(entity.tag(), EntityTag::Hostile | EntityTag::Pickup) {
                entity.body_mut().velocity.y = speed / dt;
            }
        }
    }
}

// =============================================================================
// Heli
// =============================================================================

/// Helicopter flight: gravity, vertical thrust, horizontal thrust with drag.
///
/// Fuel is the game's concern: it clears the thrust keys before the frame
/// when the tank is empty.
#[derive(Debug, Clone)]
pub struct HeliFlight {
    /// Downward acceleration, px per frame²
    pub gravity: f32,
    /// Upward acceleration while thrusting
    pub thrust: f32,
    /// Sideways acceleration while steering
    pub lateral: f32,
    /// Horizontal velocity retention per frame
    pub damping: f32,
}

impl Default for HeliFlight {
    fn default() -> Self {
        Self {
            gravity: 0.15,
            thrust: 0.3,
            lateral: 0.2,
            damping: 0.98,
        }
    }
}

impl Resolver for HeliFlight {
    fn name(&self) -> &'static str {
        "heli-flight"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let dt = ctx.dt;
        let Some(craft) = next.first_of_mut(EntityTag::PlayerCraft) else {
            return;
        };
        let body = craft.body_mut();
        let mut v = body.velocity * dt;
        v.y += self.gravity;
        if ctx.input.up {
            v.y -= self.thrust;
        }
        v.x += ctx.input.horizontal() * self.lateral;
        v.x *= self.damping;
        body.velocity = v / dt;
    }
}
