//! Lane departure.

use crate::entity::EntityTag;
use crate::event::Event;
use crate::registry::EntityRegistry;

use super::{FrameContext, Resolver};

/// Which part of the craft must stay inside the lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneSpan {
    /// The whole bounding box
    Body,
    /// Only the centre point
    Centre,
}

/// What leaving the lane does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoursePolicy {
    /// Flag the craft and emit [`Event::OffCourse`]; the game takes a life.
    /// Ignored while the craft is invulnerable.
    LoseLife,
    /// Push the craft back to the edge and slow it down.
    Clamp {
        /// Forward speed multiplier per frame off the road
        speed_factor: f32,
        /// Lateral velocity multiplier per frame off the road
        lateral_factor: f32,
        /// Share of lateral speed kept when bouncing off the edge
        bounce: f32,
    },
}

/// Checks the craft against the course lane at its screen row.
#[derive(Debug, Clone)]
pub struct CourseResolver {
    policy: CoursePolicy,
    span: LaneSpan,
}

impl CourseResolver {
    /// Resolver with the given policy and span.
    #[must_use]
    pub const fn new(policy: CoursePolicy, span: LaneSpan) -> Self {
        Self { policy, span }
    }

    /// Policy in use.
    #[must_use]
    pub const fn policy(&self) -> CoursePolicy {
        self.policy
    }
}

impl Resolver for CourseResolver {
    fn name(&self) -> &'static str {
        "course"
    }

    fn resolve(&self, current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let was_off = current
            .first_of(EntityTag::PlayerCraft)
            .and_then(|e| e.as_craft())
            .is_some_and(|c| c.off_course);
        let Some(craft) = next.first_of_mut(EntityTag::PlayerCraft) else {
            return;
        };
        let body = *craft.body();
        let Some(lane) = ctx.course.lane_at(body.position.y, ctx.scroll) else {
            return;
        };
        let (min, max) = match self.span {
            LaneSpan::Body => (body.min().x, body.max().x),
            LaneSpan::Centre => (body.position.x, body.position.x),
        };
        let inside = lane.contains_span(min, max);

        match self.policy {
            CoursePolicy::LoseLife => {
                let Some(state) = craft.as_craft_mut() else {
                    return;
                };
                if inside || state.is_invulnerable() {
                    state.off_course = false;
                    return;
                }
                state.off_course = true;
                ctx.events.push(Event::OffCourse);
            }
            CoursePolicy::Clamp {
                speed_factor,
                lateral_factor,
                bounce,
            } => {
                if inside {
                    if let Some(state) = craft.as_craft_mut() {
                        state.off_course = false;
                    }
                    return;
                }
                let half = (max - min) * 0.5;
                {
                    let body = craft.body_mut();
                    body.velocity.x *= lateral_factor;
                    if min < lane.left {
                        body.position.x = lane.left + half;
                        body.velocity.x = body.velocity.x.abs() * bounce;
                    } else if max > lane.right {
                        body.position.x = lane.right - half;
                        body.velocity.x = -body.velocity.x.abs() * bounce;
                    }
                }
                if let Some(state) = craft.as_craft_mut() {
                    state.speed *= speed_factor;
                    state.off_course = true;
                }
                if !was_off {
                    ctx.events.push(Event::OffCourse);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Environment, RiverCourse, RoadCourse};
    use crate::entity::{Body, CraftState, EntityInner};
    use crate::intent::InputState;
    use crate::resolver::test_support::run;
    use glam::Vec2;

    fn with_craft(at: Vec2, extent: Vec2, state: CraftState) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        registry.spawn(
            Body::new(at, extent).moving(Vec2::new(-120.0, 0.0)),
            EntityInner::Craft(state),
        );
        registry
    }

    fn craft_state(registry: &EntityRegistry) -> (Body, CraftState) {
        let e = registry.first_of(EntityTag::PlayerCraft).unwrap();
        (*e.body(), e.as_craft().unwrap().clone())
    }

    #[test]
    fn river_bank_flags_the_craft() {
        let resolver = CourseResolver::new(CoursePolicy::LoseLife, LaneSpan::Body);
        let registry = with_craft(Vec2::new(20.0, 500.0), Vec2::splat(16.0), CraftState::default());
        let (next, events) = run(&resolver, &registry, &InputState::IDLE, &RiverCourse::default());
        assert!(craft_state(&next).1.off_course);
        assert_eq!(events.as_slice(), &[Event::OffCourse]);
    }

    #[test]
    fn invulnerable_craft_may_cross_banks() {
        let resolver = CourseResolver::new(CoursePolicy::LoseLife, LaneSpan::Body);
        let state = CraftState {
            invulnerable_frames: 30,
            ..CraftState::default()
        };
        let registry = with_craft(Vec2::new(20.0, 500.0), Vec2::splat(16.0), state);
        let (next, events) = run(&resolver, &registry, &InputState::IDLE, &RiverCourse::default());
        assert!(!craft_state(&next).1.off_course);
        assert!(events.is_empty());
    }

    #[test]
    fn road_edge_clamps_and_bounces() {
        let resolver = CourseResolver::new(
            CoursePolicy::Clamp {
                speed_factor: 0.95,
                lateral_factor: 0.8,
                bounce: 0.5,
            },
            LaneSpan::Centre,
        );
        let state = CraftState {
            speed: 10.0,
            ..CraftState::default()
        };
        let registry = with_craft(Vec2::new(150.0, 380.0), Vec2::new(24.0, 32.0), state);
        let road = RoadCourse::new(Environment::Plains, 320.0);
        let (next, events) = run(&resolver, &registry, &InputState::IDLE, &road);

        let (body, craft) = craft_state(&next);
        assert!((body.position.x - 210.0).abs() < 1e-4);
        assert!((body.velocity.x - 48.0).abs() < 1e-3);
        assert!((craft.speed - 9.5).abs() < 1e-5);
        assert!(craft.off_course);
        assert_eq!(events.len(), 1);

        let mut still_off = next.clone();
        still_off.first_of_mut(EntityTag::PlayerCraft).unwrap().body_mut().position.x = 150.0;
        let (again, events) = run(&resolver, &still_off, &InputState::IDLE, &road);
        assert!(craft_state(&again).1.off_course);
        assert!(events.is_empty());
    }
}
