//! Category collision matrix.
//!
//! Pairs are tested with strict AABB overlap on the post-motion bodies in
//! `next`:
//!
//! | pair                 | effect                                           |
//! |----------------------|--------------------------------------------------|
//! | projectile ↔ hostile | hostile loses health, projectile removed         |
//! | craft ↔ hostile      | per [`RamPolicy`]                                |
//! | craft ↔ pickup       | pickup removed, [`Event::PickedUp`] emitted      |
//!
//! Session effects (score, lives, fuel) are applied by the game from the
//! emitted events.

use crate::entity::{EntityId, EntityTag};
use crate::event::Event;
use crate::registry::EntityRegistry;

use super::{FrameContext, Resolver};

/// What happens when the craft touches a hostile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RamPolicy {
    /// The first touching hostile is destroyed; the game takes a life.
    Destroy,
    /// Every touching hostile damages the craft and reverses its velocity.
    Bounce {
        /// Health removed per contact frame
        damage: f32,
        /// Velocity is multiplied by `-restitution`
        restitution: f32,
    },
    /// No effect.
    Ignore,
}

/// How close the craft must be to take a pickup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupReach {
    /// Boxes overlap
    Overlap,
    /// Centres closer than the radius
    Radius(f32),
    /// The game handles pickups itself
    Disabled,
}

/// Resolves contacts between entity categories.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    projectiles: bool,
    ram: RamPolicy,
    reach: PickupReach,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionResolver {
    /// Shots hit, rams destroy, pickups on overlap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            projectiles: true,
            ram: RamPolicy::Destroy,
            reach: PickupReach::Overlap,
        }
    }

    /// Same resolver with a different ram policy.
    #[must_use]
    pub const fn with_ram(mut self, ram: RamPolicy) -> Self {
        self.ram = ram;
        self
    }

    /// Same resolver with a different pickup reach.
    #[must_use]
    pub const fn with_reach(mut self, reach: PickupReach) -> Self {
        self.reach = reach;
        self
    }

    /// Same resolver without projectile hits.
    #[must_use]
    pub const fn without_projectiles(mut self) -> Self {
        self.projectiles = false;
        self
    }

    fn live(next: &EntityRegistry, tag: EntityTag) -> Vec<EntityId> {
        next.query(|e| e.tag() == tag && !next.is_doomed(e.id()))
    }

    fn resolve_projectiles(next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        for shot in Self::live(next, EntityTag::Projectile) {
            let Some((shot_body, damage)) = next
                .get(shot)
                .and_then(|e| e.as_projectile().map(|p| (*e.body(), p.damage)))
            else {
                continue;
            };
            let target = Self::live(next, EntityTag::Hostile)
                .into_iter()
                .find(|id| next.get(*id).is_some_and(|e| e.body().overlaps(&shot_body)));
            let Some(target) = target else { continue };

            next.mark_despawn(shot);
            ctx.events.push(Event::Hit {
                projectile: shot,
                target,
            });
            let destroyed = next.get_mut(target).and_then(|e| {
                let hostile = e.as_hostile_mut()?;
                hostile.health -= damage;
                (hostile.health <= 0.0).then(|| (hostile.kind, hostile.bounty))
            });
            if let Some((kind, bounty)) = destroyed {
                next.mark_despawn(target);
                ctx.events.push(Event::Destroyed {
                    id: target,
                    kind,
                    bounty,
                });
            }
        }
    }

    fn resolve_rams(&self, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let Some(craft) = next.first_of(EntityTag::PlayerCraft) else {
            return;
        };
        if craft.as_craft().is_some_and(|c| c.is_invulnerable()) {
            return;
        }
        let craft_id = craft.id();
        let craft_body = *craft.body();

        let touching: Vec<EntityId> = Self::live(next, EntityTag::Hostile)
            .into_iter()
            .filter(|id| next.get(*id).is_some_and(|e| e.body().overlaps(&craft_body)))
            .collect();

        for id in touching {
            let Some(kind) = next.get(id).and_then(|e| e.as_hostile()).map(|h| h.kind) else {
                continue;
            };
            match self.ram {
                RamPolicy::Destroy => {
                    next.mark_despawn(id);
                    ctx.events.push(Event::Rammed { id, kind });
                    break;
                }
                RamPolicy::Bounce {
                    damage,
                    restitution,
                } => {
                    if let Some(entity) = next.get_mut(craft_id) {
                        let body = entity.body_mut();
                        body.velocity *= -restitution;
                        if let Some(state) = entity.as_craft_mut() {
                            state.health -= damage;
                        }
                    }
                    ctx.events.push(Event::Rammed { id, kind });
                }
                RamPolicy::Ignore => break,
            }
        }
    }

    fn resolve_pickups(&self, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        let Some(craft) = next.first_of(EntityTag::PlayerCraft) else {
            return;
        };
        let craft_body = *craft.body();
        let reach = self.reach;

        let taken: Vec<EntityId> = Self::live(next, EntityTag::Pickup)
            .into_iter()
            .filter(|id| {
                next.get(*id).is_some_and(|e| match reach {
                    PickupReach::Overlap => e.body().overlaps(&craft_body),
                    PickupReach::Radius(r) => {
                        e.body().position.distance_squared(craft_body.position) < r * r
                    }
                    PickupReach::Disabled => false,
                })
            })
            .collect();

        for id in taken {
            let Some(pickup) = next.get(id).and_then(|e| e.as_pickup()).cloned() else {
                continue;
            };
            next.mark_despawn(id);
            ctx.events.push(Event::PickedUp {
                id,
                kind: pickup.kind,
                amount: pickup.amount,
                bounty: pickup.bounty,
            });
        }
    }
}

impl Resolver for CollisionResolver {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, ctx: &mut FrameContext<'_>) {
        if self.projectiles {
            Self::resolve_projectiles(next, ctx);
        }
        if self.ram != RamPolicy::Ignore {
            self.resolve_rams(next, ctx);
        }
        if self.reach != PickupReach::Disabled {
            self.resolve_pickups(next, ctx);
        }
    }
}
