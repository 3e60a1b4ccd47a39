//! Off-screen removal.

use glam::Vec2;

use crate::entity::EntityTag;
use crate::registry::EntityRegistry;

use super::{FrameContext, Resolver};

/// Marks every non-craft entity whose centre left `[min, max]`.
#[derive(Debug, Clone)]
pub struct CullResolver {
    min: Vec2,
    max: Vec2,
}

impl CullResolver {
    /// Cull outside the given box.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// A `width`×`height` screen with `margin` pixels of slack on every side.
    #[must_use]
    pub fn screen(width: f32, height: f32, margin: f32) -> Self {
        Self::new(Vec2::splat(-margin), Vec2::new(width + margin, height + margin))
    }
}

impl Resolver for CullResolver {
    fn name(&self) -> &'static str {
        "cull"
    }

    fn resolve(&self, _current: &EntityRegistry, next: &mut EntityRegistry, _ctx: &mut FrameContext<'_>) {
        let gone = next.query(|e| {
            let p = e.body().position;
            e.tag() != EntityTag::PlayerCraft
                && (p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y)
        });
        for id in gone {
            next.mark_despawn(id);
        }
    }
}
