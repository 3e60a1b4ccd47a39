//! Read-only copies of game state for presentation and replay.
//!
//! A [`Snapshot`] is built by copying at the end of a frame. It owns its
//! data, so a renderer on another thread can hold it while the game keeps
//! stepping.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use strata::{Dialect, Dir, Grid, Pos};

use crate::convoy::Convoy;
use crate::course::{Environment, Lane};
use crate::entity::{Body, Entity, EntityInner, PickupKind};
use crate::games::GameKind;
use crate::gauge::ResourceGauge;
use crate::session::{Phase, Session};

/// One named gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeReading {
    /// `fuel`, `energy`, `health`
    pub name: String,
    /// Current level
    pub value: f64,
    /// Capacity
    pub max: f64,
}

impl GaugeReading {
    /// Reading of a gauge.
    #[must_use]
    pub fn of(name: &str, gauge: &ResourceGauge) -> Self {
        Self {
            name: name.to_string(),
            value: gauge.value(),
            max: gauge.max(),
        }
    }
}

/// Progress and resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Phase
    pub phase: Phase,
    /// Score
    pub score: f64,
    /// Lives left
    pub lives: u32,
    /// One-based level or stage
    pub level: u32,
    /// Accepted moves this level
    pub moves: u32,
    /// Accepted pushes this level
    pub pushes: u32,
    /// Items collected this level
    pub collected: u32,
    /// Resource gauges, primary first
    pub gauges: Vec<GaugeReading>,
}

impl SessionSnapshot {
    /// Copy a session, with the primary gauge under `primary` followed by `extra`.
    #[must_use]
    pub fn of(session: &Session, primary: &str, extra: Vec<GaugeReading>) -> Self {
        let mut gauges: Vec<GaugeReading> = session
            .gauge()
            .map(|g| GaugeReading::of(primary, g))
            .into_iter()
            .collect();
        gauges.extend(extra);
        Self {
            phase: session.phase(),
            score: session.score(),
            lives: session.lives(),
            level: session.level(),
            moves: session.moves(),
            pushes: session.pushes(),
            collected: session.collected(),
            gauges,
        }
    }

    /// True once the run is won or lost.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Gauge by name.
    #[must_use]
    pub fn gauge(&self, name: &str) -> Option<&GaugeReading> {
        self.gauges.iter().find(|g| g.name == name)
    }
}

/// Tile world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Settled grid
    pub grid: Grid,
    /// Glyph set for rendering
    pub dialect: Dialect,
    /// Player or locomotive cell, `None` while dead
    pub player: Option<Pos>,
    /// Last move direction
    pub facing: Dir,
    /// Train, for the convoy game
    pub convoy: Option<Convoy>,
    /// Collectibles needed to open the exit
    pub threshold: Option<u32>,
    /// Undo entries available
    pub undo_depth: usize,
}

impl GridSnapshot {
    /// Text rows, with the convoy's cars drawn as `=`.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        let mut rows: Vec<Vec<char>> = self
            .dialect
            .render(&self.grid)
            .into_iter()
            .map(|r| r.chars().collect())
            .collect();
        if let Some(convoy) = &self.convoy {
            for car in convoy.cars() {
                let (Ok(x), Ok(y)) = (usize::try_from(car.x), usize::try_from(car.y)) else {
                    continue;
                };
                if let Some(cell) = rows.get_mut(y).and_then(|r| r.get_mut(x)) {
                    *cell = '=';
                }
            }
        }
        rows.into_iter().map(|r| r.into_iter().collect()).collect()
    }
}

/// Per-game scenery around the entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scenery {
    /// River banks at the craft's row
    River {
        /// Lane at the craft
        lane: Lane,
        /// Current spawn difficulty
        difficulty: f64,
    },
    /// Road and stage progress
    Road {
        /// Lane at the car
        lane: Lane,
        /// Surface
        environment: Environment,
        /// Stage name
        stage: String,
        /// Stage abbreviation
        abbreviation: String,
        /// Distance driven in this stage
        travelled: f64,
        /// Stage length
        length: f64,
    },
    /// Ground polyline and landing pads
    Terrain {
        /// Ground points
        ground: Vec<Vec2>,
        /// Landing pads
        pads: Vec<Body>,
        /// Fuel station
        station: Body,
        /// Destination of the passenger on board
        carrying: Option<usize>,
        /// Passengers delivered this level
        delivered: usize,
    },
}

/// Continuous world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// Play area size
    pub size: Vec2,
    /// Pixels travelled
    pub scroll: f32,
    /// Every entity, in id order
    pub entities: Vec<Entity>,
    /// Game-specific scenery
    pub scenery: Scenery,
}

/// The world half of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldSnapshot {
    /// Tile games
    Grid(GridSnapshot),
    /// Scrolling and flying games
    Field(FieldSnapshot),
}

/// Everything a presentation layer may show after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Which game
    pub game: GameKind,
    /// Frames driven so far
    pub frame: u64,
    /// Simulation ticks (gravity ticks or field steps)
    pub tick: u64,
    /// Progress
    pub session: SessionSnapshot,
    /// World
    pub world: WorldSnapshot,
}

impl Snapshot {
    /// The grid world, if this is a tile game.
    #[must_use]
    pub const fn grid(&self) -> Option<&GridSnapshot> {
        match &self.world {
            WorldSnapshot::Grid(grid) => Some(grid),
            WorldSnapshot::Field(_) => None,
        }
    }

    /// The field world, if this is a continuous game.
    #[must_use]
    pub const fn field(&self) -> Option<&FieldSnapshot> {
        match &self.world {
            WorldSnapshot::Field(field) => Some(field),
            WorldSnapshot::Grid(_) => None,
        }
    }
}

// =============================================================================
// Hashing
// =============================================================================

fn hash_vec2(v: Vec2, hasher: &mut impl Hasher) {
    v.x.to_bits().hash(hasher);
    v.y.to_bits().hash(hasher);
}

fn hash_body(body: &Body, hasher: &mut impl Hasher) {
    hash_vec2(body.position, hasher);
    hash_vec2(body.velocity, hasher);
    hash_vec2(body.extent, hasher);
}

fn hash_inner(inner: &EntityInner, hasher: &mut impl Hasher) {
    match inner {
        EntityInner::Craft(c) => {
            c.health.to_bits().hash(hasher);
            c.invulnerable_frames.hash(hasher);
            c.speed.to_bits().hash(hasher);
            c.off_course.hash(hasher);
        }
        EntityInner::Projectile(p) => p.damage.to_bits().hash(hasher),
        EntityInner::Hostile(h) => {
            h.kind.hash(hasher);
            h.health.to_bits().hash(hasher);
            h.bounty.to_bits().hash(hasher);
        }
        EntityInner::Pickup(p) => {
            match p.kind {
                PickupKind::Passenger { destination } => destination.hash(hasher),
                other => std::mem::discriminant(&other).hash(hasher),
            }
            p.amount.to_bits().hash(hasher);
            p.bounty.to_bits().hash(hasher);
        }
        EntityInner::Effect(e) => e.lifetime.hash(hasher),
    }
}

/// Deterministic digest of a snapshot. Floats are hashed by bit pattern.
#[must_use]
pub fn hash_snapshot(snapshot: &Snapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    snapshot.game.hash(&mut hasher);
    snapshot.frame.hash(&mut hasher);
    snapshot.tick.hash(&mut hasher);

    let session = &snapshot.session;
    session.phase.hash(&mut hasher);
    session.score.to_bits().hash(&mut hasher);
    session.lives.hash(&mut hasher);
    session.level.hash(&mut hasher);
    session.moves.hash(&mut hasher);
    session.pushes.hash(&mut hasher);
    session.collected.hash(&mut hasher);
    for gauge in &session.gauges {
        gauge.name.hash(&mut hasher);
        gauge.value.to_bits().hash(&mut hasher);
    }

    match &snapshot.world {
        WorldSnapshot::Grid(grid) => {
            grid.grid.hash(&mut hasher);
            grid.player.hash(&mut hasher);
            grid.facing.hash(&mut hasher);
            grid.convoy.hash(&mut hasher);
        }
        WorldSnapshot::Field(field) => {
            field.scroll.to_bits().hash(&mut hasher);
            for entity in &field.entities {
                entity.id().hash(&mut hasher);
                entity.tag().hash(&mut hasher);
                hash_body(entity.body(), &mut hasher);
                hash_inner(entity.inner(), &mut hasher);
            }
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CraftState, EntityId};

    fn field_snapshot(x: f32) -> Snapshot {
        let craft = Entity::new(
            EntityId::new(0),
            Body::new(Vec2::new(x, 500.0), Vec2::splat(16.0)),
            EntityInner::Craft(CraftState::default()),
        );
        Snapshot {
            game: GameKind::River,
            frame: 10,
            tick: 10,
            session: SessionSnapshot {
                phase: Phase::Playing,
                score: 10.0,
                lives: 3,
                level: 1,
                moves: 0,
                pushes: 0,
                collected: 0,
                gauges: vec![GaugeReading {
                    name: "fuel".to_string(),
                    value: 99.7,
                    max: 100.0,
                }],
            },
            world: WorldSnapshot::Field(FieldSnapshot {
                size: Vec2::new(800.0, 600.0),
                scroll: 20.0,
                entities: vec![craft],
                scenery: Scenery::River {
                    lane: Lane::new(100.0, 700.0),
                    difficulty: 1.0,
                },
            }),
        }
    }

    #[test]
    fn equal_snapshots_hash_equal() {
        assert_eq!(hash_snapshot(&field_snapshot(400.0)), hash_snapshot(&field_snapshot(400.0)));
        assert_ne!(hash_snapshot(&field_snapshot(400.0)), hash_snapshot(&field_snapshot(400.5)));
    }

    #[test]
    fn snapshot_survives_json() {
        let snapshot = field_snapshot(400.0);
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert_eq!(back.session.gauge("fuel").map(|g| g.value), Some(99.7));
        assert!(back.grid().is_none());
    }

    #[test]
    fn convoy_cars_render_over_the_grid() {
        let mut grid = Grid::bordered(6, 4);
        grid.set(Pos::new(3, 1), strata::CellKind::PlayerMarker);
        let mut convoy = Convoy::new(Pos::new(2, 1), Dir::Right);
        convoy.advance(Dir::Right, true);
        let snapshot = GridSnapshot {
            grid,
            dialect: Dialect::Railway,
            player: Some(Pos::new(3, 1)),
            facing: Dir::Right,
            convoy: Some(convoy),
            threshold: None,
            undo_depth: 0,
        };
        assert_eq!(snapshot.rows()[1], "# =@ #");
    }
}
