//! Scrolling river shooter.
//!
//! The plane flies up a river whose banks drift with the scroll. Boats and
//! helicopters come downstream, fuel depots float with the current. Leaving
//! the river, ramming a hostile or running dry each cost a life; the plane
//! then reappears at its start point, briefly invulnerable and topped up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::course::{Course, Lane, RiverCourse};
use crate::entity::{
    Body, CraftState, Entity, EntityInner, EntityTag, HostileKind, HostileState, PickupKind, PickupState,
    ProjectileState,
};
use crate::error::{ensure_nonzero, ensure_positive, ensure_range, ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::gauge::{Drain, ResourceGauge};
use crate::intent::{InputState, Intent};
use crate::resolver::{
    CollisionResolver, CoursePolicy, CourseResolver, CullResolver, LaneSpan, MotionResolver, RiverPilot,
};
use crate::session::{LifeLoss, LossCause, Phase, Session};
use crate::simulation::FieldSimulation;
use crate::snapshot::{FieldSnapshot, Scenery, SessionSnapshot, Snapshot, WorldSnapshot};

use super::{lose_life, merged_input, Game, GameKind, Inbox};

/// River tuning. Speeds are in pixels per second, chances per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    /// Play area width
    pub width: f32,
    /// Play area height
    pub height: f32,
    /// Lives per run
    pub lives: u32,
    /// Plane speed on each axis
    pub craft_speed: f32,
    /// Plane side length
    pub craft_size: f32,
    /// Plane start row, measured up from the bottom edge
    pub craft_row: f32,
    /// Downstream speed of the river
    pub scroll_speed: f32,
    /// Bank geometry
    pub course: RiverCourse,
    /// Fuel capacity
    pub fuel_max: f64,
    /// Fuel burnt per second
    pub fuel_drain: f64,
    /// Bullet speed
    pub bullet_speed: f32,
    /// Bullet width and height
    pub bullet_size: Vec2,
    /// Frames between shots
    pub fire_repeat: u32,
    /// Base hostile spawn chance
    pub hostile_chance: f64,
    /// Extra spawn chance per point of difficulty
    pub hostile_chance_step: f64,
    /// Hostile side length
    pub hostile_size: f32,
    /// Slowest own speed of a hostile, on top of the current
    pub hostile_speed_min: f32,
    /// Fastest own speed of a hostile
    pub hostile_speed_max: f32,
    /// Score for a kill
    pub kill_score: f64,
    /// Fuel depot spawn chance
    pub depot_chance: f64,
    /// Fuel depot side length
    pub depot_size: f32,
    /// Fuel per depot
    pub depot_fuel: f64,
    /// Score per depot
    pub depot_score: f64,
    /// Score for every frame survived
    pub frame_score: f64,
    /// Frames between difficulty steps
    pub difficulty_every: u32,
    /// Difficulty added per step
    pub difficulty_step: f64,
    /// Invulnerable frames at the start of a run
    pub start_invulnerability: u32,
    /// Invulnerable frames after a lost life
    pub respawn_invulnerability: u32,
    /// Fuel added after a lost life
    pub respawn_fuel: f64,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            lives: 3,
            craft_speed: 300.0,
            craft_size: 16.0,
            craft_row: 100.0,
            scroll_speed: 120.0,
            course: RiverCourse::default(),
            fuel_max: 100.0,
            fuel_drain: 1.8,
            bullet_speed: 480.0,
            bullet_size: Vec2::new(2.0, 6.0),
            fire_repeat: 9,
            hostile_chance: 0.015,
            hostile_chance_step: 0.005,
            hostile_size: 20.0,
            hostile_speed_min: 30.0,
            hostile_speed_max: 60.0,
            kill_score: 100.0,
            depot_chance: 0.008,
            depot_size: 30.0,
            depot_fuel: 40.0,
            depot_score: 50.0,
            frame_score: 1.0,
            difficulty_every: 1000,
            difficulty_step: 0.1,
            start_invulnerability: 60,
            respawn_invulnerability: 120,
            respawn_fuel: 50.0,
        }
    }
}

impl RiverConfig {
    /// Same tuning with nothing spawning on its own.
    #[must_use]
    pub fn without_spawns(mut self) -> Self {
        self.hostile_chance = 0.0;
        self.hostile_chance_step = 0.0;
        self.depot_chance = 0.0;
        self
    }

    /// Same tuning with a different fuel burn rate.
    #[must_use]
    pub fn with_fuel_drain(mut self, per_second: f64) -> Self {
        self.fuel_drain = per_second;
        self
    }

    fn start_position(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height - self.craft_row)
    }
}

impl GameConfig for RiverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("width", f64::from(self.width))?;
        ensure_positive("height", f64::from(self.height))?;
        ensure_nonzero("lives", self.lives)?;
        ensure_positive("craft_size", f64::from(self.craft_size))?;
        ensure_positive("fuel_max", self.fuel_max)?;
        ensure_positive("course.segment_height", f64::from(self.course.segment_height))?;
        ensure_nonzero("fire_repeat", self.fire_repeat)?;
        ensure_nonzero("difficulty_every", self.difficulty_every)?;
        ensure_range("hostile_chance", self.hostile_chance, 0.0, 1.0)?;
        ensure_range("depot_chance", self.depot_chance, 0.0, 1.0)?;
        ensure_range(
            "hostile_speed_min",
            f64::from(self.hostile_speed_min),
            0.0,
            f64::from(self.hostile_speed_max),
        )?;
        Ok(())
    }
}

/// The river shooter.
#[derive(Debug)]
pub struct River {
    config: RiverConfig,
    sim: FieldSimulation,
    scroll: f32,
    difficulty: f64,
    flown: u64,
    session: Session,
    inbox: Inbox,
}

impl River {
    /// A game in the menu.
    #[must_use]
    pub fn new(config: RiverConfig, seed: u64) -> Self {
        let sim = FieldSimulation::new(seed)
            .with_resolver(RiverPilot {
                speed: config.craft_speed,
            })
            .with_resolver(MotionResolver::with_craft_bounds(
                Vec2::splat(config.craft_size * 0.5),
                Vec2::new(config.width, config.height) - config.craft_size * 0.5,
            ))
            .with_resolver(CollisionResolver::new())
            .with_resolver(CourseResolver::new(CoursePolicy::LoseLife, LaneSpan::Body))
            .with_resolver(CullResolver::screen(config.width, config.height, 50.0));
        let session =
            Session::new(config.lives, 0).with_gauge(ResourceGauge::new(config.fuel_max));
        let mut game = Self {
            inbox: Inbox::new(config.fire_repeat),
            config,
            sim,
            scroll: 0.0,
            difficulty: 1.0,
            flown: 0,
            session,
        };
        game.reset_world();
        game
    }

    /// Current spawn difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// The plane.
    #[must_use]
    pub fn craft(&self) -> Option<&Entity> {
        self.sim.registry().first_of(EntityTag::PlayerCraft)
    }

    fn reset_world(&mut self) {
        self.scroll = 0.0;
        self.difficulty = 1.0;
        self.flown = 0;
        let start = self.config.start_position();
        let registry = self.sim.registry_mut();
        registry.clear();
        registry.spawn(
            Body::new(start, Vec2::splat(self.config.craft_size)),
            EntityInner::Craft(CraftState {
                invulnerable_frames: self.config.start_invulnerability,
                ..CraftState::default()
            }),
        );
    }

    fn invulnerable(&self) -> bool {
        self.craft()
            .and_then(Entity::as_craft)
            .is_some_and(CraftState::is_invulnerable)
    }

    fn apply(&mut self, intent: &Intent, events: &mut EventLog) {
        let phase = self.session.phase();
        let event = match intent {
            Intent::ConfirmContinue if phase == Phase::Menu || phase.is_terminal() => Event::LevelLoaded { level: 1 },
            Intent::Restart if phase != Phase::Menu => Event::Restarted,
            _ => return,
        };
        self.session.start();
        self.reset_world();
        events.push(event);
    }

    fn fire(&mut self, events: &mut EventLog) {
        let Some(craft) = self.craft() else { return };
        let body = craft.body();
        let muzzle = Vec2::new(body.position.x, body.min().y - self.config.bullet_size.y * 0.5);
        let id = self.sim.registry_mut().spawn(
            Body::new(muzzle, self.config.bullet_size).moving(Vec2::new(0.0, -self.config.bullet_speed)),
            EntityInner::Projectile(ProjectileState::default()),
        );
        events.push(Event::Shot { id });
    }

    /// Spend a life, then put the plane back at its start point.
    fn crash(&mut self, cause: LossCause, events: &mut EventLog) {
        let loss = lose_life(&mut self.session, cause, events);
        if !matches!(loss, LifeLoss::Continue { .. } | LifeLoss::Respawning { .. }) {
            return;
        }
        if let Some(gauge) = self.session.gauge_mut() {
            gauge.refill(self.config.respawn_fuel);
        }
        let start = self.config.start_position();
        let frames = self.config.respawn_invulnerability;
        if let Some(craft) = self.sim.registry_mut().first_of_mut(EntityTag::PlayerCraft) {
            let body = craft.body_mut();
            body.position = start;
            body.velocity = Vec2::ZERO;
            if let Some(state) = craft.as_craft_mut() {
                state.invulnerable_frames = frames;
                state.off_course = false;
            }
        }
    }

    fn settle(&mut self, stepped: Vec<Event>, events: &mut EventLog) {
        let mut crashed = None;
        for event in stepped {
            match &event {
                Event::Destroyed { bounty, .. } => self.session.add_score(*bounty),
                Event::Rammed { .. } => {
                    crashed.get_or_insert(LossCause::Collision);
                }
                Event::OffCourse => {
                    crashed.get_or_insert(LossCause::OffCourse);
                }
                Event::PickedUp {
                    kind: PickupKind::FuelDepot,
                    amount,
                    bounty,
                    ..
                } => {
                    let added = self.session.gauge_mut().map_or(0.0, |g| g.refill(*amount));
                    self.session.add_score(*bounty);
                    events.push(event.clone());
                    events.push(Event::Refueled { amount: added });
                    continue;
                }
                _ => {}
            }
            events.push(event);
        }

        let burn = self.config.fuel_drain * f64::from(self.sim.dt());
        let drain = self.session.gauge_mut().map_or(Drain::Remaining, |g| g.drain(burn));
        if drain != Drain::Remaining && !self.invulnerable() {
            crashed.get_or_insert(LossCause::FuelDepleted);
        }
        if let Some(cause) = crashed {
            self.crash(cause, events);
        }
    }

    fn spawn(&mut self) {
        let chance = self.config.hostile_chance + self.config.hostile_chance_step * self.difficulty;
        let spawn_y = -self.config.depot_size.max(self.config.hostile_size) * 0.5;
        let Some(lane) = self.config.course.lane_at(spawn_y, self.scroll) else {
            return;
        };
        let config = &self.config;
        let (registry, rng) = self.sim.spawn_view();

        if rng.gen::<f64>() < chance {
            let x = spawn_x(rng, lane, config.hostile_size);
            let own = config.hostile_speed_min + (config.hostile_speed_max - config.hostile_speed_min) * rng.gen::<f32>();
            let kind = if rng.gen::<bool>() {
                HostileKind::Boat
            } else {
                HostileKind::Helicopter
            };
            registry.spawn(
                Body::new(Vec2::new(x, spawn_y), Vec2::splat(config.hostile_size))
                    .moving(Vec2::new(0.0, config.scroll_speed + own)),
                EntityInner::Hostile(HostileState::new(kind).with_bounty(config.kill_score)),
            );
        }
        if rng.gen::<f64>() < config.depot_chance {
            let x = spawn_x(rng, lane, config.depot_size);
            registry.spawn(
                Body::new(Vec2::new(x, spawn_y), Vec2::splat(config.depot_size))
                    .moving(Vec2::new(0.0, config.scroll_speed)),
                EntityInner::Pickup(PickupState {
                    kind: PickupKind::FuelDepot,
                    amount: config.depot_fuel,
                    bounty: config.depot_score,
                }),
            );
        }
    }
}

/// Column for a spawn of side `size`, kept clear of both banks.
fn spawn_x<R: Rng>(rng: &mut R, lane: Lane, size: f32) -> f32 {
    let left = lane.left + 20.0 + size * 0.5;
    let right = (lane.right - 40.0 + size * 0.5).max(left);
    left + (right - left) * rng.gen::<f32>()
}

impl Game for River {
    fn kind(&self) -> GameKind {
        GameKind::River
    }

    fn handle(&mut self, intent: Intent) {
        self.inbox.push(intent);
    }

    fn frame(&mut self, held: &InputState) -> Vec<Event> {
        let mut events = EventLog::new();
        let intents = self.inbox.begin_frame();
        for intent in &intents {
            self.apply(intent, &mut events);
        }
        if !self.session.is_playing() {
            return events.drain();
        }

        if intents.contains(&Intent::Shoot) || self.inbox.held_shot(held) {
            self.fire(&mut events);
        }
        let input = merged_input(held, &intents);
        self.scroll += self.config.scroll_speed * self.sim.dt();
        let stepped = self.sim.step(&input, &self.config.course, self.scroll);
        self.settle(stepped, &mut events);
        if !self.session.is_playing() {
            return events.drain();
        }

        self.session.add_score(self.config.frame_score);
        self.flown += 1;
        if self.flown % u64::from(self.config.difficulty_every) == 0 {
            self.difficulty += self.config.difficulty_step;
            tracing::debug!(difficulty = self.difficulty, "river difficulty");
        }
        self.spawn();
        events.drain()
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn snapshot(&self) -> Snapshot {
        let row = self.craft().map_or(self.config.start_position().y, |c| c.body().position.y);
        let lane = self
            .config
            .course
            .lane_at(row, self.scroll)
            .unwrap_or(Lane::new(0.0, self.config.width));
        Snapshot {
            game: GameKind::River,
            frame: self.inbox.frame(),
            tick: self.sim.tick(),
            session: SessionSnapshot::of(&self.session, "fuel", Vec::new()),
            world: WorldSnapshot::Field(FieldSnapshot {
                size: Vec2::new(self.config.width, self.config.height),
                scroll: self.scroll,
                entities: self.sim.registry().iter().cloned().collect(),
                scenery: Scenery::River {
                    lane,
                    difficulty: self.difficulty,
                },
            }),
        }
    }
}
