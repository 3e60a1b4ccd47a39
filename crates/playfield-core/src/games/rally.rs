//! Cross-country driving.
//!
//! The car holds its screen row while the road scrolls under it. Each stage
//! is a state with its own surface and length; covering the length pays a
//! bonus, tops up the tank and moves on to the next state. Finishing the
//! last state wins the run.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::course::{Course, Environment, Lane, RoadCourse};
use crate::entity::{Body, CraftState, Entity, EntityInner, EntityTag, HostileKind, HostileState, PickupKind, PickupState};
use crate::error::{ensure_nonzero, ensure_positive, ensure_range, ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::gauge::{Drain, ResourceGauge};
use crate::intent::{InputState, Intent};
use crate::resolver::{
    CollisionResolver, CoursePolicy, CourseResolver, CullResolver, LaneSpan, MotionResolver, PickupReach, RallyPilot,
};
use crate::session::{LifeLoss, LossCause, Phase, Session};
use crate::simulation::FieldSimulation;
use crate::snapshot::{FieldSnapshot, Scenery, SessionSnapshot, Snapshot, WorldSnapshot};

use super::{lose_life, merged_input, Game, GameKind, Inbox};

/// One leg of the route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    /// State name
    pub name: &'static str,
    /// Two-letter abbreviation
    pub abbreviation: &'static str,
    /// Road surface
    pub environment: Environment,
    /// Difficulty rating, scales the completion bonus
    pub difficulty: u32,
    /// Length in km
    pub distance: f64,
}

impl Stage {
    const fn new(
        name: &'static str,
        abbreviation: &'static str,
        environment: Environment,
        difficulty: u32,
        distance: f64,
    ) -> Self {
        Self {
            name,
            abbreviation,
            environment,
            difficulty,
            distance,
        }
    }
}

/// The route, west coast first.
pub const STAGES: [Stage; 50] = [
    Stage::new("California", "CA", Environment::Coastal, 1, 500.0),
    Stage::new("Nevada", "NV", Environment::Desert, 2, 600.0),
    Stage::new("Arizona", "AZ", Environment::Desert, 3, 550.0),
    Stage::new("Utah", "UT", Environment::Mountain, 4, 500.0),
    Stage::new("Colorado", "CO", Environment::Mountain, 5, 600.0),
    Stage::new("Wyoming", "WY", Environment::Mountain, 4, 550.0),
    Stage::new("Montana", "MT", Environment::Snow, 5, 700.0),
    Stage::new("Idaho", "ID", Environment::Forest, 3, 500.0),
    Stage::new("Washington", "WA", Environment::Forest, 4, 450.0),
    Stage::new("Oregon", "OR", Environment::Forest, 3, 500.0),
    Stage::new("North Dakota", "ND", Environment::Snow, 4, 600.0),
    Stage::new("South Dakota", "SD", Environment::Plains, 2, 550.0),
    Stage::new("Nebraska", "NE", Environment::Plains, 2, 600.0),
    Stage::new("Kansas", "KS", Environment::Plains, 2, 650.0),
    Stage::new("Oklahoma", "OK", Environment::Plains, 3, 550.0),
    Stage::new("Texas", "TX", Environment::Desert, 4, 900.0),
    Stage::new("New Mexico", "NM", Environment::Desert, 3, 550.0),
    Stage::new("Louisiana", "LA", Environment::Rain, 4, 500.0),
    Stage::new("Mississippi", "MS", Environment::Rain, 3, 450.0),
    Stage::new("Alabama", "AL", Environment::Rain, 3, 400.0),
    Stage::new("Florida", "FL", Environment::Rain, 5, 700.0),
    Stage::new("Georgia", "GA", Environment::Rain, 3, 500.0),
    Stage::new("South Carolina", "SC", Environment::Rain, 2, 350.0),
    Stage::new("North Carolina", "NC", Environment::Forest, 3, 450.0),
    Stage::new("Tennessee", "TN", Environment::Forest, 3, 500.0),
    Stage::new("Kentucky", "KY", Environment::Plains, 2, 400.0),
    Stage::new("Virginia", "VA", Environment::Forest, 3, 450.0),
    Stage::new("West Virginia", "WV", Environment::Mountain, 4, 400.0),
    Stage::new("Maryland", "MD", Environment::Coastal, 2, 300.0),
    Stage::new("Delaware", "DE", Environment::Coastal, 1, 150.0),
    Stage::new("Pennsylvania", "PA", Environment::Forest, 3, 500.0),
    Stage::new("New Jersey", "NJ", Environment::Coastal, 4, 250.0),
    Stage::new("New York", "NY", Environment::Urban, 5, 600.0),
    Stage::new("Connecticut", "CT", Environment::Coastal, 2, 200.0),
    Stage::new("Rhode Island", "RI", Environment::Coastal, 1, 100.0),
    Stage::new("Massachusetts", "MA", Environment::Coastal, 3, 300.0),
    Stage::new("Vermont", "VT", Environment::Snow, 4, 350.0),
    Stage::new("New Hampshire", "NH", Environment::Snow, 3, 300.0),
    Stage::new("Maine", "ME", Environment::Snow, 4, 450.0),
    Stage::new("Ohio", "OH", Environment::Plains, 2, 500.0),
    Stage::new("Indiana", "IN", Environment::Plains, 2, 400.0),
    Stage::new("Illinois", "IL", Environment::Plains, 3, 550.0),
    Stage::new("Michigan", "MI", Environment::Snow, 4, 600.0),
    Stage::new("Wisconsin", "WI", Environment::Snow, 3, 500.0),
    Stage::new("Minnesota", "MN", Environment::Snow, 5, 600.0),
    Stage::new("Iowa", "IA", Environment::Plains, 2, 500.0),
    Stage::new("Missouri", "MO", Environment::Plains, 2, 450.0),
    Stage::new("Arkansas", "AR", Environment::Forest, 3, 400.0),
    Stage::new("Alaska", "AK", Environment::Snow, 10, 800.0),
    Stage::new("Hawaii", "HI", Environment::Coastal, 1, 200.0),
];

/// Rally tuning. Handling values are per frame, as the car was tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RallyConfig {
    /// Play area width
    pub width: f32,
    /// Play area height
    pub height: f32,
    /// Lives per run
    pub lives: u32,
    /// Car width and height
    pub car_size: Vec2,
    /// Car centre on screen
    pub car_position: Vec2,
    /// Speed at the start of a run, px per frame
    pub start_speed: f32,
    /// Speed gained per frame at full grip
    pub acceleration: f32,
    /// Coasting loss per frame; braking removes twice this
    pub deceleration: f32,
    /// Top speed, px per frame
    pub max_speed: f32,
    /// Coasting floor, px per frame
    pub min_speed: f32,
    /// Lateral speed gained per frame at top speed
    pub turn_speed: f32,
    /// Lateral speed cap, px per frame
    pub max_lateral: f32,
    /// Speed multiplier per frame off the road
    pub off_road_speed: f32,
    /// Lateral multiplier per frame off the road
    pub off_road_lateral: f32,
    /// Share of lateral speed kept bouncing off the edge
    pub off_road_bounce: f32,
    /// Distance credited per pixel scrolled, km
    pub km_per_pixel: f64,
    /// Fuel capacity
    pub fuel_max: f64,
    /// Fuel per second at a standstill
    pub fuel_base: f64,
    /// Extra fuel per second for each px per frame of speed
    pub fuel_per_speed: f64,
    /// Fuel multiplier while off the road
    pub off_road_fuel: f64,
    /// Multiplier on each surface's traffic density
    pub traffic_scale: f64,
    /// Obstacle width and height
    pub obstacle_size: Vec2,
    /// Fuel station spawn chance per frame
    pub station_chance: f64,
    /// Stations only appear below this much fuel
    pub station_below: f64,
    /// Fuel per station
    pub station_fuel: f64,
    /// Score per station
    pub station_score: f64,
    /// Pickup distance for stations
    pub station_reach: f32,
    /// Speed above which the per-frame score gets a bonus
    pub fast_speed: f32,
    /// Per-frame bonus above `fast_speed`
    pub fast_bonus: f64,
    /// Base bonus per finished stage
    pub stage_bonus: f64,
    /// Extra bonus per point of stage difficulty
    pub stage_bonus_step: f64,
    /// Fuel added per finished stage
    pub stage_fuel: f64,
    /// Invulnerable frames after a crash
    pub hit_invulnerability: u32,
    /// Speed multiplier after a crash
    pub hit_speed_factor: f32,
    /// Index into [`STAGES`] where a run starts
    pub first_stage: usize,
}

impl Default for RallyConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            lives: 3,
            car_size: Vec2::new(24.0, 32.0),
            car_position: Vec2::new(320.0, 380.0),
            start_speed: 5.0,
            acceleration: 0.5,
            deceleration: 0.3,
            max_speed: 12.0,
            min_speed: 3.0,
            turn_speed: 5.0,
            max_lateral: 15.0,
            off_road_speed: 0.95,
            off_road_lateral: 0.8,
            off_road_bounce: 0.5,
            km_per_pixel: 0.1,
            fuel_max: 100.0,
            fuel_base: 0.1,
            fuel_per_speed: 0.01,
            off_road_fuel: 2.0,
            traffic_scale: 1.0,
            obstacle_size: Vec2::new(28.0, 40.0),
            station_chance: 0.0015,
            station_below: 70.0,
            station_fuel: 50.0,
            station_score: 100.0,
            station_reach: 40.0,
            fast_speed: 10.0,
            fast_bonus: 5.0,
            stage_bonus: 1000.0,
            stage_bonus_step: 200.0,
            stage_fuel: 30.0,
            hit_invulnerability: 120,
            hit_speed_factor: 0.5,
            first_stage: 0,
        }
    }
}

impl RallyConfig {
    /// Same tuning with empty roads.
    #[must_use]
    pub fn without_traffic(mut self) -> Self {
        self.traffic_scale = 0.0;
        self.station_chance = 0.0;
        self
    }

    /// Same tuning starting at stage `index`.
    #[must_use]
    pub fn starting_at(mut self, index: usize) -> Self {
        self.first_stage = index;
        self
    }

    fn pilot(&self) -> RallyPilot {
        RallyPilot {
            acceleration: self.acceleration,
            deceleration: self.deceleration,
            max_speed: self.max_speed,
            min_speed: self.min_speed,
            turn_speed: self.turn_speed,
            max_lateral: self.max_lateral,
        }
    }
}

impl GameConfig for RallyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("width", f64::from(self.width))?;
        ensure_positive("height", f64::from(self.height))?;
        ensure_nonzero("lives", self.lives)?;
        ensure_positive("max_speed", f64::from(self.max_speed))?;
        ensure_range("min_speed", f64::from(self.min_speed), 0.0, f64::from(self.max_speed))?;
        ensure_positive("fuel_max", self.fuel_max)?;
        ensure_positive("km_per_pixel", self.km_per_pixel)?;
        ensure_range("station_chance", self.station_chance, 0.0, 1.0)?;
        ensure_range("off_road_speed", f64::from(self.off_road_speed), 0.0, 1.0)?;
        #[allow(clippy::cast_precision_loss)]
        ensure_range("first_stage", self.first_stage as f64, 0.0, (STAGES.len() - 1) as f64)?;
        Ok(())
    }
}

/// The driving game.
#[derive(Debug)]
pub struct Rally {
    config: RallyConfig,
    sim: FieldSimulation,
    course: RoadCourse,
    stage: usize,
    scroll: f32,
    distance: f64,
    travelled: f64,
    session: Session,
    inbox: Inbox,
}

impl Rally {
    /// A game in the menu.
    #[must_use]
    pub fn new(config: RallyConfig, seed: u64) -> Self {
        let (w, h) = (config.width, config.height);
        let sim = FieldSimulation::new(seed)
            .with_resolver(config.pilot())
            .with_resolver(MotionResolver::new())
            .with_resolver(
                CollisionResolver::new()
                    .without_projectiles()
                    .with_reach(PickupReach::Radius(config.station_reach)),
            )
            .with_resolver(CourseResolver::new(
                CoursePolicy::Clamp {
                    speed_factor: config.off_road_speed,
                    lateral_factor: config.off_road_lateral,
                    bounce: config.off_road_bounce,
                },
                LaneSpan::Centre,
            ))
            .with_resolver(CullResolver::screen(w, h, 60.0));
        let stage = config.first_stage.min(STAGES.len() - 1);
        let session = Session::new(config.lives, 0).with_gauge(ResourceGauge::new(config.fuel_max));
        let mut game = Self {
            course: RoadCourse::new(STAGES[stage].environment, w * 0.5),
            inbox: Inbox::new(1),
            config,
            sim,
            stage,
            scroll: 0.0,
            distance: 0.0,
            travelled: 0.0,
            session,
        };
        game.reset_world();
        game
    }

    /// The stage being driven.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &STAGES[self.stage]
    }

    /// Kilometres covered this run.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// The car.
    #[must_use]
    pub fn car(&self) -> Option<&Entity> {
        self.sim.registry().first_of(EntityTag::PlayerCraft)
    }

    fn speed(&self) -> f32 {
        self.car().and_then(Entity::as_craft).map_or(0.0, |c| c.speed)
    }

    fn reset_world(&mut self) {
        self.stage = self.config.first_stage.min(STAGES.len() - 1);
        self.course.environment = STAGES[self.stage].environment;
        self.scroll = 0.0;
        self.distance = 0.0;
        self.travelled = 0.0;
        let registry = self.sim.registry_mut();
        registry.clear();
        registry.spawn(
            Body::new(self.config.car_position, self.config.car_size),
            EntityInner::Craft(CraftState {
                speed: self.config.start_speed,
                ..CraftState::default()
            }),
        );
    }

    fn begin_run(&mut self) {
        self.session.start();
        self.reset_world();
        if self.stage > 0 {
            let level = u32::try_from(self.stage + 1).unwrap_or(u32::MAX);
            self.session.jump_to_level(level);
        }
    }

    fn apply(&mut self, intent: &Intent, events: &mut EventLog) {
        let phase = self.session.phase();
        let event = match intent {
            Intent::ConfirmContinue if phase == Phase::Menu || phase.is_terminal() => Event::LevelLoaded {
                level: u32::try_from(self.config.first_stage + 1).unwrap_or(u32::MAX),
            },
            Intent::Restart if phase != Phase::Menu => Event::Restarted,
            _ => return,
        };
        self.begin_run();
        events.push(event);
    }

    fn crash(&mut self, cause: LossCause, events: &mut EventLog) {
        let loss = lose_life(&mut self.session, cause, events);
        if !matches!(loss, LifeLoss::Continue { .. } | LifeLoss::Respawning { .. }) {
            return;
        }
        if let Some(gauge) = self.session.gauge_mut().filter(|g| g.is_empty()) {
            gauge.fill();
        }
        let (frames, factor) = (self.config.hit_invulnerability, self.config.hit_speed_factor);
        if let Some(state) = self
            .sim
            .registry_mut()
            .first_of_mut(EntityTag::PlayerCraft)
            .and_then(Entity::as_craft_mut)
        {
            state.invulnerable_frames = frames;
            state.speed *= factor;
        }
    }

    fn settle(&mut self, stepped: Vec<Event>, events: &mut EventLog) {
        let mut crashed = None;
        for event in stepped {
            match &event {
                Event::Rammed { .. } => {
                    crashed.get_or_insert(LossCause::Collision);
                }
                Event::PickedUp {
                    kind: PickupKind::FuelStation,
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

        let (speed, off_road) = self
            .car()
            .and_then(Entity::as_craft)
            .map_or((0.0, false), |c| (c.speed, c.off_course));
        let env = self.course.environment;
        let mut burn = (self.config.fuel_base + self.config.fuel_per_speed * f64::from(speed)) * env.fuel_multiplier();
        if off_road {
            burn *= self.config.off_road_fuel;
        }
        let burn = burn * f64::from(self.sim.dt());
        let drain = self.session.gauge_mut().map_or(Drain::Remaining, |g| g.drain(burn));
        if drain != Drain::Remaining {
            crashed.get_or_insert(LossCause::FuelDepleted);
        }
        if let Some(cause) = crashed {
            self.crash(cause, events);
        }
    }

    /// Move the road along and pay per-frame score. Finishing the stage's
    /// length pays its bonus and moves to the next one.
    fn drive(&mut self, events: &mut EventLog) {
        let speed = self.speed();
        let km = f64::from(speed) * self.config.km_per_pixel;
        self.scroll += speed;
        self.distance += km;
        self.travelled += km;

        let mut score = (self.distance / 10.0).floor() + self.course.environment.score_bonus();
        if speed > self.config.fast_speed {
            score += self.config.fast_bonus;
        }
        self.session.add_score(score);

        let stage = STAGES[self.stage];
        if self.travelled < stage.distance {
            return;
        }
        let bonus = self.config.stage_bonus + self.config.stage_bonus_step * f64::from(stage.difficulty);
        self.session.add_score(bonus);
        if let Some(gauge) = self.session.gauge_mut() {
            gauge.refill(self.config.stage_fuel);
        }
        let number = u32::try_from(self.stage + 1).unwrap_or(u32::MAX);
        events.push(Event::StageComplete { stage: number, bonus });
        tracing::info!(stage = stage.name, score = self.session.score(), "stage complete");

        if self.stage + 1 >= STAGES.len() {
            self.session.declare_victory();
            events.push(Event::Victory);
            return;
        }
        self.stage += 1;
        self.travelled = 0.0;
        self.course.environment = STAGES[self.stage].environment;
        self.session.advance_level();
    }

    fn spawn(&mut self) {
        let env = self.course.environment;
        let centre = self.course.centre_at(self.scroll);
        let spread = env.road_width() - 80.0;
        let fuel = self.session.gauge().map_or(0.0, ResourceGauge::value);
        let config = &self.config;
        let (registry, rng) = self.sim.spawn_view();

        if rng.gen::<f64>() < env.traffic_density() * config.traffic_scale {
            let kind = match env.roadside() {
                Some((roadside, chance)) if rng.gen::<f64>() < chance => roadside,
                _ => HostileKind::Car,
            };
            let x = centre + (rng.gen::<f32>() - 0.5) * spread;
            registry.spawn(
                Body::new(Vec2::new(x, -50.0), config.obstacle_size),
                EntityInner::Hostile(HostileState::new(kind)),
            );
        }
        if fuel < config.station_below && rng.gen::<f64>() < config.station_chance {
            registry.spawn(
                Body::new(Vec2::new(centre, -50.0), Vec2::splat(30.0)),
                EntityInner::Pickup(PickupState {
                    kind: PickupKind::FuelStation,
                    amount: config.station_fuel,
                    bounty: config.station_score,
                }),
            );
        }
    }
}

impl Game for Rally {
    fn kind(&self) -> GameKind {
        GameKind::Rally
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

        let input = merged_input(held, &intents);
        let stepped = self.sim.step(&input, &self.course, self.scroll);
        self.settle(stepped, &mut events);
        if !self.session.is_playing() {
            return events.drain();
        }
        self.drive(&mut events);
        if self.session.is_playing() {
            self.spawn();
        }
        events.drain()
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn snapshot(&self) -> Snapshot {
        let stage = self.stage();
        let lane = self
            .course
            .lane_at(self.config.car_position.y, self.scroll)
            .unwrap_or(Lane::new(0.0, self.config.width));
        Snapshot {
            game: GameKind::Rally,
            frame: self.inbox.frame(),
            tick: self.sim.tick(),
            session: SessionSnapshot::of(&self.session, "fuel", Vec::new()),
            world: WorldSnapshot::Field(FieldSnapshot {
                size: Vec2::new(self.config.width, self.config.height),
                scroll: self.scroll,
                entities: self.sim.registry().iter().cloned().collect(),
                scenery: Scenery::Road {
                    lane,
                    environment: stage.environment,
                    stage: stage.name.to_string(),
                    abbreviation: stage.abbreviation.to_string(),
                    travelled: self.travelled,
                    length: stage.distance,
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::run;

    const GAS: InputState = InputState {
        accelerate: true,
        ..InputState::IDLE
    };

    fn playing(config: RallyConfig) -> Rally {
        let mut game = Rally::new(config, 3);
        game.handle(Intent::ConfirmContinue);
        game.frame(&InputState::IDLE);
        game
    }

    fn drive(game: &mut Rally, held: &InputState, frames: usize) -> Vec<Event> {
        (0..frames).flat_map(|_| game.frame(held)).collect()
    }

    #[test]
    fn stage_table_is_the_full_route() {
        assert_eq!(STAGES[0].abbreviation, "CA");
        assert_eq!(STAGES[49].abbreviation, "HI");
        assert!(STAGES.iter().all(|s| s.distance > 0.0 && s.difficulty > 0));
    }

    #[test]
    fn throttle_reaches_top_speed() {
        let mut game = playing(RallyConfig::default().without_traffic());
        drive(&mut game, &GAS, 40);
        assert!((game.speed() - 12.0).abs() < 1e-4);
        drive(&mut game, &InputState::IDLE, 200);
        assert!((game.speed() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn covering_a_stage_pays_and_advances() {
        // Rhode Island, 100 km
        let mut game = playing(RallyConfig::default().without_traffic().starting_at(34));
        assert_eq!(game.session().level(), 35);
        let events = drive(&mut game, &GAS, 150);
        assert!(events.contains(&Event::StageComplete {
            stage: 35,
            bonus: 1200.0
        }));
        assert_eq!(game.stage().abbreviation, "MA");
        assert_eq!(game.session().level(), 36);
    }

    #[test]
    fn last_stage_wins_the_run() {
        let mut game = playing(RallyConfig::default().without_traffic().starting_at(49));
        let events = drive(&mut game, &GAS, 400);
        assert!(events.contains(&Event::Victory));
        assert_eq!(game.session().phase(), Phase::Victory);
    }

    #[test]
    fn obstacle_costs_a_life_and_speed() {
        let mut game = playing(RallyConfig::default().without_traffic());
        let at = game.car().unwrap().body().position;
        game.sim.registry_mut().spawn(
            Body::new(at, Vec2::new(28.0, 40.0)),
            EntityInner::Hostile(HostileState::new(HostileKind::Truck)),
        );
        let before = game.speed();
        let events = run(&mut game, 1);
        assert!(events.contains(&Event::LifeLost {
            cause: LossCause::Collision,
            lives_left: 2
        }));
        let craft = game.car().unwrap().as_craft().unwrap();
        assert_eq!(craft.invulnerable_frames, 120);
        assert!(game.speed() < before * 0.6);
    }

    #[test]
    fn road_edge_holds_the_car() {
        let mut game = playing(RallyConfig::default().without_traffic());
        let held = InputState {
            left: true,
            accelerate: true,
            ..InputState::IDLE
        };
        let events = drive(&mut game, &held, 120);
        assert!(events.contains(&Event::OffCourse));
        assert!(game.session().is_playing());
        let snapshot = game.snapshot();
        let Some(Scenery::Road { lane, .. }) = snapshot.field().map(|f| &f.scenery) else {
            panic!("rally snapshot without a road");
        };
        let x = game.car().unwrap().body().position.x;
        assert!(x >= lane.left - 20.0);
    }

    #[test]
    fn stations_refuel_and_score() {
        let mut game = playing(RallyConfig::default().without_traffic());
        if let Some(gauge) = game.session.gauge_mut() {
            gauge.drain(70.0);
        }
        let at = game.car().unwrap().body().position;
        game.sim.registry_mut().spawn(
            Body::new(at - Vec2::new(0.0, 20.0), Vec2::splat(30.0)),
            EntityInner::Pickup(PickupState {
                kind: PickupKind::FuelStation,
                amount: 50.0,
                bounty: 100.0,
            }),
        );
        let events = run(&mut game, 1);
        assert!(events.iter().any(|e| matches!(e, Event::Refueled { amount } if *amount > 49.0)));
    }

    #[test]
    fn empty_tank_costs_a_life_and_refills() {
        let mut game = playing(RallyConfig {
            fuel_base: 3000.0,
            ..RallyConfig::default().without_traffic()
        });
        let events = run(&mut game, 1);
        assert!(events.contains(&Event::LifeLost {
            cause: LossCause::FuelDepleted,
            lives_left: 2
        }));
        assert_eq!(game.session().lives(), 2);
    }

    #[test]
    fn one_depletion_costs_one_life() {
        let mut game = playing(RallyConfig {
            fuel_base: 120.0,
            ..RallyConfig::default().without_traffic()
        });
        if let Some(gauge) = game.session.gauge_mut() {
            let spare = gauge.value() - 0.5;
            gauge.drain(spare);
        }
        let events = drive(&mut game, &InputState::IDLE, 20);
        let losses = events
            .iter()
            .filter(|e| matches!(e, Event::LifeLost { cause: LossCause::FuelDepleted, .. }))
            .count();
        assert_eq!(losses, 1);
        assert_eq!(game.session().lives(), 2);
    }

    #[test]
    fn ram_on_the_last_drop_still_refills() {
        let mut game = playing(RallyConfig::default().without_traffic());
        if let Some(gauge) = game.session.gauge_mut() {
            let spare = gauge.value() - 1e-6;
            gauge.drain(spare);
        }
        let at = game.car().unwrap().body().position;
        game.sim.registry_mut().spawn(
            Body::new(at, Vec2::new(28.0, 40.0)),
            EntityInner::Hostile(HostileState::new(HostileKind::Truck)),
        );
        let events = run(&mut game, 1);
        assert!(events.contains(&Event::LifeLost {
            cause: LossCause::Collision,
            lives_left: 2
        }));
        assert_eq!(events.iter().filter(|e| matches!(e, Event::LifeLost { .. })).count(), 1);
        let fuel = game.session().gauge().map(ResourceGauge::value).unwrap();
        assert!(fuel > 99.0);

        drive(&mut game, &GAS, 300);
        assert!(game.session().gauge().is_some_and(|g| !g.is_empty()));
        assert_eq!(game.session().lives(), 2);
    }

    #[test]
    fn traffic_follows_the_seed() {
        let digest = |seed| {
            let mut game = Rally::new(RallyConfig::default().starting_at(32), seed);
            game.handle(Intent::ConfirmContinue);
            drive(&mut game, &GAS, 300);
            crate::snapshot::hash_snapshot(&game.snapshot())
        };
        assert_eq!(digest(8), digest(8));
    }

    #[test]
    fn config_rejects_unknown_stage() {
        assert!(RallyConfig::default().starting_at(50).validate().is_err());
        assert!(RallyConfig::default().starting_at(49).validate().is_ok());
    }
}
