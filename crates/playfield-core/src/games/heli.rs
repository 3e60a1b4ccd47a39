//! Helicopter taxi.
//!
//! Passengers wait on ledges above rolling ground, each bound for a landing
//! pad. Hover over a passenger to take them aboard, hover over their pad to
//! drop them off. Thrust burns fuel and the pilot's energy; the station
//! sells fuel for score and fruit trees restore energy. Pterosaurs patrol
//! the upper sky.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::course::{Course, HeliTerrain};
use crate::entity::{Body, CraftState, Entity, EntityId, EntityInner, EntityTag, HostileKind, HostileState, PickupKind, PickupState};
use crate::error::{ensure_nonzero, ensure_positive, ensure_range, ConfigError, GameConfig};
use crate::event::{Event, EventLog};
use crate::gauge::ResourceGauge;
use crate::intent::{InputState, Intent};
use crate::resolver::{CollisionResolver, HeliFlight, MotionResolver, PickupReach, RamPolicy, TerrainResolver};
use crate::session::{LifeLoss, LossCause, Phase, Session};
use crate::simulation::FieldSimulation;
use crate::snapshot::{FieldSnapshot, GaugeReading, Scenery, SessionSnapshot, Snapshot, WorldSnapshot};

use super::{finish_level, lose_life, merged_input, Game, GameKind, Inbox};

/// Heli tuning. Speeds and per-frame costs are per frame, as the game was tuned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeliConfig {
    /// Play area width
    pub width: f32,
    /// Play area height
    pub height: f32,
    /// Lives per run
    pub lives: u32,
    /// Helicopter width and height
    pub craft_size: Vec2,
    /// Where the helicopter starts each attempt
    pub craft_start: Vec2,
    /// Downward acceleration, px per frame²
    pub gravity: f32,
    /// Upward acceleration while thrusting
    pub thrust: f32,
    /// Sideways acceleration while steering
    pub lateral: f32,
    /// Horizontal velocity kept per frame
    pub damping: f32,
    /// Fastest safe touchdown, px per frame
    pub safe_landing: f32,
    /// Health lost on a hard landing
    pub landing_damage: f32,
    /// Ground points, evenly spread over the width
    pub ground_points: usize,
    /// Ground height above the bottom edge
    pub ground_clearance: f32,
    /// Ground wave amplitude
    pub ground_amplitude: f32,
    /// Random extra depth per ground point
    pub ground_jitter: f32,
    /// Fuel capacity
    pub fuel_max: f64,
    /// Fuel per frame of vertical thrust; steering costs half
    pub fuel_burn: f64,
    /// Energy capacity
    pub energy_max: f64,
    /// Energy per frame of vertical thrust; steering costs half
    pub energy_burn: f64,
    /// Pterosaur width and height
    pub pterosaur_size: Vec2,
    /// Pterosaurs on every level
    pub pterosaur_base: u32,
    /// Extra pterosaurs per level number
    pub pterosaur_per_level: u32,
    /// Top and bottom of the pterosaur patrol band
    pub pterosaur_band: (f32, f32),
    /// Health lost per frame in contact with a pterosaur
    pub pterosaur_damage: f32,
    /// Share of velocity kept, reversed, when bouncing off a pterosaur
    pub pterosaur_restitution: f32,
    /// Waiting passengers; passenger `i` is bound for pad `i`
    pub passengers: Vec<Vec2>,
    /// Landing pad centres
    pub pads: Vec<Vec2>,
    /// Highest vertical speed that counts as hovering, px per frame
    pub hover_speed: f32,
    /// Boarding distance
    pub board_radius: f32,
    /// Drop-off distance
    pub deliver_radius: f32,
    /// Score for boarding
    pub board_score: f64,
    /// Score for a delivery
    pub deliver_score: f64,
    /// Bonus when every passenger is delivered
    pub level_bonus: f64,
    /// Fuel station centre and size
    pub station: (Vec2, Vec2),
    /// Refuelling distance
    pub station_radius: f32,
    /// Fuel bought per frame at the station
    pub refuel_rate: f64,
    /// Score paid per frame of refuelling
    pub refuel_cost: f64,
    /// Fruit tree columns; the fruit hangs above the ground there
    pub fruit_trees: Vec<f32>,
    /// Fruit height above the ground
    pub fruit_height: f32,
    /// Picking distance
    pub fruit_radius: f32,
    /// Energy per fruit
    pub fruit_energy: f64,
    /// Score per fruit
    pub fruit_score: f64,
}

impl Default for HeliConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            lives: 3,
            craft_size: Vec2::new(40.0, 25.0),
            craft_start: Vec2::new(100.0, 100.0),
            gravity: 0.15,
            thrust: 0.3,
            lateral: 0.2,
            damping: 0.98,
            safe_landing: 2.0,
            landing_damage: 20.0,
            ground_points: 21,
            ground_clearance: 100.0,
            ground_amplitude: 50.0,
            ground_jitter: 30.0,
            fuel_max: 100.0,
            fuel_burn: 0.1,
            energy_max: 100.0,
            energy_burn: 0.01,
            pterosaur_size: Vec2::new(30.0, 20.0),
            pterosaur_base: 2,
            pterosaur_per_level: 1,
            pterosaur_band: (50.0, 300.0),
            pterosaur_damage: 10.0,
            pterosaur_restitution: 0.5,
            passengers: vec![Vec2::new(190.0, 455.0), Vec2::new(390.0, 355.0)],
            pads: vec![Vec2::new(400.0, 360.0), Vec2::new(600.0, 410.0)],
            hover_speed: 1.0,
            board_radius: 30.0,
            deliver_radius: 40.0,
            board_score: 10.0,
            deliver_score: 50.0,
            level_bonus: 100.0,
            station: (Vec2::new(730.0, 520.0), Vec2::new(60.0, 40.0)),
            station_radius: 50.0,
            refuel_rate: 0.5,
            refuel_cost: 0.1,
            fruit_trees: vec![265.0, 665.0],
            fruit_height: 60.0,
            fruit_radius: 40.0,
            fruit_energy: 30.0,
            fruit_score: 20.0,
        }
    }
}

impl HeliConfig {
    /// Same tuning with an empty sky.
    #[must_use]
    pub fn without_pterosaurs(mut self) -> Self {
        self.pterosaur_base = 0;
        self.pterosaur_per_level = 0;
        self
    }

    fn flight(&self) -> HeliFlight {
        HeliFlight {
            gravity: self.gravity,
            thrust: self.thrust,
            lateral: self.lateral,
            damping: self.damping,
        }
    }
}

impl GameConfig for HeliConfig {
    #[allow(clippy::cast_precision_loss)]
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("width", f64::from(self.width))?;
        ensure_positive("height", f64::from(self.height))?;
        ensure_nonzero("lives", self.lives)?;
        ensure_positive("fuel_max", self.fuel_max)?;
        ensure_positive("energy_max", self.energy_max)?;
        ensure_range("ground_points", self.ground_points as f64, 2.0, 1000.0)?;
        ensure_range("passengers", self.passengers.len() as f64, 1.0, self.pads.len() as f64)?;
        Ok(())
    }
}

/// The taxi game.
#[derive(Debug)]
pub struct Heli {
    config: HeliConfig,
    sim: FieldSimulation,
    terrain: HeliTerrain,
    pads: Vec<Body>,
    station: Body,
    carrying: Option<usize>,
    delivered: usize,
    energy: ResourceGauge,
    session: Session,
    inbox: Inbox,
}

impl Heli {
    /// A game in the menu.
    #[must_use]
    pub fn new(config: HeliConfig, seed: u64) -> Self {
        let sim = FieldSimulation::new(seed)
            .with_resolver(config.flight())
            .with_resolver(MotionResolver::with_craft_bounds(
                Vec2::ZERO,
                Vec2::new(config.width, config.height),
            ))
            .with_resolver(
                CollisionResolver::new()
                    .without_projectiles()
                    .with_ram(RamPolicy::Bounce {
                        damage: config.pterosaur_damage,
                        restitution: config.pterosaur_restitution,
                    })
                    .with_reach(PickupReach::Disabled),
            )
            .with_resolver(TerrainResolver::new(config.safe_landing, config.landing_damage));
        let pads = config.pads.iter().map(|&at| Body::new(at, Vec2::splat(40.0))).collect();
        let station = Body::new(config.station.0, config.station.1);
        let mut game = Self {
            terrain: HeliTerrain::from_points(Vec::new()),
            energy: ResourceGauge::new(config.energy_max),
            session: Session::new(config.lives, 0).with_gauge(ResourceGauge::new(config.fuel_max)),
            inbox: Inbox::new(1),
            carrying: None,
            delivered: 0,
            pads,
            station,
            sim,
            config,
        };
        game.raise_ground();
        game.reset_level();
        game
    }

    /// The helicopter.
    #[must_use]
    pub fn craft(&self) -> Option<&Entity> {
        self.sim.registry().first_of(EntityTag::PlayerCraft)
    }

    /// The ground.
    #[must_use]
    pub const fn terrain(&self) -> &HeliTerrain {
        &self.terrain
    }

    /// Destination pad of the passenger on board.
    #[must_use]
    pub const fn carrying(&self) -> Option<usize> {
        self.carrying
    }

    /// Pilot energy.
    #[must_use]
    pub const fn energy(&self) -> &ResourceGauge {
        &self.energy
    }

    fn raise_ground(&mut self) {
        let c = &self.config;
        #[allow(clippy::cast_precision_loss)]
        let spacing = c.width / c.ground_points.saturating_sub(1).max(1) as f32;
        self.terrain = HeliTerrain::rolling(
            c.ground_points,
            spacing,
            c.height - c.ground_clearance,
            c.ground_amplitude,
            c.ground_jitter,
            self.sim.rng_mut(),
        );
    }

    /// Put everything back for a fresh attempt at the current level.
    fn reset_level(&mut self) {
        self.carrying = None;
        self.delivered = 0;
        self.energy.fill();
        if let Some(fuel) = self.session.gauge_mut() {
            fuel.fill();
        }

        let count = self.config.pterosaur_base + self.config.pterosaur_per_level * self.session.level();
        let fruit: Vec<Vec2> = self
            .config
            .fruit_trees
            .iter()
            .filter_map(|&x| {
                let ground = self.terrain.floor_at(x)?;
                Some(Vec2::new(x, ground - self.config.fruit_height))
            })
            .collect();
        let c = &self.config;
        let (registry, rng) = self.sim.spawn_view();
        let dt = crate::FIXED_DT;
        registry.clear();
        registry.spawn(
            Body::new(c.craft_start, c.craft_size),
            EntityInner::Craft(CraftState::default()),
        );
        for (destination, &at) in c.passengers.iter().enumerate() {
            registry.spawn(
                Body::new(at, Vec2::new(20.0, 30.0)),
                EntityInner::Pickup(PickupState {
                    kind: PickupKind::Passenger { destination },
                    amount: 0.0,
                    bounty: c.board_score,
                }),
            );
        }
        let (top, bottom) = c.pterosaur_band;
        for _ in 0..count {
            let at = Vec2::new(rng.gen::<f32>() * c.width, top + rng.gen::<f32>() * (bottom - top) * 0.8);
            let velocity = Vec2::new((rng.gen::<f32>() - 0.5) * 2.0, (rng.gen::<f32>() - 0.5) * 0.5) / dt;
            registry.spawn(
                Body::new(at, c.pterosaur_size).moving(velocity),
                EntityInner::Hostile(
                    HostileState::new(HostileKind::Pterosaur).roaming(Vec2::new(0.0, top), Vec2::new(c.width, bottom)),
                ),
            );
        }
        for at in fruit {
            registry.spawn(
                Body::new(at, Vec2::splat(10.0)),
                EntityInner::Pickup(PickupState {
                    kind: PickupKind::Fruit,
                    amount: c.fruit_energy,
                    bounty: c.fruit_score,
                }),
            );
        }
    }

    fn begin(&mut self, event: Event, events: &mut EventLog) {
        self.raise_ground();
        self.reset_level();
        tracing::debug!(level = self.session.level(), "heli level");
        events.push(event);
    }

    fn apply(&mut self, intent: &Intent, events: &mut EventLog) {
        match (intent, self.session.phase()) {
            (Intent::ConfirmContinue, phase) if phase == Phase::Menu || phase.is_terminal() => {
                self.session.start();
                self.begin(Event::LevelLoaded { level: 1 }, events);
            }
            (Intent::ConfirmContinue, Phase::LevelComplete) => {
                if let Some(level) = self.session.confirm_continue(true) {
                    self.begin(Event::LevelLoaded { level }, events);
                }
            }
            (Intent::Restart, phase) if phase != Phase::Menu => {
                self.session.start();
                self.begin(Event::Restarted, events);
            }
            _ => {}
        }
    }

    /// Pay for the keys held this frame. An empty tank ignores them.
    fn burn(&mut self, input: &mut InputState) {
        let empty = self.session.gauge().map_or(true, ResourceGauge::is_empty);
        if empty {
            input.up = false;
            input.left = false;
            input.right = false;
            return;
        }
        let mut load = 0.0;
        if input.up {
            load += 1.0;
        }
        if input.left {
            load += 0.5;
        }
        if input.right {
            load += 0.5;
        }
        if let Some(fuel) = self.session.gauge_mut() {
            fuel.drain(self.config.fuel_burn * load);
        }
        self.energy.drain(self.config.energy_burn * load);
    }

    /// Boarding, drop-off, refuelling and fruit, from the craft's position
    /// after this frame's motion.
    fn ferry(&mut self, events: &mut EventLog) {
        let Some(craft) = self.craft() else {
            return;
        };
        let at = craft.body().position;
        let hovering = (craft.body().velocity.y * self.sim.dt()).abs() < self.config.hover_speed;
        let c = &self.config;

        if let Some(destination) = self.carrying {
            let reached = self
                .pads
                .get(destination)
                .is_some_and(|pad| pad.position.distance(at) < c.deliver_radius);
            if reached && hovering {
                self.carrying = None;
                self.delivered += 1;
                self.session.add_score(c.deliver_score);
                events.push(Event::Delivered { destination });
                if self.delivered >= c.passengers.len() {
                    finish_level(&mut self.session, c.level_bonus, events);
                }
            }
        } else if hovering {
            let waiting = self.nearest(at, c.board_radius, |kind| matches!(kind, PickupKind::Passenger { .. }));
            if let Some((id, PickupKind::Passenger { destination }, bounty)) = waiting {
                self.sim.registry_mut().despawn(id);
                self.carrying = Some(destination);
                self.session.add_score(bounty);
                events.push(Event::Boarded { destination });
            }
        }

        let at_station = self.station.position.distance(at) < c.station_radius;
        if at_station && hovering {
            let added = self.session.gauge_mut().map_or(0.0, |g| g.refill(c.refuel_rate));
            if added > 0.0 {
                self.session.deduct(c.refuel_cost);
                events.push(Event::Refueled { amount: added });
            }
        }

        if let Some((id, kind, bounty)) = self.nearest(at, c.fruit_radius, |kind| kind == PickupKind::Fruit) {
            self.sim.registry_mut().despawn(id);
            let amount = self.energy.refill(c.fruit_energy);
            self.session.add_score(bounty);
            events.push(Event::PickedUp {
                id,
                kind,
                amount,
                bounty,
            });
        }
    }

    fn nearest<F>(&self, at: Vec2, radius: f32, wanted: F) -> Option<(EntityId, PickupKind, f64)>
    where
        F: Fn(PickupKind) -> bool,
    {
        self.sim
            .registry()
            .iter()
            .filter_map(|e| e.as_pickup().map(|p| (e, p)))
            .filter(|(e, p)| wanted(p.kind) && e.body().position.distance(at) < radius)
            .map(|(e, p)| (e.id(), p.kind, p.bounty))
            .next()
    }

    fn check_pilot(&mut self, events: &mut EventLog) {
        let wrecked = self
            .craft()
            .and_then(Entity::as_craft)
            .is_some_and(|c| c.health <= 0.0);
        let cause = if wrecked {
            LossCause::Wrecked
        } else if self.energy.is_empty() {
            LossCause::EnergyDepleted
        } else {
            return;
        };
        if let LifeLoss::Continue { .. } | LifeLoss::Respawning { .. } = lose_life(&mut self.session, cause, events) {
            self.reset_level();
        }
    }
}

impl Game for Heli {
    fn kind(&self) -> GameKind {
        GameKind::Heli
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

        let mut input = merged_input(held, &intents);
        self.burn(&mut input);
        events.extend(self.sim.step(&input, &self.terrain, 0.0));
        self.ferry(&mut events);
        if self.session.is_playing() {
            self.check_pilot(&mut events);
        }
        events.drain()
    }

    fn session(&self) -> &Session {
        &self.session
    }

    fn snapshot(&self) -> Snapshot {
        let health = self.craft().and_then(Entity::as_craft).map_or(0.0, |c| c.health);
        let extra = vec![
            GaugeReading::of("energy", &self.energy),
            GaugeReading {
                name: "health".to_string(),
                value: f64::from(health),
                max: f64::from(CraftState::default().health),
            },
        ];
        Snapshot {
            game: GameKind::Heli,
            frame: self.inbox.frame(),
            tick: self.sim.tick(),
            session: SessionSnapshot::of(&self.session, "fuel", extra),
            world: WorldSnapshot::Field(FieldSnapshot {
                size: Vec2::new(self.config.width, self.config.height),
                scroll: 0.0,
                entities: self.sim.registry().iter().cloned().collect(),
                scenery: Scenery::Terrain {
                    ground: self.terrain.points().to_vec(),
                    pads: self.pads.clone(),
                    station: self.station,
                    carrying: self.carrying,
                    delivered: self.delivered,
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::run;

    const THRUST: InputState = InputState {
        up: true,
        ..InputState::IDLE
    };

    fn playing(config: HeliConfig) -> Heli {
        let mut game = Heli::new(config, 5);
        game.handle(Intent::ConfirmContinue);
        game.frame(&InputState::IDLE);
        game
    }

    fn quiet() -> Heli {
        playing(HeliConfig::default().without_pterosaurs())
    }

    /// Park the helicopter at `at`, motionless.
    fn hover(game: &mut Heli, at: Vec2) {
        if let Some(craft) = game.sim.registry_mut().first_of_mut(EntityTag::PlayerCraft) {
            let body = craft.body_mut();
            body.position = at;
            body.velocity = Vec2::ZERO;
        }
    }

    fn fuel(game: &Heli) -> f64 {
        game.session().gauge().map_or(0.0, ResourceGauge::value)
    }

    #[test]
    fn menu_waits_for_confirm() {
        let mut game = Heli::new(HeliConfig::default(), 5);
        assert!(run(&mut game, 10).is_empty());
        game.handle(Intent::ConfirmContinue);
        assert_eq!(game.frame(&InputState::IDLE)[0], Event::LevelLoaded { level: 1 });
        assert!(game.session().is_playing());
        assert_eq!(game.terrain().points().len(), 21);
    }

    #[test]
    fn dropping_onto_the_ground_hurts() {
        let mut game = quiet();
        let events = run(&mut game, 150);
        assert_eq!(
            events.iter().filter(|e| matches!(e, Event::HardLanding { .. })).count(),
            1
        );
        let craft = game.craft().unwrap();
        assert!((craft.as_craft().unwrap().health - 80.0).abs() < 1e-4);
        assert_eq!(craft.body().velocity.y, 0.0);
    }

    #[test]
    fn thrust_burns_fuel_and_energy() {
        let mut game = quiet();
        for _ in 0..10 {
            game.frame(&THRUST);
        }
        assert!((fuel(&game) - 99.0).abs() < 1e-9);
        assert!((game.energy().value() - 99.9).abs() < 1e-9);
    }

    #[test]
    fn empty_tank_cuts_the_rotor() {
        let mut game = quiet();
        if let Some(gauge) = game.session.gauge_mut() {
            gauge.drain(100.0);
        }
        hover(&mut game, Vec2::new(100.0, 100.0));
        for _ in 0..10 {
            game.frame(&THRUST);
        }
        assert!(game.craft().unwrap().body().velocity.y > 0.0);
        assert!((game.energy().value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ferrying_every_passenger_finishes_the_level() {
        let mut game = quiet();
        let config = HeliConfig::default();

        hover(&mut game, config.passengers[0]);
        assert!(run(&mut game, 1).contains(&Event::Boarded { destination: 0 }));
        assert_eq!(game.carrying(), Some(0));

        hover(&mut game, config.pads[0]);
        assert!(run(&mut game, 1).contains(&Event::Delivered { destination: 0 }));
        // the second passenger waits next to the first pad
        assert!(run(&mut game, 1).contains(&Event::Boarded { destination: 1 }));

        hover(&mut game, config.pads[1]);
        let events = run(&mut game, 1);
        assert!(events.contains(&Event::LevelComplete { level: 1, bonus: 100.0 }));
        assert_eq!(game.session().phase(), Phase::LevelComplete);
        assert!((game.session().score() - 220.0).abs() < 1e-9);

        game.handle(Intent::ConfirmContinue);
        assert_eq!(game.frame(&InputState::IDLE)[0], Event::LevelLoaded { level: 2 });
        assert_eq!(game.carrying(), None);
        assert_eq!(game.sim.registry().count_of(EntityTag::Pickup), 4);
    }

    #[test]
    fn moving_too_fast_never_boards() {
        let mut game = quiet();
        hover(&mut game, HeliConfig::default().passengers[0]);
        if let Some(craft) = game.sim.registry_mut().first_of_mut(EntityTag::PlayerCraft) {
            craft.body_mut().velocity.y = 3.0 / crate::FIXED_DT;
        }
        assert!(run(&mut game, 1).is_empty());
        assert_eq!(game.carrying(), None);
    }

    #[test]
    fn fruit_restores_energy() {
        let mut game = quiet();
        game.energy.drain(50.0);
        let fruit = game
            .sim
            .registry()
            .iter()
            .find(|e| e.as_pickup().is_some_and(|p| p.kind == PickupKind::Fruit))
            .map(|e| e.body().position)
            .unwrap();
        hover(&mut game, fruit);
        let events = run(&mut game, 1);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PickedUp {
                kind: PickupKind::Fruit,
                ..
            }
        )));
        assert!((game.energy().value() - 80.0).abs() < 1e-9);
        assert!((game.session().score() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn station_sells_fuel() {
        let mut game = quiet();
        if let Some(gauge) = game.session.gauge_mut() {
            gauge.drain(40.0);
        }
        hover(&mut game, HeliConfig::default().station.0);
        let events = run(&mut game, 1);
        assert!(events.contains(&Event::Refueled { amount: 0.5 }));
        assert!((fuel(&game) - 60.5).abs() < 1e-9);
        assert_eq!(game.session().score(), 0.0);
    }

    #[test]
    fn pterosaur_strike_can_wreck_the_helicopter() {
        let mut game = quiet();
        hover(&mut game, Vec2::new(400.0, 200.0));
        if let Some(craft) = game
            .sim
            .registry_mut()
            .first_of_mut(EntityTag::PlayerCraft)
            .and_then(Entity::as_craft_mut)
        {
            craft.health = 5.0;
        }
        game.sim.registry_mut().spawn(
            Body::new(Vec2::new(400.0, 200.0), Vec2::new(30.0, 20.0)),
            EntityInner::Hostile(HostileState::new(HostileKind::Pterosaur)),
        );
        let events = run(&mut game, 1);
        assert!(events.iter().any(|e| matches!(e, Event::Rammed { .. })));
        assert!(events.contains(&Event::LifeLost {
            cause: LossCause::Wrecked,
            lives_left: 2
        }));
        let craft = game.craft().unwrap();
        assert_eq!(craft.body().position, HeliConfig::default().craft_start);
        assert!((craft.as_craft().unwrap().health - 100.0).abs() < 1e-4);
    }

    #[test]
    fn exhausted_pilot_loses_a_life() {
        let mut game = quiet();
        game.energy.drain(99.995);
        let events: Vec<Event> = game.frame(&THRUST);
        assert!(events.contains(&Event::LifeLost {
            cause: LossCause::EnergyDepleted,
            lives_left: 2
        }));
        assert!((game.energy().value() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn sky_fills_with_level() {
        let game = playing(HeliConfig::default());
        assert_eq!(game.sim.registry().count_of(EntityTag::Hostile), 3);
    }

    #[test]
    fn same_seed_same_flight() {
        let digest = |seed| {
            let mut game = Heli::new(HeliConfig::default(), seed);
            game.handle(Intent::ConfirmContinue);
            for i in 0..200 {
                let held = if i % 3 == 0 { THRUST } else { InputState::IDLE };
                game.frame(&held);
            }
            crate::snapshot::hash_snapshot(&game.snapshot())
        };
        assert_eq!(digest(21), digest(21));
    }

    #[test]
    fn config_needs_a_pad_per_passenger() {
        let config = HeliConfig {
            pads: vec![Vec2::new(400.0, 360.0)],
            ..HeliConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(HeliConfig::default().validate().is_ok());
    }
}
