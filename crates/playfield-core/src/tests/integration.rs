//! Whole runs through the public game API.

use strata::{LevelDescriptor, Pos};

use crate::error::ConfigError;
use crate::event::Event;
use crate::games::{build, Game, GameKind, Railway, RailwayConfig, TileGame, Warehouse, WarehouseConfig};
use crate::intent::{InputState, Intent};
use crate::session::{LossCause, Phase};
use crate::snapshot::WorldSnapshot;

use super::helpers::{drive, started, started_with};

// =============================================================================
// Construction
// =============================================================================

#[test]
fn every_game_builds_and_starts() {
    for kind in GameKind::ALL {
        let game = started(kind, 1);
        assert_eq!(game.kind(), kind);
        assert!(game.session().is_playing(), "{kind} did not start");
        let snapshot = game.snapshot();
        assert_eq!(snapshot.game, kind);
        assert_eq!(matches!(snapshot.world, WorldSnapshot::Grid(_)), kind.is_grid());
    }
}

#[test]
fn games_wait_in_the_menu() {
    for kind in GameKind::ALL {
        let mut game = build(kind, 1, None).unwrap();
        for _ in 0..30 {
            game.frame(&InputState::IDLE);
        }
        assert_eq!(game.session().phase(), Phase::Menu, "{kind}");
    }
}

#[test]
fn names_parse_back() {
    for kind in GameKind::ALL {
        assert_eq!(kind.name().parse::<GameKind>().unwrap(), kind);
    }
    assert_eq!(" Rally ".parse::<GameKind>().unwrap(), GameKind::Rally);
    assert!("pong".parse::<GameKind>().is_err());
}

#[test]
fn json_config_overrides_defaults() {
    let game = started_with(GameKind::River, 1, r#"{"lives": 5}"#);
    assert_eq!(game.session().lives(), 5);
}

#[test]
fn invalid_config_is_rejected() {
    let err = build(GameKind::River, 1, Some(r#"{"lives": 0}"#)).err().unwrap();
    assert!(matches!(err, ConfigError::Zero { field: "lives" }));

    let err = build(GameKind::Rally, 1, Some(r#"{"first_stage": 80}"#)).err().unwrap();
    assert!(matches!(err, ConfigError::OutOfRange { field: "first_stage", .. }));

    let err = build(GameKind::Heli, 1, Some("{lives")).err().unwrap();
    assert!(matches!(err, ConfigError::Json(_)));
}

// =============================================================================
// Tile games
// =============================================================================

#[test]
fn warehouse_solves_a_small_level_and_moves_on() {
    let mut game = Warehouse::new(WarehouseConfig::default(), strata::LevelCatalog::builtin()).unwrap();
    game.handle(Intent::ConfirmContinue);
    game.frame(&InputState::IDLE);
    game.load_level(&LevelDescriptor::from_rows(&["######", "#@$ .#", "######"]))
        .unwrap();

    let right = InputState {
        right: true,
        ..InputState::IDLE
    };
    let events: Vec<Event> = (0..30).flat_map(|_| game.frame(&right)).collect();
    assert!(events.iter().any(|e| matches!(e, Event::LevelComplete { level: 1, .. })));
    assert_eq!(game.session().pushes(), 2);

    game.handle(Intent::ConfirmContinue);
    assert_eq!(game.frame(&InputState::IDLE), vec![Event::LevelLoaded { level: 2 }]);
    assert_eq!(game.index(), 1);
}

#[test]
fn malformed_level_keeps_the_current_one() {
    let mut game = Railway::new(RailwayConfig::default(), strata::LevelCatalog::builtin()).unwrap();
    game.handle(Intent::ConfirmContinue);
    game.frame(&InputState::IDLE);
    let before = game.snapshot();
    assert!(game.load_level(&LevelDescriptor::from_rows(&["#####", "#   #", "#####"])).is_err());
    assert_eq!(game.snapshot(), before);
}

#[test]
fn railway_password_skips_ahead() {
    let mut game = build(GameKind::Railway, 0, None).unwrap();
    game.handle(Intent::EnterPassword("mydlo".into()));
    let events = game.frame(&InputState::IDLE);
    assert_eq!(events, vec![Event::LevelLoaded { level: 3 }]);
    assert!(game.session().is_playing());
}

// =============================================================================
// Field games
// =============================================================================

#[test]
fn river_runs_out_of_lives() {
    let mut game = started_with(GameKind::River, 2, r#"{"fuel_drain": 600.0, "hostile_chance": 0.0, "depot_chance": 0.0}"#);
    let events: Vec<Event> = (0..600).flat_map(|_| game.frame(&InputState::IDLE)).collect();
    let losses = events
        .iter()
        .filter(|e| matches!(e, Event::LifeLost { cause: LossCause::FuelDepleted, .. }))
        .count();
    assert_eq!(losses, 3);
    assert_eq!(events.last(), Some(&Event::GameOver));
    assert_eq!(game.session().phase(), Phase::GameOver);

    game.handle(Intent::ConfirmContinue);
    assert_eq!(game.frame(&InputState::IDLE)[0], Event::LevelLoaded { level: 1 });
    assert_eq!(game.session().lives(), 3);
}

#[test]
fn rally_drives_stage_after_stage() {
    let mut game = started_with(GameKind::Rally, 6, r#"{"traffic_scale": 0.0, "station_chance": 0.0, "first_stage": 33}"#);
    let gas = InputState {
        accelerate: true,
        ..InputState::IDLE
    };
    let events: Vec<Event> = (0..600).flat_map(|_| game.frame(&gas)).collect();
    let stages: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            Event::StageComplete { stage, .. } => Some(*stage),
            _ => None,
        })
        .collect();
    // Connecticut (200 km) then Rhode Island (100 km)
    assert_eq!(&stages[..2], &[34, 35]);
    assert!(game.session().level() >= 36);
}

#[test]
fn heli_pilot_can_starve() {
    let mut game = started_with(GameKind::Heli, 8, r#"{"energy_burn": 50.0, "pterosaur_base": 0, "pterosaur_per_level": 0}"#);
    let thrust = InputState {
        up: true,
        ..InputState::IDLE
    };
    let events: Vec<Event> = (0..20).flat_map(|_| game.frame(&thrust)).collect();
    assert!(events.contains(&Event::LifeLost {
        cause: LossCause::EnergyDepleted,
        lives_left: 0
    }));
    assert_eq!(game.session().phase(), Phase::GameOver);
}

#[test]
fn restart_resets_score_but_not_the_game() {
    for kind in [GameKind::River, GameKind::Rally, GameKind::Heli, GameKind::Digger] {
        let mut game = started(kind, 12);
        drive(game.as_mut(), 200);
        game.handle(Intent::Restart);
        let events = game.frame(&InputState::IDLE);
        if game.session().phase() == Phase::GameOver {
            continue;
        }
        assert!(events.contains(&Event::Restarted) || events.is_empty(), "{kind}");
        assert_eq!(game.kind(), kind);
    }
}

#[test]
fn digger_grid_shows_the_player() {
    let game = started(GameKind::Digger, 4);
    let snapshot = game.snapshot();
    let grid = snapshot.grid().unwrap();
    assert!(grid.player.is_some_and(|p: Pos| grid.grid.is_interior(p)));
}
