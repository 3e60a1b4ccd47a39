//! Invariants under generated input.

use proptest::prelude::*;
use strata::{CellKind, Grid, LevelCatalog, LevelDescriptor, Pos, WorldStore};

use crate::games::test_support::act;
use crate::games::{Game, Railway, RailwayConfig, River, RiverConfig, TileGame, Warehouse, WarehouseConfig};
use crate::gauge::ResourceGauge;
use crate::gravity::GravityRule;
use crate::intent::{InputState, Intent};
use crate::session::Session;

fn arb_move() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::MoveUp),
        Just(Intent::MoveDown),
        Just(Intent::MoveLeft),
        Just(Intent::MoveRight),
    ]
}

fn arb_tile_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        4 => arb_move(),
        1 => Just(Intent::Push),
        1 => Just(Intent::Undo),
    ]
}

fn arb_held() -> impl Strategy<Value = InputState> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(up, down, left, right)| InputState {
        up,
        down,
        left,
        right,
        ..InputState::IDLE
    })
}

fn arb_mine(size: u32) -> impl Strategy<Value = Grid> {
    let interior = ((size - 2) * (size - 2)) as usize;
    prop::collection::vec(
        prop_oneof![
            3 => Just(CellKind::Empty),
            2 => Just(CellKind::Dirt),
            2 => Just(CellKind::Rock),
            1 => Just(CellKind::Collectible),
            1 => Just(CellKind::Wall),
        ],
        interior,
    )
    .prop_map(move |cells| {
        let mut grid = Grid::bordered(size, size);
        let side = size - 2;
        for (i, kind) in cells.into_iter().enumerate() {
            let i = u32::try_from(i).unwrap();
            grid.set(Pos::new((1 + i % side) as i32, (1 + i / side) as i32), kind);
        }
        grid
    })
}

fn falls(kind: CellKind) -> bool {
    matches!(kind, CellKind::Rock | CellKind::Collectible)
}

fn warehouse() -> Warehouse {
    let mut game = Warehouse::new(WarehouseConfig::default(), LevelCatalog::builtin()).unwrap();
    act(&mut game, Intent::ConfirmContinue);
    game
}

const YARD: [&str; 6] = ["#########", "#@ $  . #", "#  $ #  #", "# $  . .#", "#       #", "#########"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gravity_moves_at_most_one_cell(grid in arb_mine(10), seed in any::<u64>()) {
        let before = grid.clone();
        let mut store = WorldStore::from_grid(grid, seed);
        GravityRule::default().apply(&mut store);
        let after = store.grid();

        let count = |g: &Grid| g.positions().filter(|&p| falls(g.get(p))).count();
        prop_assert_eq!(count(after), count(&before));
        for pos in after.positions().filter(|&p| falls(after.get(p))) {
            let origins = [pos, pos.offset(0, -1), pos.offset(-1, 0), pos.offset(1, 0)];
            prop_assert!(origins.iter().any(|&o| falls(before.get(o))), "{:?} came from nowhere", pos);
        }
        prop_assert_eq!(after.count(CellKind::Wall), before.count(CellKind::Wall));
    }

    #[test]
    fn warehouse_never_loses_a_crate(intents in prop::collection::vec(arb_tile_intent(), 1..60)) {
        let mut game = warehouse();
        let grid = &game.level().grid;
        let crates = grid.count(CellKind::Box) + grid.count(CellKind::BoxOnGoal);
        for intent in intents {
            act(&mut game, intent);
            let grid = &game.level().grid;
            prop_assert_eq!(grid.count(CellKind::Box) + grid.count(CellKind::BoxOnGoal), crates);
        }
    }

    #[test]
    fn undoing_everything_restores_the_start(moves in prop::collection::vec(arb_move(), 1..40)) {
        let mut game = warehouse();
        let start = game.level().grid.clone();
        let player = game.level().player;
        for intent in moves {
            act(&mut game, intent);
        }
        while game.session().moves() > 0 {
            act(&mut game, Intent::Undo);
        }
        prop_assert_eq!(&game.level().grid, &start);
        prop_assert_eq!(game.level().player, player);
        prop_assert_eq!(game.session().pushes(), 0);
    }

    #[test]
    fn convoy_stays_coupled(intents in prop::collection::vec(arb_tile_intent(), 1..80)) {
        let mut game = Railway::new(RailwayConfig::default(), LevelCatalog::builtin()).unwrap();
        act(&mut game, Intent::ConfirmContinue);
        game.load_level(&LevelDescriptor::from_rows(&YARD)).unwrap();
        for intent in intents {
            act(&mut game, intent);
            let convoy = game.convoy();
            let mut links = std::iter::once(convoy.head()).chain(convoy.cars().iter().copied()).collect::<Vec<_>>();
            for pair in links.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert_eq!((a.x - b.x).abs() + (a.y - b.y).abs(), 1);
            }
            let len = links.len();
            links.sort();
            links.dedup();
            prop_assert_eq!(links.len(), len);
            prop_assert_eq!(convoy.len() + game.wagons_left(), 3);
        }
    }

    #[test]
    fn gauge_stays_in_range(ops in prop::collection::vec((any::<bool>(), -50.0f64..150.0), 1..100)) {
        let mut gauge = ResourceGauge::new(100.0);
        for (fill, amount) in ops {
            if fill {
                gauge.refill(amount);
            } else {
                gauge.drain(amount);
            }
            prop_assert!((0.0..=100.0).contains(&gauge.value()));
        }
    }

    #[test]
    fn score_never_goes_negative(ops in prop::collection::vec((any::<bool>(), 0.0f64..500.0), 1..100)) {
        let mut session = Session::new(3, 0);
        session.start();
        for (earn, amount) in ops {
            if earn {
                session.add_score(amount);
            } else {
                session.deduct(amount);
            }
            prop_assert!(session.score() >= 0.0);
        }
    }

    #[test]
    fn river_craft_stays_on_screen(held in prop::collection::vec(arb_held(), 1..200)) {
        let config = RiverConfig::default().without_spawns();
        let (w, h) = (config.width, config.height);
        let mut game = River::new(config, 1);
        act(&mut game, Intent::ConfirmContinue);
        for keys in held {
            game.frame(&keys);
            if let Some(craft) = game.craft() {
                let p = craft.body().position;
                prop_assert!(p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= h);
            }
        }
    }
}
