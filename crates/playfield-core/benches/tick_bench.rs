use criterion::{black_box, criterion_group, criterion_main, Criterion};
use playfield_core::games::{Digger, DiggerConfig, River, RiverConfig};
use playfield_core::{build, Game, GameKind, InputState, Intent};

fn started(game: &mut dyn Game) {
    game.handle(Intent::ConfirmContinue);
    game.frame(&InputState::IDLE);
}

fn bench_digger_frame(c: &mut Criterion) {
    // Gravity on every frame so each iteration does a full grid pass
    let config = DiggerConfig {
        gravity_every: 1,
        ..DiggerConfig::default()
    };
    let mut game = Digger::new(config, 7);
    started(&mut game);

    c.bench_function("digger_frame", |b| {
        b.iter(|| black_box(game.frame(black_box(&InputState::IDLE))))
    });
}

fn bench_river_frame(c: &mut Criterion) {
    let mut game = River::new(RiverConfig::default(), 7);
    started(&mut game);
    let held = InputState {
        shoot: true,
        ..InputState::IDLE
    };

    c.bench_function("river_frame", |b| b.iter(|| black_box(game.frame(black_box(&held)))));
}

fn bench_snapshot_hash(c: &mut Criterion) {
    let mut game = build(GameKind::Rally, 7, None).expect("stock rally config");
    started(game.as_mut());
    for _ in 0..300 {
        game.frame(&InputState::IDLE);
    }

    c.bench_function("snapshot_hash", |b| {
        b.iter(|| black_box(playfield_core::hash_snapshot(&game.snapshot())))
    });
}

criterion_group!(benches, bench_digger_frame, bench_river_frame, bench_snapshot_hash);
criterion_main!(benches);
