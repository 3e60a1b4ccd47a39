//! Playfield Replay: headless driver for the playfield games.
//!
//! Builds one game, feeds it a scripted intent file frame by frame and prints
//! the final snapshot or its digest. With `--seeds` the same script runs
//! against a range of seeds in parallel, one session per thread.

mod script;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use playfield_core::{build, hash_snapshot, GameKind, InputState, Intent, Snapshot};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use script::{Script, Step};

/// Replay scripted input against a playfield game.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game to run: digger, warehouse, railway, river, rally or heli.
    #[arg(short, long, value_parser = parse_game)]
    game: GameKind,
    /// Seed for the game's random stream (first seed of a sweep).
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Frames to run. Extended to cover the last scripted frame.
    #[arg(short, long, default_value_t = 600)]
    frames: u64,
    /// Intent script, one command per line with an optional `@FRAME` prefix.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
    /// Password entered on frame 0 instead of confirming from the menu.
    #[arg(long, value_name = "PASSWORD")]
    level: Option<String>,
    /// JSON file overriding the game's default tuning.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Run this many consecutive seeds in parallel and print one digest each.
    #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    seeds: Option<u64>,
    /// Print JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

fn parse_game(name: &str) -> Result<GameKind, playfield_core::UnknownGame> {
    name.parse()
}

/// Outcome of one replay.
#[derive(Debug, Clone, Serialize)]
struct Run {
    game: GameKind,
    seed: u64,
    frames: u64,
    events: usize,
    digest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<Snapshot>,
}

impl Run {
    fn summary(&self) -> String {
        match &self.snapshot {
            Some(snapshot) => {
                let session = &snapshot.session;
                format!(
                    "{} seed={} frames={} events={} phase={:?} level={} score={} lives={} digest={}",
                    self.game,
                    self.seed,
                    self.frames,
                    self.events,
                    session.phase,
                    session.level,
                    session.score,
                    session.lives,
                    self.digest
                )
            }
            None => format!("{} {}", self.seed, self.digest),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("playfield=info".parse()?))
        .init();

    let cli = Cli::parse();

    let config = cli
        .config
        .as_ref()
        .map(|path| fs::read_to_string(path).with_context(|| format!("reading config {}", path.display())))
        .transpose()?;
    let plan = plan(&cli)?;
    let frames = plan.last_frame().map_or(cli.frames, |last| cli.frames.max(last + 1));

    match cli.seeds {
        Some(count) => {
            tracing::info!(game = %cli.game, first = cli.seed, count, frames, "seed sweep");
            let seeds: Vec<u64> = (0..count).map(|offset| cli.seed.wrapping_add(offset)).collect();
            let runs = seeds
                .par_iter()
                .map(|&seed| replay(cli.game, seed, config.as_deref(), &plan, frames, false))
                .collect::<Result<Vec<_>>>()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&runs)?);
            } else {
                for run in &runs {
                    println!("{}", run.summary());
                }
            }
        }
        None => {
            let run = replay(cli.game, cli.seed, config.as_deref(), &plan, frames, true)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                println!("{}", run.summary());
            }
        }
    }
    Ok(())
}

/// The script to run: the file's commands, after a frame-0 password, or a
/// frame-0 confirm when neither a password nor a script is given.
fn plan(cli: &Cli) -> Result<Script> {
    let mut plan = Script::default();
    if let Some(word) = &cli.level {
        plan.push(0, Step::Press(Intent::EnterPassword(word.clone())));
    } else if cli.script.is_none() {
        plan.push(0, Step::Press(Intent::ConfirmContinue));
    }
    if let Some(path) = &cli.script {
        let text = fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
        let parsed = Script::parse(&text).with_context(|| format!("parsing script {}", path.display()))?;
        tracing::debug!(commands = parsed.len(), "script loaded");
        plan.merge(parsed);
    }
    Ok(plan)
}

fn replay(kind: GameKind, seed: u64, config: Option<&str>, plan: &Script, frames: u64, keep: bool) -> Result<Run> {
    let mut game = build(kind, seed, config).with_context(|| format!("building {kind}"))?;
    let mut held = InputState::IDLE;
    let mut events = 0;

    for frame in 0..frames {
        for intent in plan.apply(frame, &mut held) {
            game.handle(intent);
        }
        for event in game.frame(&held) {
            tracing::debug!(frame, seed, ?event);
            events += 1;
        }
    }

    let snapshot = game.snapshot();
    let digest = format!("{:016x}", hash_snapshot(&snapshot));
    tracing::info!(game = %kind, seed, frames, phase = ?snapshot.session.phase, %digest, "replay finished");
    Ok(Run {
        game: kind,
        seed,
        frames,
        events,
        digest,
        snapshot: keep.then_some(snapshot),
    })
}
