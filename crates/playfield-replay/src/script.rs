//! Scripted input files.
//!
//! One command per line, optionally prefixed with `@FRAME`:
//!
//! ```text
//! # comment
//! @0   confirm
//! @30  hold right
//! @90  release right
//!      shoot              # no prefix: one frame after the previous line
//! @120 password KRONE
//! ```
//!
//! Discrete commands (`up`, `down`, `left`, `right`, `push`, `shoot`,
//! `accelerate`, `brake`, `undo`, `restart`, `confirm`, `password WORD`) are
//! queued with `Game::handle`; `hold KEY` and `release KEY` change the keys
//! passed to every following frame.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Context, Result};
use playfield_core::{InputState, Intent};

/// One scheduled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Queue a discrete intent
    Press(Intent),
    /// Start holding a key
    Hold(Intent),
    /// Stop holding a key
    Release(Intent),
}

/// Commands by frame, in file order within a frame.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: BTreeMap<u64, Vec<Step>>,
}

impl Script {
    /// Parse script text.
    ///
    /// # Errors
    ///
    /// Fails on the first unreadable line, naming it.
    pub fn parse(text: &str) -> Result<Self> {
        let mut script = Self::default();
        let mut next = 0;
        for (index, raw) in text.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let (frame, step) = parse_line(line, next).with_context(|| format!("line {}: {raw:?}", index + 1))?;
            script.push(frame, step);
            next = frame + 1;
        }
        Ok(script)
    }

    /// Schedule `step` at `frame`, after anything already there.
    pub fn push(&mut self, frame: u64, step: Step) {
        self.steps.entry(frame).or_default().push(step);
    }

    /// Add every command of `other`, after the ones already scheduled.
    pub fn merge(&mut self, other: Script) {
        for (frame, steps) in other.steps {
            self.steps.entry(frame).or_default().extend(steps);
        }
    }

    /// Commands for `frame`.
    pub fn at(&self, frame: u64) -> &[Step] {
        self.steps.get(&frame).map(Vec::as_slice).unwrap_or_default()
    }

    /// Last frame with a command.
    pub fn last_frame(&self) -> Option<u64> {
        self.steps.keys().next_back().copied()
    }

    /// Number of scheduled commands.
    pub fn len(&self) -> usize {
        self.steps.values().map(Vec::len).sum()
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply `frame`'s commands: presses are returned for queueing, holds
    /// and releases update `held`.
    pub fn apply(&self, frame: u64, held: &mut InputState) -> Vec<Intent> {
        let mut presses = Vec::new();
        for step in self.at(frame) {
            match step {
                Step::Press(intent) => presses.push(intent.clone()),
                Step::Hold(intent) => held.press(intent),
                Step::Release(intent) => held.release(intent),
            }
        }
        presses
    }
}

fn parse_line(line: &str, next: u64) -> Result<(u64, Step)> {
    let (frame, rest) = match line.strip_prefix('@') {
        Some(tagged) => {
            let (number, rest) = tagged.split_once(char::is_whitespace).ok_or_else(|| anyhow!("missing command"))?;
            let frame = number.parse().with_context(|| format!("bad frame number {number:?}"))?;
            (frame, rest.trim())
        }
        None => (next, line),
    };

    let mut words = rest.split_whitespace();
    let verb = words.next().ok_or_else(|| anyhow!("missing command"))?.to_ascii_lowercase();
    let step = match verb.as_str() {
        "hold" | "release" => {
            let key = words.next().ok_or_else(|| anyhow!("{verb} needs a key"))?;
            let intent = key_intent(key)?;
            if verb == "hold" {
                Step::Hold(intent)
            } else {
                Step::Release(intent)
            }
        }
        "password" => {
            let word = words.next().ok_or_else(|| anyhow!("password needs a word"))?;
            Step::Press(Intent::EnterPassword(word.to_string()))
        }
        "push" => Step::Press(Intent::Push),
        "undo" => Step::Press(Intent::Undo),
        "restart" => Step::Press(Intent::Restart),
        "confirm" | "continue" => Step::Press(Intent::ConfirmContinue),
        other => Step::Press(key_intent(other)?),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected {extra:?}");
    }
    Ok((frame, step))
}

fn key_intent(key: &str) -> Result<Intent> {
    Ok(match key.to_ascii_lowercase().as_str() {
        "up" => Intent::MoveUp,
        "down" => Intent::MoveDown,
        "left" => Intent::MoveLeft,
        "right" => Intent::MoveRight,
        "shoot" | "fire" => Intent::Shoot,
        "accelerate" | "gas" => Intent::Accelerate,
        "brake" => Intent::Brake,
        other => bail!("unknown key {other:?}"),
    })
}
