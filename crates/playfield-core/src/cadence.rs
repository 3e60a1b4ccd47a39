//! Frame cadence and input rate limiting.
//!
//! Render callbacks arrive at a fixed rate. Slower rules (gravity) run on
//! every Nth callback via [`FrameCadence`], and held keys re-issue intents no
//! faster than [`RepeatGate`] allows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::intent::IntentKind;

/// Fires on every `every`-th call to [`FrameCadence::tick`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCadence {
    every: u32,
    counter: u32,
}

impl FrameCadence {
    /// Cadence firing once per `every` frames. Zero is treated as one.
    #[must_use]
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            counter: 0,
        }
    }

    /// Count one frame; true when this frame is a firing frame.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.every {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Restart the count (level load).
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Frames between firings.
    #[must_use]
    pub const fn every(&self) -> u32 {
        self.every
    }
}

/// Minimum frame spacing between accepted intents of the same kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatGate {
    interval: u64,
    last: BTreeMap<IntentKind, u64>,
}

impl RepeatGate {
    /// Gate admitting one intent per kind every `interval` frames.
    #[must_use]
    pub fn new(interval: u32) -> Self {
        Self {
            interval: u64::from(interval),
            last: BTreeMap::new(),
        }
    }

    /// Whether an intent of `kind` may be applied at `frame`. Admission is recorded.
    pub fn admit(&mut self, kind: IntentKind, frame: u64) -> bool {
        match self.last.get(&kind) {
            Some(&last) if frame.saturating_sub(last) < self.interval => false,
            _ => {
                self.last.insert(kind, frame);
                true
            }
        }
    }

    /// Forget every admission.
    pub fn reset(&mut self) {
        self.last.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadence_fires_every_nth_frame() {
        let mut cadence = FrameCadence::new(6);
        let fired: Vec<u32> = (1..=18).filter(|_| cadence.tick()).collect();
        assert_eq!(fired.len(), 3);
        let mut cadence = FrameCadence::new(6);
        let first = (1..=6).find(|_| cadence.tick());
        assert_eq!(first, Some(6));
    }

    #[test]
    fn zero_cadence_fires_every_frame() {
        let mut cadence = FrameCadence::new(0);
        assert!(cadence.tick());
        assert!(cadence.tick());
    }

    #[test]
    fn gate_spaces_same_kind() {
        let mut gate = RepeatGate::new(9);
        assert!(gate.admit(IntentKind::MoveLeft, 0));
        assert!(!gate.admit(IntentKind::MoveLeft, 1));
        assert!(!gate.admit(IntentKind::MoveLeft, 8));
        assert!(gate.admit(IntentKind::MoveLeft, 9));
    }

    #[test]
    fn gate_keys_are_independent() {
        let mut gate = RepeatGate::new(9);
        assert!(gate.admit(IntentKind::MoveLeft, 0));
        assert!(gate.admit(IntentKind::MoveUp, 1));
        gate.reset();
        assert!(gate.admit(IntentKind::MoveLeft, 2));
    }
}
