//! Bounded resource gauges (fuel, energy).

use serde::{Deserialize, Serialize};

/// Result of draining a gauge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drain {
    /// Some resource remains.
    Remaining,
    /// This drain emptied the gauge. Reported once per depletion.
    Depleted,
    /// The gauge was already empty.
    Empty,
}

/// A value in `[0, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGauge {
    value: f64,
    max: f64,
}

impl ResourceGauge {
    /// A full gauge.
    #[must_use]
    pub fn new(max: f64) -> Self {
        Self { value: max, max }
    }

    /// A gauge holding `value`, clamped into range.
    #[must_use]
    pub fn with_value(max: f64, value: f64) -> Self {
        Self {
            value: value.clamp(0.0, max),
            max,
        }
    }

    /// Current level.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Capacity.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Level as a fraction of capacity.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.max > 0.0 {
            self.value / self.max
        } else {
            0.0
        }
    }

    /// True at zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }

    /// Remove `amount`, clamping at zero.
    pub fn drain(&mut self, amount: f64) -> Drain {
        if self.is_empty() {
            return Drain::Empty;
        }
        self.value = (self.value - amount.max(0.0)).max(0.0);
        if self.is_empty() {
            Drain::Depleted
        } else {
            Drain::Remaining
        }
    }

    /// Add `amount`, clamping at `max`. Returns the amount actually added.
    pub fn refill(&mut self, amount: f64) -> f64 {
        let before = self.value;
        self.value = (self.value + amount.max(0.0)).min(self.max);
        self.value - before
    }

    /// Refill to capacity.
    pub fn fill(&mut self) {
        self.value = self.max;
    }
}
