//! Cross-game tests.
//!
//! - `determinism.rs`: same seed and inputs give identical snapshots
//! - `integration.rs`: whole runs through the public [`Game`](crate::Game) API
//! - `properties.rs`: invariants under generated inputs (proptest)
//! - `helpers.rs`: setup and scripted input

mod determinism;
mod helpers;
mod integration;
mod properties;

pub use helpers::*;
