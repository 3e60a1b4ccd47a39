//! Session and progress tracking.
//!
//! A [`Session`] holds everything about a run that is not world state: the
//! phase machine, score, lives, level number, move/push/collect counters and
//! the primary resource gauge. Only rule code mutates it.
//!
//! ```text
//! Menu -> Playing <-> LevelComplete -> Playing (next level) | Victory
//!            |  \
//!            |   Respawning{frames_left} -> Playing
//!            v
//!         GameOver
//! ```

use serde::{Deserialize, Serialize};

use crate::gauge::ResourceGauge;

/// Where a run stands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the first `ConfirmContinue`.
    #[default]
    Menu,
    /// Simulation advancing and accepting commands.
    Playing,
    /// Level finished; waiting for `ConfirmContinue` (or undo).
    LevelComplete,
    /// A life was lost; the level restarts when the timer runs out.
    Respawning {
        /// Frames until respawn
        frames_left: u32,
    },
    /// No lives left.
    GameOver,
    /// The last level or stage was completed.
    Victory,
}

impl Phase {
    /// True for `GameOver` and `Victory`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

/// Why a life was lost.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossCause {
    /// A falling cell landed on the player.
    Crushed,
    /// Hard-body collision with a hostile or obstacle.
    Collision,
    /// Left the navigable lane.
    OffCourse,
    /// Fuel ran out.
    FuelDepleted,
    /// Energy ran out.
    EnergyDepleted,
    /// Health reached zero.
    Wrecked,
}

/// Outcome of [`Session::lose_life`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLoss {
    /// Not playing; nothing changed.
    Ignored,
    /// A life was spent and play continues immediately.
    Continue {
        /// Lives remaining
        lives_left: u32,
    },
    /// A life was spent and a respawn timer is running.
    Respawning {
        /// Lives remaining
        lives_left: u32,
    },
    /// The last life was spent.
    GameOver,
}

/// Timer-driven transitions reported by [`Session::tick_phase`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseSignal {
    /// The respawn timer ran out; the level should be rebuilt.
    Respawn,
}

/// Score, lives, level and counters for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    phase: Phase,
    score: f64,
    lives: u32,
    starting_lives: u32,
    level: u32,
    moves: u32,
    pushes: u32,
    collected: u32,
    gauge: Option<ResourceGauge>,
    respawn_delay: u32,
}

impl Session {
    /// A session in the menu with `lives` lives. A zero `respawn_delay`
    /// continues play immediately after a life loss.
    #[must_use]
    pub fn new(lives: u32, respawn_delay: u32) -> Self {
        Self {
            phase: Phase::Menu,
            score: 0.0,
            lives,
            starting_lives: lives,
            level: 1,
            moves: 0,
            pushes: 0,
            collected: 0,
            gauge: None,
            respawn_delay,
        }
    }

    /// Attach a primary resource gauge.
    #[must_use]
    pub fn with_gauge(mut self, gauge: ResourceGauge) -> Self {
        self.gauge = Some(gauge);
        self
    }

    /// Begin a fresh run at level 1: score, lives and counters reset.
    pub fn start(&mut self) {
        self.score = 0.0;
        self.lives = self.starting_lives;
        self.level = 1;
        self.reset_counters();
        if let Some(gauge) = &mut self.gauge {
            gauge.fill();
        }
        self.phase = Phase::Playing;
        tracing::info!("run started");
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// True while commands and ticks apply.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Accumulated score.
    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Level (or stage) number, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Accepted moves on this level.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Accepted pushes on this level.
    #[must_use]
    pub const fn pushes(&self) -> u32 {
        self.pushes
    }

    /// Items collected on this level.
    #[must_use]
    pub const fn collected(&self) -> u32 {
        self.collected
    }

    /// The primary gauge, if the game has one.
    #[must_use]
    pub const fn gauge(&self) -> Option<&ResourceGauge> {
        self.gauge.as_ref()
    }

    /// Mutable primary gauge.
    pub fn gauge_mut(&mut self) -> Option<&mut ResourceGauge> {
        self.gauge.as_mut()
    }

    /// Add a non-negative amount to the score.
    pub fn add_score(&mut self, amount: f64) {
        self.score += amount.max(0.0);
    }

    /// Subtract from the score, never going below zero.
    pub fn deduct(&mut self, amount: f64) {
        self.score = (self.score - amount.max(0.0)).max(0.0);
    }

    /// Overwrite the score (undo).
    pub fn restore_score(&mut self, score: f64) {
        self.score = score.max(0.0);
    }

    /// Count one accepted move, and one push if `pushed`.
    pub fn record_move(&mut self, pushed: bool) {
        self.moves += 1;
        if pushed {
            self.pushes += 1;
        }
    }

    /// Count one collected item; returns the new total.
    pub fn record_collect(&mut self) -> u32 {
        self.collected += 1;
        self.collected
    }

    /// Overwrite the per-level counters (undo).
    pub fn restore_counters(&mut self, moves: u32, pushes: u32, collected: u32) {
        self.moves = moves;
        self.pushes = pushes;
        self.collected = collected;
    }

    /// Zero the per-level counters (level load).
    pub fn reset_counters(&mut self) {
        self.restore_counters(0, 0, 0);
    }

    /// Spend a life. Only acts while playing, so a second loss in the same
    /// frame is ignored.
    pub fn lose_life(&mut self, cause: LossCause) -> LifeLoss {
        if self.phase != Phase::Playing {
            return LifeLoss::Ignored;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = Phase::GameOver;
            tracing::info!(?cause, score = self.score, "game over");
            return LifeLoss::GameOver;
        }
        tracing::debug!(?cause, lives_left = self.lives, "life lost");
        if self.respawn_delay == 0 {
            LifeLoss::Continue {
                lives_left: self.lives,
            }
        } else {
            self.phase = Phase::Respawning {
                frames_left: self.respawn_delay,
            };
            LifeLoss::Respawning {
                lives_left: self.lives,
            }
        }
    }

    /// Advance phase timers by one frame.
    pub fn tick_phase(&mut self) -> Option<PhaseSignal> {
        if let Phase::Respawning { frames_left } = self.phase {
            let frames_left = frames_left.saturating_sub(1);
            if frames_left == 0 {
                self.phase = Phase::Playing;
                return Some(PhaseSignal::Respawn);
            }
            self.phase = Phase::Respawning { frames_left };
        }
        None
    }

    /// Finish the current level, adding `bonus`. Only acts while playing.
    pub fn complete_level(&mut self, bonus: f64) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.add_score(bonus);
        self.phase = Phase::LevelComplete;
        tracing::info!(level = self.level, bonus, score = self.score, "level complete");
        true
    }

    /// Leave `LevelComplete`: advance to the next level when `has_next`,
    /// otherwise finish the run. Returns the new level number if play resumes.
    pub fn confirm_continue(&mut self, has_next: bool) -> Option<u32> {
        if self.phase != Phase::LevelComplete {
            return None;
        }
        if has_next {
            self.level += 1;
            self.reset_counters();
            self.phase = Phase::Playing;
            Some(self.level)
        } else {
            self.phase = Phase::Victory;
            tracing::info!(score = self.score, "victory");
            None
        }
    }

    /// Advance the level number without leaving `Playing` (stage progression).
    pub fn advance_level(&mut self) {
        self.level += 1;
    }

    /// Jump to a level number and resume play (password entry).
    pub fn jump_to_level(&mut self, level: u32) {
        self.level = level.max(1);
        self.reset_counters();
        self.phase = Phase::Playing;
    }

    /// Finish the run with a win (last stage passed while playing).
    pub fn declare_victory(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Victory;
            tracing::info!(score = self.score, "victory");
        }
    }

    /// Drop a pending respawn. Returns true if one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        if matches!(self.phase, Phase::Respawning { .. }) {
            self.phase = Phase::Playing;
            true
        } else {
            false
        }
    }

    /// Return from `LevelComplete` to `Playing` (undo of the finishing move).
    pub fn reopen_level(&mut self) -> bool {
        if self.phase == Phase::LevelComplete {
            self.phase = Phase::Playing;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(lives: u32, delay: u32) -> Session {
        let mut session = Session::new(lives, delay);
        session.start();
        session
    }

    mod phase_tests {
        use super::*;

        #[test]
        fn starts_in_menu() {
            let session = Session::new(3, 60);
            assert_eq!(session.phase(), Phase::Menu);
            assert_eq!(session.level(), 1);
        }

        #[test]
        fn respawn_timer_counts_down() {
            let mut session = playing(3, 3);
            assert_eq!(
                session.lose_life(LossCause::Crushed),
                LifeLoss::Respawning { lives_left: 2 }
            );
            assert_eq!(session.tick_phase(), None);
            assert_eq!(session.tick_phase(), None);
            assert_eq!(session.tick_phase(), Some(PhaseSignal::Respawn));
            assert!(session.is_playing());
        }

        #[test]
        fn last_life_ends_the_run() {
            let mut session = playing(1, 60);
            assert_eq!(session.lose_life(LossCause::Collision), LifeLoss::GameOver);
            assert_eq!(session.phase(), Phase::GameOver);
            assert!(session.phase().is_terminal());
        }

        #[test]
        fn losses_outside_play_are_ignored() {
            let mut session = playing(3, 60);
            session.lose_life(LossCause::Crushed);
            assert_eq!(session.lose_life(LossCause::Crushed), LifeLoss::Ignored);
            assert_eq!(session.lives(), 2);
        }

        #[test]
        fn zero_delay_continues_immediately() {
            let mut session = playing(3, 0);
            assert_eq!(
                session.lose_life(LossCause::FuelDepleted),
                LifeLoss::Continue { lives_left: 2 }
            );
            assert!(session.is_playing());
        }

        #[test]
        fn cancel_pending_drops_respawn() {
            let mut session = playing(3, 60);
            session.lose_life(LossCause::Crushed);
            assert!(session.cancel_pending());
            assert!(session.is_playing());
            assert!(!session.cancel_pending());
        }
    }

    mod level_tests {
        use super::*;

        #[test]
        fn complete_then_continue() {
            let mut session = playing(3, 60);
            session.record_move(true);
            assert!(session.complete_level(50.0));
            assert_eq!(session.score(), 50.0);
            assert_eq!(session.confirm_continue(true), Some(2));
            assert_eq!(session.moves(), 0);
            assert!(session.is_playing());
        }

        #[test]
        fn continue_without_next_is_victory() {
            let mut session = playing(3, 60);
            session.complete_level(0.0);
            assert_eq!(session.confirm_continue(false), None);
            assert_eq!(session.phase(), Phase::Victory);
        }

        #[test]
        fn reopen_only_from_complete() {
            let mut session = playing(3, 60);
            assert!(!session.reopen_level());
            session.complete_level(0.0);
            assert!(session.reopen_level());
            assert!(session.is_playing());
        }
    }

    mod score_tests {
        use super::*;

        #[test]
        fn deduct_clamps_at_zero() {
            let mut session = playing(3, 0);
            session.add_score(0.25);
            session.deduct(0.1);
            assert!((session.score() - 0.15).abs() < 1e-12);
            session.deduct(5.0);
            assert_eq!(session.score(), 0.0);
        }

        #[test]
        fn negative_awards_are_ignored() {
            let mut session = playing(3, 0);
            session.add_score(-10.0);
            assert_eq!(session.score(), 0.0);
        }

        #[test]
        fn start_refills_gauge() {
            let mut session =
                Session::new(3, 0).with_gauge(ResourceGauge::with_value(100.0, 10.0));
            session.start();
            assert_eq!(session.gauge().map(ResourceGauge::value), Some(100.0));
        }
    }
}
