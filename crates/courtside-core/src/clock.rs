//! Live game clock.
//!
//! The clock is the only mutable temporal state in a live session. It is
//! never persisted: every event captures the reading at the moment it was
//! recorded, and the replay derives everything else from those readings.
//!
//! # States
//!
//! The clock is either running or paused. [`LiveClock::tick`] only moves a
//! running clock. When the countdown reaches zero the clock stops itself and
//! reports [`TickOutcome::QuarterExpired`]; the session reacts to that by
//! closing the on-court intervals for the expiring period.

use courtside_replay::ClockReading;
use courtside_types::GameClock;

use crate::config::GameRulesConfig;

/// Errors that can occur when building a clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid game rules (e.g. zero-length quarters).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// What a single countdown tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was paused; nothing changed.
    Idle,
    /// One second elapsed.
    Ticked,
    /// The countdown hit zero and the clock stopped.
    QuarterExpired {
        /// The period that just ended.
        period: u32,
    },
}

/// Countdown clock for one live game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveClock {
    period: u32,
    sec_remaining: u32,
    is_running: bool,
    quarter_length_sec: u32,
    quarters_count: u32,
}

impl LiveClock {
    /// Create a paused clock at the start of period 1.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the quarter length or the
    /// quarter count is zero.
    pub fn new(rules: &GameRulesConfig) -> Result<Self, ClockError> {
        Self::from_parts(rules.quarter_length_sec, rules.quarters_count)
    }

    /// Create a paused clock from explicit rules.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if either value is zero.
    pub fn from_parts(quarter_length_sec: u32, quarters_count: u32) -> Result<Self, ClockError> {
        if quarter_length_sec == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "quarter_length_sec must be at least 1".to_owned(),
            });
        }
        if quarters_count == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "quarters_count must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            period: 1,
            sec_remaining: quarter_length_sec,
            is_running: false,
            quarter_length_sec,
            quarters_count,
        })
    }

    /// Move a paused clock to an arbitrary reading, e.g. when resuming a
    /// game from its log. The period is clamped into `1..=quarters_count`
    /// and the seconds to the quarter length.
    pub fn resume_at(&mut self, reading: ClockReading) {
        self.period = reading.period.clamp(1, self.quarters_count);
        self.sec_remaining = reading.sec_remaining.min(self.quarter_length_sec);
        self.is_running = false;
    }

    /// Start or stop the countdown. Returns whether the clock is now
    /// running.
    ///
    /// Unlike a plain flip of the running flag, a clock at zero stays
    /// stopped: reset the quarter or advance to the next one first.
    pub fn toggle(&mut self) -> bool {
        if !self.is_running && self.sec_remaining == 0 {
            tracing::warn!(period = self.period, "Clock at zero; reset or advance the quarter first");
            return false;
        }
        self.is_running = !self.is_running;
        self.is_running
    }

    /// Stop the countdown.
    pub const fn pause(&mut self) {
        self.is_running = false;
    }

    /// Advance the countdown by one second.
    pub const fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Idle;
        }
        self.sec_remaining = self.sec_remaining.saturating_sub(1);
        if self.sec_remaining == 0 {
            self.is_running = false;
            return TickOutcome::QuarterExpired {
                period: self.period,
            };
        }
        TickOutcome::Ticked
    }

    /// Stop and put the full quarter back on the clock. The period is kept.
    pub const fn reset_quarter(&mut self) {
        self.sec_remaining = self.quarter_length_sec;
        self.is_running = false;
    }

    /// Move to the next period with a full, stopped clock. Returns `false`
    /// (and changes nothing) in the final period.
    pub const fn next_quarter(&mut self) -> bool {
        if self.is_final_period() {
            return false;
        }
        self.period = self.period.saturating_add(1);
        self.sec_remaining = self.quarter_length_sec;
        self.is_running = false;
        true
    }

    /// Whether the current period is the last regulation period.
    pub const fn is_final_period(&self) -> bool {
        self.period >= self.quarters_count
    }

    /// Current period, starting at 1.
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// Seconds left in the current period.
    pub const fn sec_remaining(&self) -> u32 {
        self.sec_remaining
    }

    /// Whether the countdown is running.
    pub const fn is_running(&self) -> bool {
        self.is_running
    }

    /// Configured period length.
    pub const fn quarter_length_sec(&self) -> u32 {
        self.quarter_length_sec
    }

    /// Configured number of periods.
    pub const fn quarters_count(&self) -> u32 {
        self.quarters_count
    }

    /// The current reading, as used for playing-time accrual.
    pub const fn reading(&self) -> ClockReading {
        ClockReading::new(self.period, self.sec_remaining)
    }

    /// Snapshot for the UI.
    pub const fn snapshot(&self) -> GameClock {
        GameClock {
            period: self.period,
            sec_remaining: self.sec_remaining,
            is_running: self.is_running,
        }
    }
}
