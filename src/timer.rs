//! Per-question countdown
//!
//! The timer stores the instant the current question started and recomputes
//! elapsed time on every tick, so missed ticks (a suspended tab, a busy host)
//! never make it drift. Ticks are delivered by the host as alarms; each alarm
//! carries the generation of the timer that scheduled it, and stopping or
//! restarting the timer bumps the generation so late alarms are ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Alarms scheduled by the question timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Recompute the elapsed time of the running question
    Tick {
        /// Generation of the timer that scheduled this tick
        generation: u64,
    },
}

/// Result of delivering a tick to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belongs to a stopped or restarted timer
    Stale,
    /// The timer is still running and shows this many seconds
    Running(u64),
    /// The ceiling has been reached and the timer stopped itself
    Expired,
}

/// Countdown state for the question on screen
#[derive(Debug, Clone)]
pub struct QuestionTimer {
    ceiling: Duration,
    interval: Duration,
    started_at: Option<Instant>,
    generation: u64,
    running: bool,
    displayed_seconds: u64,
}

impl QuestionTimer {
    /// Creates a stopped timer
    pub fn new(ceiling: Duration, interval: Duration) -> Self {
        Self {
            ceiling,
            interval,
            started_at: None,
            generation: 0,
            running: false,
            displayed_seconds: 0,
        }
    }

    /// Starts counting from zero at `now` and schedules the first tick
    pub fn start<S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        now: Instant,
        mut schedule_message: S,
    ) {
        self.generation += 1;
        self.running = true;
        self.started_at = Some(now);
        self.displayed_seconds = 0;

        schedule_message(
            AlarmMessage::Tick {
                generation: self.generation,
            }
            .into(),
            self.interval,
        );
    }

    /// Stops the timer, invalidating every tick already scheduled
    ///
    /// The start instant is kept so the elapsed time of the question can
    /// still be computed.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.generation += 1;
        }
    }

    /// Stops the timer and forgets the current question entirely
    pub fn clear(&mut self) {
        self.stop();
        self.started_at = None;
        self.displayed_seconds = 0;
    }

    /// Handles a tick scheduled by generation `generation`
    pub fn tick<S: FnMut(crate::AlarmMessage, Duration)>(
        &mut self,
        generation: u64,
        now: Instant,
        mut schedule_message: S,
    ) -> TickOutcome {
        if !self.running || generation != self.generation {
            return TickOutcome::Stale;
        }

        let elapsed = self.raw_elapsed_seconds(now);
        self.displayed_seconds = elapsed.min(self.ceiling.as_secs());

        if elapsed >= self.ceiling.as_secs() {
            self.stop();
            return TickOutcome::Expired;
        }

        schedule_message(AlarmMessage::Tick { generation }.into(), self.interval);
        TickOutcome::Running(self.displayed_seconds)
    }

    /// Whole seconds since the question started, clamped to the ceiling
    pub fn elapsed_seconds(&self, now: Instant) -> u64 {
        self.raw_elapsed_seconds(now).min(self.ceiling.as_secs())
    }

    fn raw_elapsed_seconds(&self, now: Instant) -> u64 {
        self.started_at
            .map(|started| now.saturating_duration_since(started).as_secs())
            .unwrap_or_default()
    }

    /// Seconds currently shown on the countdown
    pub fn displayed_seconds(&self) -> u64 {
        self.displayed_seconds
    }

    /// Whether ticks are currently being honoured
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generation of the currently scheduled ticks
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The configured ceiling
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }
}

/// Formats seconds as `m:ss`
///
/// Fractions are floored; negative and non-finite values read as zero.
pub fn format_time(seconds: f64) -> String {
    let safe = if seconds.is_finite() && seconds > 0. {
        seconds.floor() as u64
    } else {
        0
    };
    format_seconds(safe)
}

/// Formats whole seconds as `m:ss`
pub fn format_seconds(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
