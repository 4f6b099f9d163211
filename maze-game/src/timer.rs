//! Elapsed-time bookkeeping for practice and live runs.
//!
//! Practice time is a local counter advanced once per scheduler tick. Live
//! time is never accumulated: every read derives it from the server-issued
//! start timestamp, so reloads and other tabs agree on the value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TimerAnchor {
    Local { ticks: u64 },
    Server { start_time: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTimer {
    anchor: TimerAnchor,
    frozen: Option<u64>,
}

impl ElapsedTimer {
    #[must_use]
    pub const fn practice() -> Self {
        Self {
            anchor: TimerAnchor::Local { ticks: 0 },
            frozen: None,
        }
    }

    #[must_use]
    pub const fn live(start_time: DateTime<Utc>) -> Self {
        Self {
            anchor: TimerAnchor::Server { start_time },
            frozen: None,
        }
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self.anchor, TimerAnchor::Server { .. })
    }

    /// Advance one scheduler tick and return the value to display.
    pub fn tick(&mut self, now: DateTime<Utc>) -> u64 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        if let TimerAnchor::Local { ticks } = &mut self.anchor {
            *ticks = ticks.saturating_add(1);
        }
        self.elapsed_secs(now)
    }

    /// Current value without advancing anything.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        match self.anchor {
            TimerAnchor::Local { ticks } => ticks,
            TimerAnchor::Server { start_time } => derive_live_elapsed(start_time, now),
        }
    }

    /// Stop the clock, keeping the value at `now`. Later calls keep the first value.
    pub fn freeze(&mut self, now: DateTime<Utc>) -> u64 {
        let value = self.elapsed_secs(now);
        *self.frozen.get_or_insert(value)
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }
}

/// Whole seconds between `start_time` and `now`, clamped at zero for clock skew.
#[must_use]
pub fn derive_live_elapsed(start_time: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - start_time).num_seconds()).unwrap_or(0)
}

/// Format seconds as `MM:SS`; minutes keep counting past an hour.
#[must_use]
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn practice_counts_ticks() {
        let mut timer = ElapsedTimer::practice();
        assert_eq!(timer.elapsed_secs(at(0)), 0);
        timer.tick(at(0));
        timer.tick(at(0));
        assert_eq!(timer.tick(at(0)), 3);
        assert!(!timer.is_live());
    }

    #[test]
    fn live_derives_from_start() {
        let start = at(0);
        let mut timer = ElapsedTimer::live(start);
        assert_eq!(timer.tick(start + TimeDelta::seconds(65)), 65);
        assert_eq!(timer.elapsed_secs(start + TimeDelta::milliseconds(65_900)), 65);
        assert!(timer.is_live());
    }

    #[test]
    fn live_is_stable_for_same_now() {
        let start = at(0);
        let now = start + TimeDelta::seconds(42);
        let mut timer = ElapsedTimer::live(start);
        let first = timer.tick(now);
        let second = timer.tick(now);
        assert_eq!(first, second);
    }

    #[test]
    fn negative_elapsed_clamps_to_zero() {
        let start = at(100);
        assert_eq!(derive_live_elapsed(start, at(40)), 0);
        assert_eq!(ElapsedTimer::live(start).elapsed_secs(at(0)), 0);
    }

    #[test]
    fn freeze_holds_first_value() {
        let start = at(0);
        let mut timer = ElapsedTimer::live(start);
        assert_eq!(timer.freeze(at(30)), 30);
        assert_eq!(timer.freeze(at(90)), 30);
        assert_eq!(timer.tick(at(120)), 30);
        assert!(timer.is_frozen());

        let mut practice = ElapsedTimer::practice();
        practice.tick(at(0));
        practice.freeze(at(0));
        assert_eq!(practice.tick(at(0)), 1);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }
}
