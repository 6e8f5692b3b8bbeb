//! Simulation time
//!
//! Every time-dependent rule (spawn schedules, black hole age, speed bonus
//! window) reads simulation time from here instead of a wall clock, so pausing
//! freezes all of them at once and resuming continues from the frozen values.

use serde::{Deserialize, Serialize};

/// Survival clock, advanced only while the session is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    elapsed_ms: f64,
}

impl SimClock {
    /// Milliseconds of simulated survival
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Advance by `dt_ms`; negative deltas are ignored so time stays monotonic
    pub fn advance(&mut self, dt_ms: f64) {
        if dt_ms > 0.0 {
            self.elapsed_ms += dt_ms;
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }
}

/// Fires once each time more than an interval has elapsed since it last fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    last_fired_ms: f64,
}

impl SpawnTimer {
    /// Returns true (and rearms) when `now_ms - last > interval_ms`
    pub fn fire(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        if now_ms - self.last_fired_ms > interval_ms {
            self.last_fired_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn last_fired_ms(&self) -> f64 {
        self.last_fired_ms
    }

    pub fn reset(&mut self) {
        self.last_fired_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ignores_negative_delta() {
        let mut clock = SimClock::default();
        clock.advance(16.0);
        clock.advance(-5.0);
        assert_eq!(clock.now_ms(), 16.0);
        clock.reset();
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_timer_fires_strictly_after_interval() {
        let mut timer = SpawnTimer::default();
        assert!(!timer.fire(2000.0, 2000.0));
        assert!(timer.fire(2000.5, 2000.0));
        assert_eq!(timer.last_fired_ms(), 2000.5);
        assert!(!timer.fire(3000.0, 2000.0));
        assert!(timer.fire(4001.0, 2000.0));
    }
}
