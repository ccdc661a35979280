//! Fixed-period sample clock.
//!
//! Pure time comparison, polled from the control loop. On every fired tick
//! the anchor moves forward by exactly one period, never to `now`, so late
//! polls are caught up on the following iterations and the virtual clock
//! never slips against wall time.
//!
//! ```text
//! ideal:   |----|----|----|----|----|
//! polls:     ^   ^        ^ ^ ^  ^
//! fires:     1   2        3 4    5
//! ```

/// Returns true when at least one `period_us` has elapsed since `last_tick_us`.
///
/// A `last_tick_us` in the future counts as no time elapsed.
#[inline]
pub fn tick_due(now_us: u64, last_tick_us: u64, period_us: u64) -> bool {
    now_us.saturating_sub(last_tick_us) >= period_us
}

/// Sample clock with drift-free anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleClock {
    /// Tick period in microseconds (never 0)
    period_us: u64,
    /// Ideal timestamp of the last fired tick
    anchor_us: u64,
}

impl SampleClock {
    /// Create clock with given period, anchored at 0.
    ///
    /// A zero period is raised to 1 µs.
    pub const fn new(period_us: u64) -> Self {
        Self {
            period_us: if period_us == 0 { 1 } else { period_us },
            anchor_us: 0,
        }
    }

    /// Create clock for a sample rate in Hz (`1_000_000 / rate` µs).
    pub const fn from_rate(sample_rate_hz: u32) -> Self {
        let period_us = if sample_rate_hz == 0 {
            0
        } else {
            1_000_000 / sample_rate_hz as u64
        };
        Self::new(period_us)
    }

    /// Tick period in microseconds.
    #[inline]
    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Timestamp of the last ideal tick boundary.
    #[inline]
    pub fn anchor_us(&self) -> u64 {
        self.anchor_us
    }

    /// Re-anchor at `now_us` (session start).
    #[inline]
    pub fn reset(&mut self, now_us: u64) {
        self.anchor_us = now_us;
    }

    /// True when the next tick is due. Does not consume it.
    #[inline]
    pub fn is_due(&self, now_us: u64) -> bool {
        tick_due(now_us, self.anchor_us, self.period_us)
    }

    /// Consume one tick: the anchor moves forward by exactly one period.
    ///
    /// Callers check [`is_due`](Self::is_due) first and advance only once
    /// the tick's work has succeeded, so a failed tick is retried.
    #[inline]
    pub fn advance(&mut self) {
        self.anchor_us += self.period_us;
    }

    /// Fire at most one tick.
    ///
    /// Returns true if a tick was due; the anchor then advances by one period.
    #[inline]
    pub fn poll(&mut self, now_us: u64) -> bool {
        let due = self.is_due(now_us);
        if due {
            self.advance();
        }
        due
    }

    /// Whole periods still owed to the ideal schedule.
    ///
    /// 0 when the loop keeps up.
    #[inline]
    pub fn backlog(&self, now_us: u64) -> u64 {
        now_us.saturating_sub(self.anchor_us) / self.period_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_due_boundary() {
        assert!(!tick_due(124, 0, 125));
        assert!(tick_due(125, 0, 125));
        assert!(tick_due(1_000, 0, 125));
        assert!(!tick_due(0, 500, 125));
    }

    #[test]
    fn test_anchor_advances_by_period() {
        let mut clock = SampleClock::new(125);
        clock.reset(1_000);

        // Late poll: anchor moves to the ideal boundary, not to now
        assert!(clock.poll(1_190));
        assert_eq!(clock.anchor_us(), 1_125);

        // Next boundary is 1_250, not 1_190 + 125
        assert!(!clock.poll(1_249));
        assert!(clock.poll(1_250));
        assert_eq!(clock.anchor_us(), 1_250);
    }

    #[test]
    fn test_is_due_does_not_consume() {
        let mut clock = SampleClock::new(100);
        clock.reset(0);

        assert!(clock.is_due(100));
        assert!(clock.is_due(100));
        assert_eq!(clock.anchor_us(), 0);

        clock.advance();
        assert_eq!(clock.anchor_us(), 100);
        assert!(!clock.is_due(100));
    }

    #[test]
    fn test_zero_period_clamped() {
        assert_eq!(SampleClock::new(0).period_us(), 1);
        assert_eq!(SampleClock::from_rate(0).period_us(), 1);
        assert_eq!(SampleClock::from_rate(8_000).period_us(), 125);
    }
}
