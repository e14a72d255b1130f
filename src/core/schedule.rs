//! Deterministic timers driven by an explicit `now`.
//!
//! Nothing here reads a wall clock: the host loop passes elapsed time into
//! `advance`, and tests do the same with synthetic durations.

use std::time::Duration;

/// Fires once every `period`, counting whole periods that elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingTimer {
    period: Duration,
    next_due: Duration,
}

impl RepeatingTimer {
    pub fn new(period: Duration, start: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next_due: start + period,
        }
    }

    /// Number of ticks due at `now`; the timer is moved past them.
    pub fn due_ticks(&mut self, now: Duration) -> u32 {
        if now < self.next_due {
            return 0;
        }
        let overdue = now - self.next_due;
        let ticks = overdue.as_nanos() / self.period.as_nanos() + 1;
        let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
        self.next_due += self.period * ticks;
        ticks
    }
}

/// A one-shot deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    due: Duration,
}

impl Deadline {
    pub fn after(start: Duration, delay: Duration) -> Self {
        Self { due: start + delay }
    }

    pub fn due(&self) -> Duration {
        self.due
    }

    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.due
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.due.saturating_sub(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_repeating_timer_counts_whole_periods() {
        let mut timer = RepeatingTimer::new(ms(200), ms(0));

        assert_eq!(timer.due_ticks(ms(199)), 0);
        assert_eq!(timer.due_ticks(ms(200)), 1);
        assert_eq!(timer.due_ticks(ms(399)), 0);
        assert_eq!(timer.due_ticks(ms(1000)), 4);
        assert_eq!(timer.due_ticks(ms(1000)), 0);
    }

    #[test]
    fn test_repeating_timer_keeps_phase() {
        let mut timer = RepeatingTimer::new(ms(200), ms(50));
        assert_eq!(timer.due_ticks(ms(260)), 1);
        // next due at 450, not 460
        assert_eq!(timer.due_ticks(ms(450)), 1);
    }

    #[test]
    fn test_zero_period_is_bumped() {
        let mut timer = RepeatingTimer::new(Duration::ZERO, ms(0));
        assert_eq!(timer.due_ticks(ms(5)), 5);
    }

    #[test]
    fn test_deadline() {
        let deadline = Deadline::after(ms(100), ms(8500));
        assert!(!deadline.is_due(ms(8599)));
        assert!(deadline.is_due(ms(8600)));
        assert_eq!(deadline.remaining(ms(8000)), ms(600));
        assert_eq!(deadline.remaining(ms(9000)), Duration::ZERO);
    }
}
