//! Deadline timers polled from the UI loop.
//!
//! Nothing here sleeps or spawns. The loop hands in the current `Instant`
//! and a timer reports whether it fired.
use std::time::{Duration, Instant};

/// Fires once, `delay` after it was armed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    /// Arm the timer. Returns false and keeps the original deadline when
    /// already armed.
    pub fn arm(&mut self, now: Instant, delay: Duration) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + delay);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fires every `period`, starting one period after `start`.
#[derive(Debug, Clone, Copy)]
pub struct Repeating {
    period: Duration,
    next: Instant,
}

impl Repeating {
    pub fn new(start: Instant, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next: start + period,
        }
    }

    /// Number of whole periods elapsed since the last poll. Missed periods
    /// are reported in one go rather than dropped.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let behind = now.saturating_duration_since(self.next);
        let extra = behind.as_nanos() / self.period.as_nanos();
        let fired = u32::try_from(extra).unwrap_or(u32::MAX - 1) + 1;
        self.next += self.period * fired;
        fired
    }

    /// Time left until the next firing.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let t0 = Instant::now();
        let mut t = OneShot::default();
        assert!(t.arm(t0, Duration::from_millis(2000)));
        assert!(!t.poll(t0 + Duration::from_millis(1999)));
        assert!(t.poll(t0 + Duration::from_millis(2000)));
        assert!(!t.poll(t0 + Duration::from_millis(5000)));
        assert!(!t.is_armed());
    }

    #[test]
    fn rearming_does_not_reschedule() {
        let t0 = Instant::now();
        let mut t = OneShot::default();
        t.arm(t0, Duration::from_millis(100));
        assert!(!t.arm(t0 + Duration::from_millis(50), Duration::from_millis(100)));
        assert_eq!(t.remaining(t0), Some(Duration::from_millis(100)));
        assert!(t.poll(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn repeating_reports_missed_periods() {
        let t0 = Instant::now();
        let mut r = Repeating::new(t0, Duration::from_secs(1));
        assert_eq!(r.poll(t0 + Duration::from_millis(999)), 0);
        assert_eq!(r.poll(t0 + Duration::from_millis(1000)), 1);
        assert_eq!(r.poll(t0 + Duration::from_millis(1500)), 0);
        assert_eq!(r.poll(t0 + Duration::from_millis(4200)), 3);
        assert_eq!(
            r.until_next(t0 + Duration::from_millis(4200)),
            Duration::from_millis(800)
        );
    }
}
