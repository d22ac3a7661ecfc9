//! Time source for the pairing delay, the "Time Now" label and the auto
//! cycle countdown.
use std::time::{Duration, Instant};

/// Where the panel model reads the current instant from. The session loop
/// also waits through it, so a scripted run can be driven without real
/// sleeps.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);
}

/// Wall-speed clock for interactive sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod test_clock {
    use super::{Clock, Duration, Instant};
    use std::sync::{Arc, Mutex};

    /// Manually stepped clock. Handing a clone to the panel and stepping the
    /// original moves both, since they share one offset.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        start: Instant,
        elapsed: Arc<Mutex<Duration>>,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
                elapsed: Arc::new(Mutex::new(Duration::ZERO)),
            }
        }

        pub fn advance(&self, d: Duration) {
            if let Ok(mut e) = self.elapsed.lock() {
                *e = e.saturating_add(d);
            }
        }

        pub fn advance_ms(&self, ms: u64) {
            self.advance(Duration::from_millis(ms));
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            let e = self.elapsed.lock().map(|g| *g).unwrap_or_default();
            self.start + e
        }

        /// Steps the clock instead of blocking.
        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }
}
