//! The "Time Now" label on the device panel.
use crate::timer::Repeating;
use chrono::NaiveTime;
use std::time::{Duration, Instant};

pub const CLOCK_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone)]
pub struct ClockLabel {
    ticker: Repeating,
    text: String,
}

impl ClockLabel {
    /// Rendered immediately; refreshed every `period` afterwards.
    pub fn new(now: Instant, period: Duration, wall: NaiveTime) -> Self {
        Self {
            ticker: Repeating::new(now, period),
            text: wall.format(CLOCK_FORMAT).to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Refresh when a period has elapsed. Returns true if the text changed.
    pub fn poll(&mut self, now: Instant, wall: NaiveTime) -> bool {
        if self.ticker.poll(now) == 0 {
            return false;
        }
        let text = wall.format(CLOCK_FORMAT).to_string();
        if text == self.text {
            return false;
        }
        self.text = text;
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.ticker.until_next(now)
    }
}
