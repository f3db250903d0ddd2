use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// Decides how long the next outbound line has to wait.
pub trait FloodPolicy: Send + fmt::Debug {
    /// Time left before a line may be sent at `now`; zero means send now.
    fn remaining_delay(&self, now: Instant) -> Duration;

    /// Account for a line sent at `now`.
    fn record_send(&mut self, now: Instant);
}

/// A constant minimum spacing between lines.
#[derive(Clone, Debug)]
pub struct FixedDelay {
    delay: Duration,
    last_send: Option<Instant>,
}

impl FixedDelay {
    /// Space lines at least `delay` apart.
    pub fn new(delay: Duration) -> Self {
        FixedDelay {
            delay,
            last_send: None,
        }
    }
}

impl FloodPolicy for FixedDelay {
    fn remaining_delay(&self, now: Instant) -> Duration {
        match self.last_send {
            Some(last) => (last + self.delay).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    fn record_send(&mut self, now: Instant) {
        self.last_send = Some(now);
    }
}

/// At most `rate` lines per window of `period`.
///
/// A window opens with the first line sent after the previous window has
/// elapsed.
#[derive(Clone, Debug)]
pub struct RateLimit {
    rate: u32,
    period: Duration,
    count: u32,
    window_start: Option<Instant>,
}

impl RateLimit {
    /// Allow `rate` lines per `period`.
    pub fn new(rate: u32, period: Duration) -> Self {
        RateLimit {
            rate,
            period,
            count: 0,
            window_start: None,
        }
    }
}

impl FloodPolicy for RateLimit {
    fn remaining_delay(&self, now: Instant) -> Duration {
        if self.count < self.rate {
            return Duration::ZERO;
        }
        match self.window_start {
            Some(start) => (start + self.period).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    fn record_send(&mut self, now: Instant) {
        let expired = self
            .window_start
            .map_or(true, |start| now >= start + self.period);
        if expired {
            self.count = 0;
            self.window_start = Some(now);
        }
        self.count = self.count.saturating_add(1);
    }
}
