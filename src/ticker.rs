use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FixedTicker {
    interval: Duration,
    max_per_frame: u32,
    accumulator: Duration,
    last: Option<Instant>,
}

impl FixedTicker {
    pub fn new(interval: Duration, max_per_frame: u32) -> Self {
        Self {
            interval,
            max_per_frame: max_per_frame.max(1),
            accumulator: Duration::ZERO,
            last: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.last.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        self.accumulator = Duration::ZERO;
        self.last = Some(now);
    }

    pub fn stop(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last = None;
    }

    /// Whole ticks due at `now`, at most `max_per_frame`. Time beyond the cap is dropped.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(last) = self.last else {
            return 0;
        };
        self.accumulator += now.saturating_duration_since(last);
        self.last = Some(now);

        let mut ticks = 0;
        while self.accumulator >= self.interval && ticks < self.max_per_frame {
            self.accumulator -= self.interval;
            ticks += 1;
        }
        if ticks == self.max_per_frame {
            self.accumulator = self.accumulator.min(self.interval);
        }
        ticks
    }
}
