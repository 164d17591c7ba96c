use std::time::{Duration, Instant};

/// Decides on each tick whether the cached samples are stale.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    last_refresh: Option<Instant>,
    force_pending: bool,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_refresh: None,
            force_pending: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }

    /// Makes the next check due regardless of elapsed time.
    pub fn request_refresh(&mut self) {
        self.force_pending = true;
    }

    pub fn is_force_pending(&self) -> bool {
        self.force_pending
    }

    pub fn should_refresh(&self, now: Instant) -> bool {
        if self.force_pending {
            return true;
        }
        match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Records a committed batch and clears any pending forced refresh.
    pub fn mark_refreshed(&mut self, at: Instant) {
        self.last_refresh = Some(at);
        self.force_pending = false;
    }

    /// Time left before the interval elapses, zero once it has.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match self.last_refresh {
            None => Duration::ZERO,
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
        }
    }
}
