use std::time::Instant;

use crate::data::Snapshot;

/// The most recent sample batch, or nothing before the first refresh.
///
/// Batches are swapped in whole, so readers never see samples from two
/// different refreshes.
#[derive(Debug, Default)]
pub struct DashboardState {
    current: Option<(Snapshot, Instant)>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, snapshot: Snapshot, fetched_at: Instant) {
        self.current = Some((snapshot, fetched_at));
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref().map(|(snapshot, _)| snapshot)
    }

    #[cfg(test)]
    pub fn fetched_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|(_, at)| *at)
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }
}
