//! Core types and constants for the dashboard loop.

use std::time::Duration;

/// Time between sample refreshes. Fixed; not user configurable.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Upper bound on the wait at the end of each loop tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Actions that can be performed in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    None,
}
