//! Application core module.
//!
//! This module contains the main App struct and the single tick function
//! through which all dashboard state changes.

mod scheduler;
mod state;
mod tui;
pub mod types;

pub use scheduler::RefreshScheduler;
pub use state::DashboardState;
pub use tui::run_tui;
pub use types::{Action, REFRESH_INTERVAL, TICK_INTERVAL};

use std::time::Instant;

use powerdash_platform::SampleProvider;
use tracing::{debug, info};

use crate::config::UserConfig;
use crate::data::Snapshot;
use crate::ui::gauge::BarGlyphs;

/// Main application state for the dashboard.
///
/// Owns the sample provider, the cached batch and the refresh timer. Only
/// [`App::tick`] and [`App::handle_action`] mutate it.
pub struct App<P: SampleProvider> {
    provider: P,
    pub state: DashboardState,
    pub scheduler: RefreshScheduler,
    pub glyphs: BarGlyphs,
}

impl<P: SampleProvider> App<P> {
    pub fn new(provider: P, config: &UserConfig) -> Self {
        let scheduler = RefreshScheduler::new(REFRESH_INTERVAL);
        let glyphs = if config.ascii_bars {
            BarGlyphs::ASCII
        } else {
            BarGlyphs::BLOCK
        };

        info!(
            interval = %humantime::format_duration(scheduler.interval()),
            ascii_bars = config.ascii_bars,
            "Initializing app"
        );

        Self {
            provider,
            state: DashboardState::new(),
            scheduler,
            glyphs,
        }
    }

    /// Applies a user action. Returns `false` when the app should exit.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::Refresh => {
                debug!("Forced refresh requested");
                self.scheduler.request_refresh();
            }
            Action::None => {}
        }
        true
    }

    /// Performs a single tick of the application loop.
    ///
    /// Collects and commits a new batch when the scheduler says it is due.
    /// Returns `true` if a refresh happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.scheduler.should_refresh(now) {
            return false;
        }

        let forced = self.scheduler.is_force_pending();
        let start = Instant::now();
        let snapshot = Snapshot::collect(&self.provider);
        let committed_at = now + start.elapsed();

        self.state.commit(snapshot, committed_at);
        self.scheduler.mark_refreshed(committed_at);

        debug!(
            forced,
            refresh_ms = start.elapsed().as_millis() as u64,
            "Dashboard refreshed"
        );

        true
    }
}
