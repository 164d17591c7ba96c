pub mod dashboard;
pub mod gauge;
pub mod utils;

use std::time::Instant;

use chrono::{DateTime, Local};
use powerdash_platform::SampleProvider;
use ratatui::Frame;

use crate::app::App;
use crate::data::Metrics;

use dashboard::{build_rows, draw_rows, DashboardView};

/// Draws the whole dashboard. Draws nothing until the first batch exists.
pub fn render<P: SampleProvider>(
    frame: &mut Frame,
    app: &App<P>,
    timestamp: DateTime<Local>,
    now: Instant,
) {
    let Some(snapshot) = app.state.snapshot() else {
        return;
    };

    let area = frame.area();
    let metrics = Metrics::derive(snapshot);
    let view = DashboardView {
        snapshot,
        metrics: &metrics,
        width: area.width,
        timestamp,
        next_update: app.scheduler.time_until_next(now),
        glyphs: app.glyphs,
    };

    let rows = build_rows(&view);
    draw_rows(&rows, area, frame.buffer_mut());
}
