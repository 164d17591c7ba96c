//! The dashboard layout as an ordered list of positioned text rows.
//!
//! Building rows is pure so layouts can be checked without a terminal. The
//! rows are written into the frame buffer only at draw time.

use std::time::Duration;

use chrono::{DateTime, Local};
use powerdash_platform::bytes_to_gb;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::data::{Metrics, Snapshot};
use crate::input::KEY_BINDINGS;

use super::gauge::{progress_bar, BarGlyphs};
use super::utils::{format_hours_minutes, Tone};

/// Width the header and footer rules never exceed.
pub const RULE_WIDTH: usize = 65;

const LABEL_COLUMN: usize = 2;
const VALUE_COLUMN: usize = 18;
const GAUGE_TAIL_COLUMN: usize = 40;
const SIDE_BAR_COLUMN: usize = 42;

const WIDE_BAR: usize = 20;
const SIDE_BAR: usize = 15;
const BALANCE_BAR: usize = 40;

/// A run of text starting at a fixed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub column: usize,
    pub text: String,
    pub tone: Tone,
    pub bold: bool,
}

/// One terminal line worth of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub segments: Vec<Segment>,
}

/// Inputs for one frame of the dashboard.
pub struct DashboardView<'a> {
    pub snapshot: &'a Snapshot,
    pub metrics: &'a Metrics,
    pub width: u16,
    pub timestamp: DateTime<Local>,
    pub next_update: Duration,
    pub glyphs: BarGlyphs,
}

struct RowBuilder {
    rows: Vec<Row>,
    line: usize,
}

impl RowBuilder {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            line: 0,
        }
    }

    fn put(&mut self, column: usize, text: impl Into<String>, tone: Tone) -> &mut Self {
        self.push(column, text.into(), tone, false)
    }

    fn put_bold(&mut self, column: usize, text: impl Into<String>, tone: Tone) -> &mut Self {
        self.push(column, text.into(), tone, true)
    }

    fn push(&mut self, column: usize, text: String, tone: Tone, bold: bool) -> &mut Self {
        let segment = Segment {
            column,
            text,
            tone,
            bold,
        };
        match self.rows.last_mut() {
            Some(row) if row.line == self.line => row.segments.push(segment),
            _ => self.rows.push(Row {
                line: self.line,
                segments: vec![segment],
            }),
        }
        self
    }

    fn advance(&mut self, lines: usize) {
        self.line += lines;
    }

    fn finish(self) -> Vec<Row> {
        self.rows
    }
}

/// Builds every row of the dashboard in top to bottom order.
pub fn build_rows(view: &DashboardView<'_>) -> Vec<Row> {
    let DashboardView {
        snapshot,
        metrics,
        glyphs,
        ..
    } = view;
    let battery = &snapshot.battery;
    let bar = |percent: f64, width: usize| progress_bar(percent, width, *glyphs);
    let rule = "=".repeat((view.width as usize).saturating_sub(1).min(RULE_WIDTH));

    let mut rows = RowBuilder::new();

    let title = format!(
        " MacBook Power Monitor - {} ",
        view.timestamp.format("%Y-%m-%d %H:%M:%S")
    );
    rows.put_bold(0, rule.clone(), Tone::Title);
    rows.advance(1);
    rows.put_bold(0, format!("{title:^width$}", width = RULE_WIDTH), Tone::Title);
    rows.advance(1);
    rows.put_bold(0, rule.clone(), Tone::Title);
    rows.advance(2);

    rows.put_bold(0, "POWER SOURCE", Tone::Heading);
    rows.advance(1);
    if battery.external_connected {
        rows.put(
            LABEL_COLUMN,
            format!("Adapter:        {}W", battery.adapter_watts),
            Tone::Good,
        );
        rows.advance(1);
        rows.put(
            LABEL_COLUMN,
            format!(
                "Voltage:        {:.1}V @ {:.1}A max",
                battery.adapter_voltage_mv as f64 / 1000.0,
                battery.adapter_current_ma as f64 / 1000.0
            ),
            Tone::Text,
        );
    } else {
        rows.put(LABEL_COLUMN, "Source:         Battery Only", Tone::Caution);
    }
    rows.advance(2);

    let cpu = snapshot.cpu.usage_percent;
    let throttle = &snapshot.thermal;
    rows.put_bold(0, "SYSTEM", Tone::Heading);
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!("Power Draw:     {:.1}W", metrics.balance.system_watts),
        Tone::Text,
    );
    rows.advance(1);
    rows.put(LABEL_COLUMN, "CPU Usage:", Tone::Text)
        .put(VALUE_COLUMN, bar(cpu, WIDE_BAR), metrics.cpu_band.into())
        .put(GAUGE_TAIL_COLUMN, format!(" {cpu:.1}%"), Tone::Text);
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!("CPU Throttle:   {}%", throttle.cpu_speed_limit),
        if throttle.is_throttled() {
            Tone::Alert
        } else {
            Tone::Text
        },
    );
    rows.advance(2);

    let memory = &snapshot.memory;
    rows.put_bold(0, "MEMORY", Tone::Heading);
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!(
            "Used:           {:.1}/{:.0} GB ({:.0}%)  ",
            bytes_to_gb(memory.app_bytes),
            bytes_to_gb(memory.total_bytes),
            memory.used_percent
        ),
        Tone::Text,
    )
    .put(
        SIDE_BAR_COLUMN,
        bar(memory.used_percent, SIDE_BAR),
        metrics.memory_band.into(),
    );
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!(
            "Wired: {:.1}GB  Compressed: {:.1}GB  Cached: {:.1}GB",
            bytes_to_gb(memory.wired_bytes),
            bytes_to_gb(memory.compressed_bytes),
            bytes_to_gb(memory.cached_bytes)
        ),
        Tone::Text,
    );
    rows.advance(2);

    let disk = &snapshot.disk;
    rows.put_bold(0, "DISK", Tone::Heading);
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!(
            "Used:           {:.0}/{:.0} GB ({}%)  ",
            disk.used_gb, disk.total_gb, disk.used_percent
        ),
        Tone::Text,
    )
    .put(
        SIDE_BAR_COLUMN,
        bar(disk.used_percent as f64, SIDE_BAR),
        metrics.disk_band.into(),
    );
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!(
            "Available: {:.0}GB  Purgeable: {:.1}GB",
            disk.available_gb, disk.purgeable_gb
        ),
        Tone::Text,
    );
    rows.advance(2);

    let power = &snapshot.power;
    let mut charge_tail = format!(" {}% {}", power.percentage, power.status);
    if let Some(remaining) = &power.time_remaining {
        charge_tail.push_str(&format!(" ({remaining} remaining)"));
    }
    rows.put_bold(0, "BATTERY", Tone::Heading);
    rows.advance(1);
    rows.put(LABEL_COLUMN, "Charge:", Tone::Text)
        .put(
            VALUE_COLUMN,
            bar(power.percentage as f64, WIDE_BAR),
            metrics.battery_band.into(),
        )
        .put(
            GAUGE_TAIL_COLUMN,
            charge_tail,
            if battery.is_charging {
                Tone::Good
            } else {
                Tone::Text
            },
        );
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!(
            "Capacity:       {}/{} mAh",
            battery.current_capacity_mah, battery.max_capacity_mah
        ),
        Tone::Text,
    );
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!(
            "Health:         {:.1}%  Cycles: {}",
            metrics.health_percent, battery.cycle_count
        ),
        metrics.health_band.into(),
    );
    rows.advance(1);
    rows.put(
        LABEL_COLUMN,
        format!("Voltage:        {:.2}V", battery.voltage_mv as f64 / 1000.0),
        Tone::Text,
    );
    rows.advance(1);
    let [a, b, c] = battery.cell_voltages_mv;
    rows.put(
        LABEL_COLUMN,
        format!("Cells:          {a}mV | {b}mV | {c}mV"),
        Tone::Text,
    );
    rows.advance(2);

    if battery.is_charging {
        rows.put_bold(0, "CHARGING", Tone::Good);
        rows.advance(1);
        rows.put(
            LABEL_COLUMN,
            format!(
                "Power:          {:.1}W ({:.2}A @ {:.2}V)",
                metrics.charging_watts,
                battery.charging_current_ma as f64 / 1000.0,
                battery.charging_voltage_mv as f64 / 1000.0
            ),
            Tone::Text,
        );
        rows.advance(1);
        rows.put(
            LABEL_COLUMN,
            format!(
                "Time to Full:   {}",
                format_hours_minutes(metrics.time_to_full)
            ),
            Tone::Good,
        );
    } else if !battery.external_connected {
        rows.put_bold(0, "DISCHARGING", Tone::Heading);
        rows.advance(1);
        rows.put(
            LABEL_COLUMN,
            format!(
                "Power:          {:.1}W ({:.2}A)",
                metrics.discharge_watts,
                battery.amperage_ma.unsigned_abs() as f64 / 1000.0
            ),
            Tone::Text,
        );
        rows.advance(1);
        rows.put(
            LABEL_COLUMN,
            format!(
                "Time to Empty:  {}",
                format_hours_minutes(metrics.time_to_empty)
            ),
            Tone::Caution,
        );
    }
    rows.advance(2);

    if battery.external_connected {
        let balance = &metrics.balance;
        rows.put_bold(0, "POWER BALANCE", Tone::Heading);
        rows.advance(1);
        rows.put(
            LABEL_COLUMN,
            format!(
                "System: {:.0}W + Charging: {:.0}W = {:.0}W / {}W",
                balance.system_watts,
                balance.charging_watts,
                balance.total_watts,
                balance.adapter_watts
            ),
            Tone::Text,
        );
        rows.advance(1);
        let utilization = match balance.utilization_percent {
            Some(percent) => format!("{percent:.0}%"),
            None => "-".to_string(),
        };
        rows.put(
            LABEL_COLUMN,
            format!(
                "[{}] {utilization}",
                bar(balance.utilization_percent.unwrap_or(0.0), BALANCE_BAR)
            ),
            balance.utilization_band().into(),
        );
        rows.advance(1);
        let headroom = balance.headroom_watts;
        let headroom_text = if headroom >= 0.0 {
            format!("Headroom: {headroom:.0}W")
        } else {
            format!("Battery supplementing: {:.0}W (adapter maxed)", -headroom)
        };
        rows.put(LABEL_COLUMN, headroom_text, balance.headroom_band().into());
        rows.advance(2);
    }

    let legend: Vec<String> = KEY_BINDINGS
        .iter()
        .map(|binding| format!("[{}] {}", binding.key, binding.description))
        .collect();
    rows.put(0, rule, Tone::Title);
    rows.advance(1);
    rows.put(
        0,
        format!(
            " {}  Next update: {}s ",
            legend.join("  "),
            view.next_update.as_secs()
        ),
        Tone::Text,
    );

    rows.finish()
}

/// Writes rows into `area` of `buf`.
///
/// Rows at or past the bottom edge are skipped and segments are cut at the
/// right edge. Later segments overwrite earlier ones where they overlap.
pub fn draw_rows(rows: &[Row], area: Rect, buf: &mut Buffer) {
    for row in rows {
        let Some(y) = u16::try_from(row.line)
            .ok()
            .filter(|line| *line < area.height)
        else {
            break;
        };

        for segment in &row.segments {
            let Some(x) = u16::try_from(segment.column)
                .ok()
                .filter(|column| *column < area.width)
            else {
                continue;
            };
            buf.set_stringn(
                area.x + x,
                area.y + y,
                &segment.text,
                usize::from(area.width - x),
                segment.tone.style(segment.bold),
            );
        }
    }
}
