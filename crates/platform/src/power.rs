//! Power-management and thermal samples from `pmset`.

use crate::types::ChargeStatus;

/// Battery status as reported by `pmset -g batt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PowerStatusSample {
    /// Charge level as a percentage (0-100), matching the menu bar.
    pub percentage: u8,

    pub status: ChargeStatus,

    /// System estimate such as `"4:31"`, absent when the OS has none.
    pub time_remaining: Option<String>,
}

impl PowerStatusSample {
    pub fn from_pmset(output: &str) -> Self {
        Self {
            percentage: first_percentage(output).unwrap_or(0),
            status: ChargeStatus::from_pmset(output),
            time_remaining: time_remaining(output),
        }
    }
}

/// CPU speed limit from `pmset -g therm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThermalSample {
    /// CPU speed as a percentage of maximum. 100 means no throttling.
    pub cpu_speed_limit: u8,
}

impl Default for ThermalSample {
    fn default() -> Self {
        Self {
            cpu_speed_limit: 100,
        }
    }
}

impl ThermalSample {
    pub fn from_pmset(output: &str) -> Self {
        let limit = output.find("CPU_Speed_Limit").and_then(|pos| {
            let rest = output[pos + "CPU_Speed_Limit".len()..].trim_start();
            let rest = rest.strip_prefix('=')?.trim_start();
            leading_digits(rest).parse::<u8>().ok()
        });

        match limit {
            Some(cpu_speed_limit) => Self { cpu_speed_limit },
            None => Self::default(),
        }
    }

    pub fn is_throttled(&self) -> bool {
        self.cpu_speed_limit != 100
    }
}

fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

fn trailing_digits(s: &str) -> &str {
    let head = s.trim_end_matches(|c: char| c.is_ascii_digit());
    &s[head.len()..]
}

fn first_percentage(output: &str) -> Option<u8> {
    output
        .match_indices('%')
        .map(|(pos, _)| trailing_digits(&output[..pos]))
        .find(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse::<u8>().ok())
        .map(|pct| pct.min(100))
}

fn time_remaining(output: &str) -> Option<String> {
    output.match_indices("remaining").find_map(|(pos, _)| {
        let before = output[..pos].trim_end();
        let minutes = trailing_digits(before);
        let before = before[..before.len() - minutes.len()].strip_suffix(':')?;
        let hours = trailing_digits(before);
        if hours.is_empty() || minutes.is_empty() {
            return None;
        }
        Some(format!("{}:{}", hours, minutes))
    })
}
