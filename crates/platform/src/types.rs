//! Shared types for power and battery samples.

use std::fmt;

/// Battery status as reported by the power-management tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeStatus {
    /// Battery is actively charging
    Charging,
    /// Battery is discharging (on battery power)
    Discharging,
    /// Battery is full and the charger is idle
    FullyCharged,
    /// External power connected but not charging (e.g., charge limit reached)
    OnAc,
    /// State cannot be determined
    #[default]
    Unknown,
}

impl ChargeStatus {
    /// Returns a human-readable label for the status.
    pub fn label(&self) -> &'static str {
        match self {
            ChargeStatus::Charging => "Charging",
            ChargeStatus::Discharging => "Discharging",
            ChargeStatus::FullyCharged => "Fully Charged",
            ChargeStatus::OnAc => "On AC",
            ChargeStatus::Unknown => "Unknown",
        }
    }

    /// Classifies the free-form status text printed by `pmset -g batt`.
    pub fn from_pmset(output: &str) -> Self {
        let lower = output.to_lowercase();

        if lower.contains("discharging") {
            ChargeStatus::Discharging
        } else if lower.contains("not charging") {
            ChargeStatus::OnAc
        } else if lower.contains("charging") {
            ChargeStatus::Charging
        } else if lower.contains("charged") {
            ChargeStatus::FullyCharged
        } else if output.contains("AC Power") {
            ChargeStatus::OnAc
        } else {
            ChargeStatus::Unknown
        }
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
