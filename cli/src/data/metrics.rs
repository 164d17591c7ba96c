//! Quantities derived from a snapshot that no single sample reports.
//!
//! Everything here is a total function: divisions are guarded and an
//! estimate that cannot be computed is `None` rather than a guess.

use std::time::Duration;

use powerdash_platform::BatterySample;

use super::Snapshot;

const SECS_PER_HOUR: u64 = 3600;

/// Severity of a gauge reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Nominal,
    Warning,
    Critical,
}

/// Bands for gauges where a high reading is bad.
fn band_rising(value: f64, warning_at: f64, critical_at: f64) -> Band {
    if value < warning_at {
        Band::Nominal
    } else if value < critical_at {
        Band::Warning
    } else {
        Band::Critical
    }
}

/// Bands for gauges where a low reading is bad.
fn band_falling(value: f64, nominal_above: f64, warning_above: f64) -> Band {
    if value > nominal_above {
        Band::Nominal
    } else if value > warning_above {
        Band::Warning
    } else {
        Band::Critical
    }
}

pub fn cpu_band(percent: f64) -> Band {
    band_rising(percent, 50.0, 80.0)
}

/// Memory, disk and adapter utilization share these cutoffs.
pub fn usage_band(percent: f64) -> Band {
    band_rising(percent, 70.0, 90.0)
}

pub fn battery_band(percent: f64) -> Band {
    band_falling(percent, 50.0, 20.0)
}

pub fn health_band(percent: f64) -> Band {
    band_falling(percent, 80.0, 60.0)
}

/// Negative headroom means the battery is topping up the adapter.
pub fn headroom_band(watts: f64) -> Band {
    if watts > 20.0 {
        Band::Nominal
    } else if watts >= 0.0 {
        Band::Warning
    } else {
        Band::Critical
    }
}

pub fn health_percent(max_capacity_mah: u32, design_capacity_mah: u32) -> f64 {
    if design_capacity_mah == 0 {
        return 0.0;
    }
    max_capacity_mah as f64 / design_capacity_mah as f64 * 100.0
}

/// Milliamps times millivolts, in watts.
fn watts(current_ma: u64, voltage_mv: u32) -> f64 {
    current_ma as f64 * voltage_mv as f64 / 1_000_000.0
}

pub fn charging_power_watts(charging_current_ma: i32, voltage_mv: u32) -> f64 {
    if charging_current_ma <= 0 {
        return 0.0;
    }
    watts(charging_current_ma as u64, voltage_mv)
}

pub fn discharge_power_watts(amperage_ma: i32, voltage_mv: u32) -> f64 {
    watts(amperage_ma.unsigned_abs() as u64, voltage_mv)
}

/// Capacity divided by current, as a duration.
fn hours_at(capacity_mah: u64, current_ma: u64) -> Option<Duration> {
    if current_ma == 0 {
        return None;
    }
    Some(Duration::from_secs(capacity_mah * SECS_PER_HOUR / current_ma))
}

/// Undefined unless charge is flowing in. A current capacity above the
/// maximum counts as nothing left to charge.
pub fn time_to_full(
    current_capacity_mah: u32,
    max_capacity_mah: u32,
    charging_current_ma: i32,
) -> Option<Duration> {
    if charging_current_ma <= 0 {
        return None;
    }
    let remaining = max_capacity_mah.saturating_sub(current_capacity_mah);
    hours_at(remaining as u64, charging_current_ma as u64)
}

/// Undefined when no current is flowing.
pub fn time_to_empty(current_capacity_mah: u32, amperage_ma: i32) -> Option<Duration> {
    hours_at(current_capacity_mah as u64, amperage_ma.unsigned_abs() as u64)
}

/// How the adapter's rated output is being spent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBalance {
    pub adapter_watts: u32,
    pub system_watts: f64,
    /// Zero unless the battery is charging.
    pub charging_watts: f64,
    pub total_watts: f64,
    pub headroom_watts: f64,
    /// Share of the adapter rating in use, capped at 100. `None` when the
    /// adapter reports no rating.
    pub utilization_percent: Option<f64>,
}

impl PowerBalance {
    pub fn from_battery(battery: &BatterySample) -> Self {
        let system_watts = battery.system_power_mw as f64 / 1000.0;
        let charging_watts = if battery.is_charging {
            charging_power_watts(battery.charging_current_ma, battery.voltage_mv)
        } else {
            0.0
        };
        let total_watts = system_watts + charging_watts;
        let adapter = battery.adapter_watts as f64;

        let utilization_percent = if battery.adapter_watts > 0 {
            Some((total_watts / adapter * 100.0).min(100.0))
        } else {
            None
        };

        Self {
            adapter_watts: battery.adapter_watts,
            system_watts,
            charging_watts,
            total_watts,
            headroom_watts: adapter - total_watts,
            utilization_percent,
        }
    }

    pub fn utilization_band(&self) -> Band {
        usage_band(self.utilization_percent.unwrap_or(0.0))
    }

    pub fn headroom_band(&self) -> Band {
        headroom_band(self.headroom_watts)
    }
}

/// Everything the dashboard shows that is computed rather than sampled.
///
/// Derived again on every frame from the cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub health_percent: f64,
    pub charging_watts: f64,
    pub time_to_full: Option<Duration>,
    pub discharge_watts: f64,
    pub time_to_empty: Option<Duration>,
    pub balance: PowerBalance,
    pub cpu_band: Band,
    pub memory_band: Band,
    pub disk_band: Band,
    pub battery_band: Band,
    pub health_band: Band,
}

impl Metrics {
    pub fn derive(snapshot: &Snapshot) -> Self {
        let battery = &snapshot.battery;
        let health_percent =
            health_percent(battery.max_capacity_mah, battery.design_capacity_mah);

        Self {
            health_percent,
            charging_watts: charging_power_watts(battery.charging_current_ma, battery.voltage_mv),
            time_to_full: time_to_full(
                battery.current_capacity_mah,
                battery.max_capacity_mah,
                battery.charging_current_ma,
            ),
            discharge_watts: discharge_power_watts(battery.amperage_ma, battery.voltage_mv),
            time_to_empty: time_to_empty(battery.current_capacity_mah, battery.amperage_ma),
            balance: PowerBalance::from_battery(battery),
            cpu_band: cpu_band(snapshot.cpu.usage_percent),
            memory_band: usage_band(snapshot.memory.used_percent),
            disk_band: usage_band(snapshot.disk.used_percent as f64),
            battery_band: battery_band(snapshot.power.percentage as f64),
            health_band: health_band(health_percent),
        }
    }
}

#[cfg(test)]
mod tests {
    use powerdash_platform::{
        ChargeStatus, CpuSample, DiskSample, MemorySample, PowerStatusSample, ThermalSample,
    };
    use proptest::prelude::*;

    use super::*;

    fn snapshot_with(battery: BatterySample) -> Snapshot {
        Snapshot {
            battery,
            power: PowerStatusSample {
                percentage: 82,
                status: ChargeStatus::FullyCharged,
                time_remaining: None,
            },
            thermal: ThermalSample::default(),
            cpu: CpuSample { usage_percent: 12.0 },
            memory: MemorySample::default(),
            disk: DiskSample::default(),
        }
    }

    #[test]
    fn test_health_is_zero_without_design_capacity() {
        assert_eq!(health_percent(5000, 0), 0.0);
        assert_eq!(health_percent(0, 0), 0.0);
    }

    #[test]
    fn test_health_is_max_over_design() {
        assert!((health_percent(4500, 5000) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_discharge_scenario() {
        assert!((discharge_power_watts(-2500, 11100) - 27.75).abs() < 1e-9);
        assert_eq!(
            time_to_empty(4000, -2500),
            Some(Duration::from_secs(96 * 60))
        );
    }

    #[test]
    fn test_time_to_empty_is_undefined_without_current() {
        assert_eq!(time_to_empty(4000, 0), None);
    }

    #[test]
    fn test_time_to_full_is_undefined_without_charging_current() {
        assert_eq!(time_to_full(1000, 5000, 0), None);
        assert_eq!(time_to_full(1000, 5000, -300), None);
    }

    #[test]
    fn test_time_to_full_never_negative() {
        assert_eq!(time_to_full(5200, 5000, 1500), Some(Duration::ZERO));
        assert_eq!(
            time_to_full(3000, 5000, 2000),
            Some(Duration::from_secs(3600))
        );
    }

    #[test]
    fn test_charging_power_uses_battery_voltage() {
        assert!((charging_power_watts(2000, 12500) - 25.0).abs() < 1e-9);
        assert_eq!(charging_power_watts(-100, 12500), 0.0);
    }

    #[test]
    fn test_balance_counts_charging_only_while_charging() {
        let battery = BatterySample {
            external_connected: true,
            is_charging: false,
            adapter_watts: 96,
            system_power_mw: 14_000,
            charging_current_ma: 1500,
            voltage_mv: 12000,
            ..Default::default()
        };
        let balance = PowerBalance::from_battery(&battery);
        assert_eq!(balance.charging_watts, 0.0);
        assert_eq!(balance.total_watts, 14.0);
        assert_eq!(balance.headroom_watts, 82.0);
        assert_eq!(balance.headroom_band(), Band::Nominal);
    }

    #[test]
    fn test_balance_utilization_caps_at_one_hundred() {
        let battery = BatterySample {
            external_connected: true,
            is_charging: true,
            adapter_watts: 30,
            system_power_mw: 25_000,
            charging_current_ma: 2000,
            voltage_mv: 12500,
            ..Default::default()
        };
        let balance = PowerBalance::from_battery(&battery);
        assert_eq!(balance.total_watts, 50.0);
        assert_eq!(balance.utilization_percent, Some(100.0));
        assert_eq!(balance.headroom_watts, -20.0);
        assert_eq!(balance.headroom_band(), Band::Critical);
        assert_eq!(balance.utilization_band(), Band::Critical);
    }

    #[test]
    fn test_balance_without_adapter_rating_is_undefined() {
        let battery = BatterySample {
            external_connected: true,
            adapter_watts: 0,
            system_power_mw: 10_000,
            ..Default::default()
        };
        assert_eq!(
            PowerBalance::from_battery(&battery).utilization_percent,
            None
        );
    }

    #[test]
    fn test_gauge_thresholds_are_per_gauge() {
        assert_eq!(cpu_band(49.9), Band::Nominal);
        assert_eq!(cpu_band(50.0), Band::Warning);
        assert_eq!(cpu_band(80.0), Band::Critical);

        assert_eq!(usage_band(69.9), Band::Nominal);
        assert_eq!(usage_band(70.0), Band::Warning);
        assert_eq!(usage_band(90.0), Band::Critical);

        assert_eq!(battery_band(51.0), Band::Nominal);
        assert_eq!(battery_band(50.0), Band::Warning);
        assert_eq!(battery_band(20.0), Band::Critical);

        assert_eq!(health_band(80.5), Band::Nominal);
        assert_eq!(health_band(80.0), Band::Warning);
        assert_eq!(health_band(60.0), Band::Critical);

        assert_eq!(headroom_band(20.0), Band::Warning);
        assert_eq!(headroom_band(0.0), Band::Warning);
        assert_eq!(headroom_band(-0.5), Band::Critical);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let snapshot = snapshot_with(BatterySample {
            current_capacity_mah: 4000,
            max_capacity_mah: 4800,
            design_capacity_mah: 5100,
            voltage_mv: 11100,
            amperage_ma: -2500,
            ..Default::default()
        });
        assert_eq!(Metrics::derive(&snapshot), Metrics::derive(&snapshot));
    }

    #[test]
    fn test_fully_charged_on_ac_is_nominal() {
        let snapshot = snapshot_with(BatterySample {
            external_connected: true,
            is_charging: false,
            adapter_watts: 67,
            ..Default::default()
        });
        let metrics = Metrics::derive(&snapshot);
        assert_eq!(metrics.battery_band, Band::Nominal);
        assert_eq!(metrics.balance.charging_watts, 0.0);
    }

    proptest! {
        #[test]
        fn test_derivation_is_total(
            current in any::<u32>(),
            max in any::<u32>(),
            design in any::<u32>(),
            voltage in any::<u32>(),
            amperage in any::<i32>(),
            charging in any::<i32>(),
            adapter in any::<u32>(),
            system in any::<u32>(),
            is_charging in any::<bool>(),
        ) {
            let snapshot = snapshot_with(BatterySample {
                current_capacity_mah: current,
                max_capacity_mah: max,
                design_capacity_mah: design,
                voltage_mv: voltage,
                amperage_ma: amperage,
                charging_current_ma: charging,
                adapter_watts: adapter,
                system_power_mw: system,
                is_charging,
                external_connected: true,
                ..Default::default()
            });
            let metrics = Metrics::derive(&snapshot);

            prop_assert!(metrics.health_percent.is_finite());
            prop_assert!(metrics.health_percent >= 0.0);
            prop_assert!(metrics.discharge_watts >= 0.0);
            prop_assert!(metrics.balance.headroom_watts.is_finite());
            if let Some(pct) = metrics.balance.utilization_percent {
                prop_assert!((0.0..=100.0).contains(&pct));
            }
            if charging <= 0 {
                prop_assert_eq!(metrics.time_to_full, None);
            }
            if amperage == 0 {
                prop_assert_eq!(metrics.time_to_empty, None);
            }
        }
    }
}
