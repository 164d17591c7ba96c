//! The boundary between the dashboard and the operating system.

use crate::battery::BatterySample;
use crate::power::{PowerStatusSample, ThermalSample};
use crate::system::{CpuSample, DiskSample, MemorySample};

/// Source of the six samples that make up one dashboard refresh.
///
/// Implementations never fail: a query that errors, times out or prints
/// something unparseable yields that sample's `Default` value instead.
pub trait SampleProvider {
    /// Battery and power adapter state.
    fn battery(&self) -> BatterySample;

    /// Charge percentage and status.
    fn power_status(&self) -> PowerStatusSample;

    /// CPU speed limit.
    fn thermal(&self) -> ThermalSample;

    /// Aggregate CPU usage.
    fn cpu(&self) -> CpuSample;

    /// Physical memory breakdown.
    fn memory(&self) -> MemorySample;

    /// Boot volume container space.
    fn disk(&self) -> DiskSample;
}
