use std::time::Instant;

use powerdash_platform::{
    BatterySample, CpuSample, DiskSample, MemorySample, PowerStatusSample, SampleProvider,
    ThermalSample,
};
use tracing::debug;

/// One complete batch of samples, always collected and replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub battery: BatterySample,
    pub power: PowerStatusSample,
    pub thermal: ThermalSample,
    pub cpu: CpuSample,
    pub memory: MemorySample,
    pub disk: DiskSample,
}

impl Snapshot {
    /// Queries every provider in a fixed order.
    pub fn collect<P: SampleProvider>(provider: &P) -> Self {
        let start = Instant::now();

        let battery = provider.battery();
        let power = provider.power_status();
        let thermal = provider.thermal();
        let cpu = provider.cpu();
        let memory = provider.memory();
        let disk = provider.disk();

        debug!(
            collect_ms = start.elapsed().as_millis() as u64,
            battery_percent = power.percentage,
            status = power.status.label(),
            external_connected = battery.external_connected,
            cpu_percent = cpu.usage_percent,
            "Sample batch collected"
        );

        Self {
            battery,
            power,
            thermal,
            cpu,
            memory,
            disk,
        }
    }
}
