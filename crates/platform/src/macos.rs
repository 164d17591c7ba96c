//! Sample provider backed by the macOS command line tools.
//!
//! On systems without these tools every query fails to spawn and each sample
//! falls back to its default.

use std::time::Duration;

use tracing::{trace, warn};

use crate::battery::BatterySample;
use crate::command::{self, COMMAND_TIMEOUT};
use crate::power::{PowerStatusSample, ThermalSample};
use crate::provider::SampleProvider;
use crate::system::{
    CpuSample, DiskSample, MemorySample, DEFAULT_MEMORY_BYTES, DEFAULT_PAGE_SIZE,
};

pub struct MacOSSampler {
    timeout: Duration,
}

impl Default for MacOSSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl MacOSSampler {
    pub fn new() -> Self {
        Self {
            timeout: COMMAND_TIMEOUT,
        }
    }

    /// Runs one query, returning empty output on any failure.
    fn query(&self, program: &str, args: &[&str]) -> String {
        match command::run_with_timeout(program, args, self.timeout) {
            Ok(output) => {
                trace!(program, bytes = output.len(), "Query completed");
                output
            }
            Err(err) => {
                warn!(program, error = %err, "Query failed, using defaults");
                String::new()
            }
        }
    }

    fn query_number(&self, program: &str, args: &[&str]) -> Option<u64> {
        self.query(program, args).trim().parse().ok()
    }
}

impl SampleProvider for MacOSSampler {
    fn battery(&self) -> BatterySample {
        BatterySample::from_ioreg(&self.query("ioreg", &["-rn", "AppleSmartBattery"]))
    }

    fn power_status(&self) -> PowerStatusSample {
        PowerStatusSample::from_pmset(&self.query("pmset", &["-g", "batt"]))
    }

    fn thermal(&self) -> ThermalSample {
        ThermalSample::from_pmset(&self.query("pmset", &["-g", "therm"]))
    }

    fn cpu(&self) -> CpuSample {
        CpuSample::from_top(&self.query("top", &["-l", "1", "-n", "0"]))
    }

    fn memory(&self) -> MemorySample {
        let total = self
            .query_number("sysctl", &["-n", "hw.memsize"])
            .unwrap_or(DEFAULT_MEMORY_BYTES);
        let vm_stat = self.query("vm_stat", &[]);
        let page_size = self
            .query_number("pagesize", &[])
            .unwrap_or(DEFAULT_PAGE_SIZE);

        MemorySample::from_vm_stat(total, page_size, &vm_stat)
    }

    fn disk(&self) -> DiskSample {
        DiskSample::from_diskutil(&self.query("diskutil", &["info", "/"]))
    }
}
