//! CPU, memory and disk samples.

use std::collections::HashMap;

pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

/// Physical memory assumed when `sysctl hw.memsize` is unavailable.
pub const DEFAULT_MEMORY_BYTES: u64 = 16 * 1024 * 1024 * 1024;

/// Page size assumed when `pagesize` is unavailable (Apple silicon).
pub const DEFAULT_PAGE_SIZE: u64 = 16_384;

/// Converts a byte count to binary gigabytes.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

/// Aggregate CPU usage from a `top -l 1 -n 0` snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSample {
    /// User plus system time. May exceed 100 on multi-core machines.
    pub usage_percent: f64,
}

impl CpuSample {
    pub fn from_top(output: &str) -> Self {
        let usage = output
            .lines()
            .find(|line| line.contains("CPU usage"))
            .and_then(|line| {
                let user = percent_before(line, "% user")?;
                let system = percent_before(line, "% sys")?;
                Some(user + system)
            });

        Self {
            usage_percent: usage.unwrap_or(0.0),
        }
    }
}

fn percent_before(line: &str, marker: &str) -> Option<f64> {
    let before = &line[..line.find(marker)?];
    let head = before.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
    before[head.len()..].parse().ok()
}

/// Memory breakdown in the categories Activity Monitor uses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemorySample {
    pub total_bytes: u64,

    /// Active plus wired pages.
    pub app_bytes: u64,

    /// Pages that cannot be paged out.
    pub wired_bytes: u64,

    pub compressed_bytes: u64,

    /// Inactive, purgeable and speculative pages, reclaimable on demand.
    pub cached_bytes: u64,

    pub free_bytes: u64,

    pub purgeable_bytes: u64,

    /// App plus compressed memory as a share of the total.
    pub used_percent: f64,
}

impl MemorySample {
    /// Builds the breakdown from `vm_stat` page counts.
    pub fn from_vm_stat(total_bytes: u64, page_size: u64, vm_stat: &str) -> Self {
        let pages = parse_vm_stat(vm_stat);
        let bytes = |key: &str| pages.get(key).copied().unwrap_or(0) * page_size;

        let free = bytes("Pages free");
        let active = bytes("Pages active");
        let inactive = bytes("Pages inactive");
        let speculative = bytes("Pages speculative");
        let wired = bytes("Pages wired down");
        let compressed = bytes("Pages occupied by compressor");
        let purgeable = bytes("Pages purgeable");

        let app = active + wired;
        let cached = inactive + purgeable + speculative;
        let used_percent = if total_bytes > 0 {
            (app + compressed) as f64 / total_bytes as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_bytes,
            app_bytes: app,
            wired_bytes: wired,
            compressed_bytes: compressed,
            cached_bytes: cached,
            free_bytes: free,
            purgeable_bytes: purgeable,
            used_percent,
        }
    }
}

/// Parses `vm_stat` lines of the form `Pages free:    12345.`.
fn parse_vm_stat(output: &str) -> HashMap<String, u64> {
    output
        .lines()
        .filter_map(|line| {
            let (key, value) = line.rsplit_once(':')?;
            let value = value.trim().trim_end_matches('.').parse::<u64>().ok()?;
            Some((key.trim().to_string(), value))
        })
        .collect()
}

/// Space in the APFS container holding the boot volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskSample {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,

    /// Reclaimable space. On APFS all free container space counts.
    pub purgeable_gb: f64,

    /// Whole-number share of the container in use.
    pub used_percent: u32,
}

impl DiskSample {
    /// Parses the output of `diskutil info /`.
    pub fn from_diskutil(output: &str) -> Self {
        let mut sample = Self::default();

        for line in output.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Container Total Space:") {
                if let Some(size) = size_in_gb(rest, &["GB", "TB"]) {
                    sample.total_gb = size;
                }
            } else if let Some(rest) = line.strip_prefix("Container Free Space:") {
                if let Some(size) = size_in_gb(rest, &["GB", "TB"]) {
                    sample.available_gb = size;
                    sample.purgeable_gb = size;
                }
            } else if let Some(rest) = line.strip_prefix("Volume Used Space:") {
                if let Some(size) = size_in_gb(rest, &["GB", "TB", "MB"]) {
                    sample.used_gb = size;
                }
            }
        }

        if sample.used_gb == 0.0 && sample.total_gb > 0.0 {
            sample.used_gb = sample.total_gb - sample.available_gb;
        }

        if sample.total_gb > 0.0 {
            sample.used_percent = (sample.used_gb / sample.total_gb * 100.0).max(0.0) as u32;
        }

        sample
    }
}

/// Parses `"494.4 GB (494384795648 Bytes)"` into gigabytes.
fn size_in_gb(text: &str, units: &[&str]) -> Option<f64> {
    let mut parts = text.split_whitespace();
    let value = parts.next()?.parse::<f64>().ok()?;
    let unit = parts.next()?;
    if !units.contains(&unit) {
        return None;
    }

    Some(match unit {
        "TB" => value * 1024.0,
        "MB" => value / 1024.0,
        _ => value,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cpu_usage_sums_user_and_system() {
        let output = "Processes: 612 total, 3 running, 609 sleeping, 3050 threads\nCPU usage: 12.50% user, 7.25% sys, 80.25% idle\n";
        assert_eq!(CpuSample::from_top(output).usage_percent, 19.75);
    }

    #[test]
    fn test_cpu_usage_defaults_to_zero() {
        assert_eq!(CpuSample::from_top("garbage").usage_percent, 0.0);
        assert_eq!(CpuSample::from_top("CPU usage: 12.50% user").usage_percent, 0.0);
    }

    #[test]
    fn test_cpu_usage_with_non_ascii_separators() {
        let output = "CPU usage: «12.5% user, ·3.0% sys, 84.5% idle";
        assert_eq!(CpuSample::from_top(output).usage_percent, 15.5);
        assert_eq!(CpuSample::from_top("CPU usage: «% user, ·% sys").usage_percent, 0.0);
    }

    const VM_STAT: &str = "Mach Virtual Memory Statistics: (page size of 16384 bytes)
Pages free:                               10000.
Pages active:                            200000.
Pages inactive:                          150000.
Pages speculative:                        10000.
Pages throttled:                              0.
Pages wired down:                        100000.
Pages purgeable:                           5000.
Pages occupied by compressor:             50000.
";

    #[test]
    fn test_memory_breakdown() {
        let page = 16_384;
        let total = 16 * 1024 * 1024 * 1024;
        let sample = MemorySample::from_vm_stat(total, page, VM_STAT);

        assert_eq!(sample.free_bytes, 10_000 * page);
        assert_eq!(sample.wired_bytes, 100_000 * page);
        assert_eq!(sample.app_bytes, 300_000 * page);
        assert_eq!(sample.compressed_bytes, 50_000 * page);
        assert_eq!(sample.cached_bytes, 165_000 * page);
        assert_eq!(sample.purgeable_bytes, 5_000 * page);

        let expected = (350_000 * page) as f64 / total as f64 * 100.0;
        assert!((sample.used_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn test_memory_zero_total_has_zero_percent() {
        let sample = MemorySample::from_vm_stat(0, DEFAULT_PAGE_SIZE, VM_STAT);
        assert_eq!(sample.used_percent, 0.0);
    }

    #[test]
    fn test_disk_container_space() {
        let output = "   Device Identifier:         disk3s1s1
   Container Total Space:     494.4 GB (494384795648 Bytes) (exactly 965595304 512-Byte-Units)
   Container Free Space:      200.0 GB (200000000000 Bytes) (exactly 390625000 512-Byte-Units)
   Volume Used Space:         11.2 GB (11200000000 Bytes) (exactly 21875000 512-Byte-Units)
";
        let sample = DiskSample::from_diskutil(output);
        assert_eq!(sample.total_gb, 494.4);
        assert_eq!(sample.available_gb, 200.0);
        assert_eq!(sample.purgeable_gb, 200.0);
        assert_eq!(sample.used_gb, 11.2);
        assert_eq!(sample.used_percent, 2);
    }

    #[test]
    fn test_disk_used_falls_back_to_total_minus_free() {
        let output = "Container Total Space: 1.0 TB (1000000000000 Bytes)\nContainer Free Space: 256.0 GB (256000000000 Bytes)\n";
        let sample = DiskSample::from_diskutil(output);
        assert_eq!(sample.total_gb, 1024.0);
        assert_eq!(sample.used_gb, 768.0);
        assert_eq!(sample.used_percent, 75);
    }

    #[test]
    fn test_disk_missing_output_is_zeroed() {
        assert_eq!(DiskSample::from_diskutil(""), DiskSample::default());
    }

    #[test]
    fn test_size_rejects_unknown_units() {
        assert_eq!(size_in_gb("12 KB", &["GB"]), None);
        assert_eq!(size_in_gb("512.0 MB", &["MB"]), Some(0.5));
    }
}
