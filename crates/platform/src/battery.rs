//! Battery and power adapter sample parsed from the I/O Registry.

/// Battery and adapter snapshot from `ioreg -rn AppleSmartBattery`.
///
/// Every field falls back to zero (or `false`) when the registry dump lacks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatterySample {
    /// Charge currently held, in mAh.
    pub current_capacity_mah: u32,

    /// Full charge capacity today, in mAh (degrades over time).
    pub max_capacity_mah: u32,

    /// Original factory capacity, in mAh.
    pub design_capacity_mah: u32,

    /// Voltage across the pack, in millivolts.
    pub voltage_mv: u32,

    /// Instantaneous current in milliamps. Negative when discharging.
    pub amperage_ma: i32,

    pub is_charging: bool,

    /// Whether a power adapter is connected.
    pub external_connected: bool,

    pub cycle_count: u32,

    /// Adapter power rating in watts.
    pub adapter_watts: u32,

    pub adapter_voltage_mv: u32,

    /// Maximum current the adapter can supply, in milliamps.
    pub adapter_current_ma: u32,

    /// Power the system is drawing, in milliwatts.
    pub system_power_mw: u32,

    /// Current flowing into the battery, in milliamps.
    pub charging_current_ma: i32,

    pub charging_voltage_mv: u32,

    /// Per-cell voltages of the three-cell pack, in millivolts.
    pub cell_voltages_mv: [u32; 3],
}

impl BatterySample {
    /// Parses the text dump printed by `ioreg -rn AppleSmartBattery`.
    ///
    /// Apple silicon machines report `CurrentCapacity`/`MaxCapacity` as
    /// percentages and the mAh values under `AppleRaw*`, so the raw keys win
    /// when present.
    pub fn from_ioreg(output: &str) -> Self {
        Self {
            current_capacity_mah: unsigned(output, "AppleRawCurrentCapacity")
                .or_else(|| unsigned(output, "CurrentCapacity"))
                .unwrap_or(0),
            max_capacity_mah: unsigned(output, "AppleRawMaxCapacity")
                .or_else(|| unsigned(output, "MaxCapacity"))
                .unwrap_or(0),
            design_capacity_mah: unsigned(output, "DesignCapacity").unwrap_or(0),
            voltage_mv: unsigned(output, "Voltage").unwrap_or(0),
            amperage_ma: signed(output, "InstantAmperage")
                .or_else(|| signed(output, "Amperage"))
                .unwrap_or(0),
            is_charging: flag(output, "IsCharging"),
            external_connected: flag(output, "ExternalConnected"),
            cycle_count: unsigned(output, "CycleCount").unwrap_or(0),
            adapter_watts: unsigned(output, "Watts").unwrap_or(0),
            adapter_voltage_mv: unsigned(output, "AdapterVoltage").unwrap_or(0),
            adapter_current_ma: unsigned(output, "Current").unwrap_or(0),
            system_power_mw: unsigned(output, "SystemPowerIn").unwrap_or(0),
            charging_current_ma: signed(output, "ChargingCurrent").unwrap_or(0),
            charging_voltage_mv: unsigned(output, "ChargingVoltage").unwrap_or(0),
            cell_voltages_mv: cell_voltages(output).unwrap_or([0; 3]),
        }
    }
}

/// Returns the raw value following the first `"key" =` in the dump.
///
/// Values end at the next separator, except parenthesised lists which are
/// returned whole.
fn field<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    let needle = format!("\"{}\"", key);
    let mut rest = output;

    while let Some(pos) = rest.find(&needle) {
        rest = &rest[pos + needle.len()..];
        let Some(value) = rest.trim_start().strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();

        if value.starts_with('(') {
            let end = value.find(')')?;
            return Some(&value[..=end]);
        }

        let end = value
            .find(|c: char| matches!(c, ',' | '}' | ')' | '\n' | '\r'))
            .unwrap_or(value.len());
        return Some(value[..end].trim_end());
    }

    None
}

fn unsigned(output: &str, key: &str) -> Option<u32> {
    field(output, key)?.parse().ok()
}

/// ioreg prints negative currents either signed or as their 64-bit two's
/// complement, depending on the macOS release.
fn signed(output: &str, key: &str) -> Option<i32> {
    let raw = field(output, key)?;
    let value = raw
        .parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<u64>().ok().map(|v| v as i64))?;
    i32::try_from(value).ok()
}

fn flag(output: &str, key: &str) -> bool {
    field(output, key) == Some("Yes")
}

fn cell_voltages(output: &str) -> Option<[u32; 3]> {
    let list = field(output, "CellVoltage")?;
    let inner = list.strip_prefix('(')?.strip_suffix(')')?;

    let mut cells = inner.split(',').map(|v| v.trim().parse::<u32>());
    let first = cells.next()?.ok()?;
    let second = cells.next()?.ok()?;
    let third = cells.next()?.ok()?;
    Some([first, second, third])
}
