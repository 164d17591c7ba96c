//! Battery, power and system samples for powerdash.
//!
//! Each sample is parsed from the text printed by one operating-system tool
//! and is a plain value: a failed or unparseable query produces the sample's
//! `Default` rather than an error. The [`SampleProvider`] trait is the seam
//! the dashboard consumes, so tests can feed synthetic samples without
//! running any tool.
//!
//! # Example
//!
//! ```no_run
//! use powerdash_platform::{MacOSSampler, SampleProvider};
//!
//! let sampler = MacOSSampler::new();
//! let battery = sampler.battery();
//! println!("Cycles: {}", battery.cycle_count);
//! ```

mod battery;
pub mod command;
mod macos;
mod power;
mod provider;
mod system;
mod types;

pub use battery::BatterySample;
pub use command::CommandError;
pub use macos::MacOSSampler;
pub use power::{PowerStatusSample, ThermalSample};
pub use provider::SampleProvider;
pub use system::{bytes_to_gb, CpuSample, DiskSample, MemorySample};
pub use types::ChargeStatus;
