pub mod metrics;
pub mod snapshot;

pub use metrics::{Band, Metrics};
pub use snapshot::Snapshot;
