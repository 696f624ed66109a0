mod frame;
mod store;

pub use frame::{CommandBuffer, PointSample, SweepFrame};
pub use store::TelemetryStore;
