//! GPU device, presentation chain and resource lifetime tracking.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;
mod tracker;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use tracker::{ResourceTracker, Tracked};
