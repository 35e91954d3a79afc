//! Local model infrastructure.

pub mod device;

pub use device::Device;
