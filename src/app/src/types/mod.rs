//! Domain-based type organization
//!
//! Types are organized by domain to match the structure in `update/`:
//! - device: Device status and command values
//! - session: Connectivity, timers and timings

pub mod device;
pub mod session;

pub use device::*;
pub use session::*;
