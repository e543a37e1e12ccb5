//! Text extraction from device output and configurations.

pub mod markers;
pub mod serial;

pub use markers::{MarkerKind, VerificationMarker, extract_markers};
pub use serial::extract_serial;
