// piiguard-context/src/lib.rs
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod window;
pub mod context;
pub mod scoring;

/// Confidence score attached to a detection, always within `[0.0, 1.0]`.
pub type ConfidenceScore = f64;
