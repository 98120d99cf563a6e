//! nupack-common: Shared types, errors, and the response envelope used across all nupack-serve crates.

pub mod error;
pub mod params;
pub mod envelope;

// Re-export commonly used types
pub use error::{ApiError, NupackError, Result};
pub use params::{ComplexesParams, ConcentrationsParams, MfeParams, Scalar};
pub use envelope::{About, Envelope};
