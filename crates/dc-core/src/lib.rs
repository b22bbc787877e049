//! dc-core: stable foundation for the distillation column workspace.
//!
//! Contains:
//! - units (uom SI types + constructors for pressure and temperature)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DcError, DcResult};
pub use numeric::*;
pub use units::*;
