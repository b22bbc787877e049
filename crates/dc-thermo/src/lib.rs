//! dc-thermo: vapor-liquid equilibrium for binary mixtures.
//!
//! Provides:
//! - Five-parameter vapor-pressure correlation (`VaporPressure`)
//! - NRTL activity coefficients with temperature-dependent interaction
//!   parameters (`Nrtl`, `TauCorrelation`)
//! - Equilibrium models behind the `VaporLiquidEquilibrium` trait:
//!   constant relative volatility and rigorous bubble-point search
//!
//! # Example
//!
//! ```
//! use dc_thermo::{ConstantVolatility, VaporLiquidEquilibrium};
//!
//! let vle = ConstantVolatility::new(2.5).unwrap();
//! let y = vle.vapor_fraction(0.4).unwrap();
//! assert!(y > 0.4);
//! ```

pub mod activity;
pub mod bubble_point;
pub mod equilibrium;
pub mod error;
pub mod vapor_pressure;

pub use activity::{Nrtl, TauCorrelation};
pub use bubble_point::{BubblePoint, BubblePointModel};
pub use equilibrium::{ConstantVolatility, EquilibriumModel, VaporLiquidEquilibrium};
pub use error::{ThermoError, ThermoResult};
pub use vapor_pressure::VaporPressure;

/// Slack allowed when checking that an equilibrium mole fraction lies in [0, 1].
pub const FRACTION_TOLERANCE: f64 = 1e-9;
