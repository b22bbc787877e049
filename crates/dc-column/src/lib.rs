//! Dynamic binary distillation column.
//!
//! Provides:
//! - `ColumnConfig`: operating parameters and the equilibrium model
//! - `DistillationColumn`: tray-by-tray holdup and composition balances
//!   implementing `dc_sim::TransientModel`
//! - Analytic and Newton-solved initial states
//! - `run_simulation` with dense-output `ColumnTrajectory`
//! - `MaterialBalance` conservation report and McCabe–Thiele point sequences
//!
//! # Example
//!
//! ```no_run
//! use dc_column::{ColumnConfig, DistillationColumn};
//!
//! let config = ColumnConfig::ideal(10, 5, 100.0, 0.5, 50.0, 2.0)?.with_reflux_ratio(1.5);
//! let column = DistillationColumn::new(config)?;
//! let run = column.run_simulation(50.0, None)?;
//! assert!(run.top_composition() > 0.5);
//! # Ok::<(), dc_column::ColumnError>(())
//! ```

pub mod balance;
pub mod config;
pub mod error;
pub mod flows;
pub mod initial;
pub mod mccabe;
pub mod model;
pub mod simulate;

pub use balance::MaterialBalance;
pub use config::ColumnConfig;
pub use error::{ColumnError, ColumnResult};
pub use flows::FlowProfile;
pub use mccabe::{MIN_GRID_STEP, McCabeThiele, mccabe_thiele, uniform_grid};
pub use model::{COMPOSITION_TOLERANCE, DistillationColumn};
pub use simulate::ColumnTrajectory;
