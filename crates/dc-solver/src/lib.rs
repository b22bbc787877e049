//! Nonlinear solver kernels shared by the thermodynamics and column crates.
//!
//! - `jacobian`: forward/central finite-difference Jacobians
//! - `newton`: damped vector Newton with box constraints
//! - `scalar`: one-dimensional Newton with a bracketing bisection fallback

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod scalar;

pub use error::{SolverError, SolverResult};
pub use jacobian::{central_difference_jacobian, finite_difference_jacobian};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use scalar::{RootMethod, ScalarConfig, ScalarRoot, find_root};
