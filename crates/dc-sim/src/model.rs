//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;
use nalgebra::DVector;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State dimension and initial state
/// - RHS (right-hand side) computation: x_dot = f(t, x)
///
/// The RHS must be a pure function of `(t, x)`. It may return
/// `SimError::NonPhysical` for trial states outside the model's domain; the
/// integrator then retries with a smaller step. Any other error ends the run.
pub trait TransientModel {
    /// Number of state variables.
    fn dimension(&self) -> usize;

    /// Return the initial state at t=0.
    fn initial_state(&self) -> DVector<f64>;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>>;

    /// Validate an accepted state. Called once per step after the error test.
    fn check_state(&self, _t: f64, _x: &DVector<f64>) -> SimResult<()> {
        Ok(())
    }
}
