//! Thermodynamic errors.

use dc_core::DcError;
use dc_solver::SolverError;
use thiserror::Error;

/// Result type for equilibrium calculations.
pub type ThermoResult<T> = Result<T, ThermoError>;

/// Errors that can occur during equilibrium calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Invalid model parameter.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Non-physical intermediate value (negative pressure, NaN, ...).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Bubble-point temperature search failed for one element.
    #[error(
        "Bubble-point search did not converge for element {index} (x={x}, residual={residual_pa} Pa)"
    )]
    Convergence {
        index: usize,
        x: f64,
        residual_pa: f64,
    },

    /// Converged model returned a vapor fraction outside [0, 1].
    #[error("Inconsistent equilibrium for element {index}: x={x} gives y={y}")]
    Inconsistent { index: usize, x: f64, y: f64 },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Core(#[from] DcError),
}

impl ThermoError {
    /// Re-tag an element-level error with its position in a composition vector.
    pub fn at_index(self, index: usize) -> Self {
        match self {
            ThermoError::Convergence { x, residual_pa, .. } => ThermoError::Convergence {
                index,
                x,
                residual_pa,
            },
            ThermoError::Inconsistent { x, y, .. } => ThermoError::Inconsistent { index, x, y },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ThermoError::Convergence {
            index: 3,
            x: 0.25,
            residual_pa: 12.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("element 3"));
        assert!(msg.contains("x=0.25"));
    }

    #[test]
    fn at_index_retags() {
        let err = ThermoError::Inconsistent {
            index: 0,
            x: 0.5,
            y: 1.2,
        }
        .at_index(7);
        assert!(matches!(err, ThermoError::Inconsistent { index: 7, .. }));
    }
}
