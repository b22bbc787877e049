//! Error types for solver operations.

use dc_core::error::DcError;
use thiserror::Error;

/// Errors that can occur inside the nonlinear solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what} (iterations={iterations}, x={last_x}, residual={residual})")]
    ConvergenceFailed {
        what: String,
        iterations: usize,
        last_x: f64,
        residual: f64,
    },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error(transparent)]
    Core(#[from] DcError),
}

pub type SolverResult<T> = Result<T, SolverError>;
