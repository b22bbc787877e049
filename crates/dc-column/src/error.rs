//! Column-level errors.

use dc_core::DcError;
use dc_sim::SimError;
use dc_solver::SolverError;
use dc_thermo::ThermoError;
use thiserror::Error;

pub type ColumnResult<T> = Result<T, ColumnError>;

/// Errors surfaced by column construction, evaluation and simulation.
///
/// Every kind is terminal for the current run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColumnError {
    #[error("Invalid column configuration: {what}")]
    Configuration { what: String },

    /// Bubble-point search failed for one stage.
    #[error(
        "Equilibrium did not converge at stage {stage} (x={composition}, residual={residual_pa} Pa)"
    )]
    Convergence {
        stage: usize,
        composition: f64,
        residual_pa: f64,
    },

    /// A holdup reached zero or a composition left [0, 1].
    #[error("Non-physical {what} at stage {stage}, t={t}: {value}")]
    PhysicalState {
        stage: usize,
        t: f64,
        value: f64,
        what: &'static str,
    },

    /// The integrator gave up (step-size underflow, step limit, ...).
    #[error("Integration failed: {message}")]
    Integration { message: String },

    #[error("Steady-state solve failed: {message}")]
    SteadyState { message: String },

    #[error("Equilibrium error: {0}")]
    Equilibrium(ThermoError),
}

impl ColumnError {
    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        ColumnError::Configuration { what: what.into() }
    }
}

impl From<ThermoError> for ColumnError {
    fn from(err: ThermoError) -> Self {
        match err {
            ThermoError::Convergence {
                index,
                x,
                residual_pa,
            } => ColumnError::Convergence {
                stage: index,
                composition: x,
                residual_pa,
            },
            other => ColumnError::Equilibrium(other),
        }
    }
}

impl From<DcError> for ColumnError {
    fn from(err: DcError) -> Self {
        ColumnError::Configuration {
            what: err.to_string(),
        }
    }
}

impl From<SolverError> for ColumnError {
    fn from(err: SolverError) -> Self {
        ColumnError::SteadyState {
            message: err.to_string(),
        }
    }
}

impl From<SimError> for ColumnError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::NonPhysical {
                what,
                index,
                t,
                value,
            } => ColumnError::PhysicalState {
                stage: index,
                t,
                value,
                what,
            },
            SimError::Model(inner) => match inner.downcast::<ColumnError>() {
                Ok(column) => *column,
                Err(other) => ColumnError::Integration {
                    message: other.to_string(),
                },
            },
            other => ColumnError::Integration {
                message: other.to_string(),
            },
        }
    }
}
