//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// State component `index` left its physical range at time `t`.
    #[error("Non-physical {what} at index {index}, t={t}: {value}")]
    NonPhysical {
        what: &'static str,
        index: usize,
        t: f64,
        value: f64,
    },

    #[error("Singular iteration matrix at t={t} (dt={dt})")]
    Singular { t: f64, dt: f64 },

    #[error("Step size underflow at t={t} (dt={dt})")]
    StepSizeUnderflow { t: f64, dt: f64 },

    #[error("Maximum number of steps {steps} exceeded at t={t}")]
    MaxStepsExceeded { t: f64, steps: usize },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Terminal failure inside the model's right-hand side.
    #[error("Model evaluation failed: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Wrap a model-specific error.
    pub fn model<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SimError::Model(Box::new(err))
    }

    /// Failures the step-size controller may recover from by cutting the step.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::NonPhysical { .. } | SimError::Singular { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("inner failure")]
    struct Inner;

    #[test]
    fn model_error_keeps_source() {
        let err = SimError::model(Inner);
        assert!(err.to_string().contains("inner failure"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn non_physical_is_recoverable() {
        let err = SimError::NonPhysical {
            what: "holdup",
            index: 2,
            t: 0.5,
            value: -1.0,
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("index 2"));
    }
}
