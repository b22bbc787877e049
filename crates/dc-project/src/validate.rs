//! Column file validation.

use crate::compile::compile_column;
use crate::schema::{ColumnFile, EquilibriumDef, IntegratorDef, RunDef};
use dc_column::ColumnError;

/// Newest file version this crate reads.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Column error: {0}")]
    Column(#[from] ColumnError),
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_file(file: &ColumnFile) -> Result<(), ValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }
    if file.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    if let EquilibriumDef::BubblePoint {
        light_vapor_pressure,
        heavy_vapor_pressure,
        tau12,
        tau21,
        ..
    } = &file.column.equilibrium
    {
        for (field, coeffs, max) in [
            ("equilibrium.light_vapor_pressure", light_vapor_pressure, 5),
            ("equilibrium.heavy_vapor_pressure", heavy_vapor_pressure, 5),
            ("equilibrium.tau12", tau12, 4),
            ("equilibrium.tau21", tau21, 4),
        ] {
            if coeffs.len() > max {
                return Err(invalid(
                    field,
                    coeffs.len(),
                    "too many coefficients",
                ));
            }
        }
        if light_vapor_pressure.is_empty() || heavy_vapor_pressure.is_empty() {
            return Err(invalid(
                "equilibrium.vapor_pressure",
                0,
                "vapor-pressure coefficients are required",
            ));
        }
    }

    validate_run(&file.run)?;
    compile_column(&file.column)?;
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    if !(run.duration.is_finite() && run.duration > 0.0) {
        return Err(invalid("run.duration", run.duration, "must be positive"));
    }
    if run.samples == 0 {
        return Err(invalid("run.samples", run.samples, "must be positive"));
    }
    if let Some(dt) = run.dt
        && !(dt.is_finite() && dt > 0.0)
    {
        return Err(invalid("run.dt", dt, "must be positive"));
    }
    if run.integrator == IntegratorDef::Rk4 && run.dt.is_none() {
        return Err(invalid("run.dt", "none", "rk4 needs a fixed step"));
    }
    if let Some(tol) = run.tolerances
        && !(tol.abs > 0.0 && tol.rel >= 0.0)
    {
        return Err(invalid("run.tolerances", tol.abs, "must be positive"));
    }
    if run.max_steps == Some(0) {
        return Err(invalid("run.max_steps", 0, "must be positive"));
    }
    Ok(())
}
