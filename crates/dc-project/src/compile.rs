//! Build runtime objects from a column file.

use crate::schema::{ColumnDef, EquilibriumDef, IntegratorDef, PressureDef, PressureUnit, RunDef};
use crate::validate::ValidationError;
use dc_column::{ColumnConfig, DistillationColumn};
use dc_core::units::{Pressure, k, pa, psi};
use dc_sim::{IntegratorType, SimOptions};
use dc_thermo::{
    BubblePointModel, ConstantVolatility, EquilibriumModel, Nrtl, TauCorrelation, VaporPressure,
};

fn thermo_invalid(field: &str, err: impl std::fmt::Display) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: String::new(),
        reason: err.to_string(),
    }
}

impl PressureDef {
    pub fn to_pressure(self) -> Pressure {
        match self.unit {
            PressureUnit::Pa => pa(self.value),
            PressureUnit::Psi => psi(self.value),
        }
    }
}

pub fn compile_equilibrium(def: &EquilibriumDef) -> Result<EquilibriumModel, ValidationError> {
    match def {
        EquilibriumDef::ConstantVolatility { alpha } => ConstantVolatility::new(*alpha)
            .map(EquilibriumModel::from)
            .map_err(|e| thermo_invalid("equilibrium.alpha", e)),
        EquilibriumDef::BubblePoint {
            column_pressure,
            light_vapor_pressure,
            heavy_vapor_pressure,
            tau12,
            tau21,
            nrtl_alpha,
            initial_temperature_k,
        } => {
            let light = VaporPressure::from_slice(light_vapor_pressure)
                .map_err(|e| thermo_invalid("equilibrium.light_vapor_pressure", e))?;
            let heavy = VaporPressure::from_slice(heavy_vapor_pressure)
                .map_err(|e| thermo_invalid("equilibrium.heavy_vapor_pressure", e))?;
            let tau12 = TauCorrelation::from_slice(tau12)
                .map_err(|e| thermo_invalid("equilibrium.tau12", e))?;
            let tau21 = TauCorrelation::from_slice(tau21)
                .map_err(|e| thermo_invalid("equilibrium.tau21", e))?;
            let activity = Nrtl::new(tau12, tau21, *nrtl_alpha)
                .map_err(|e| thermo_invalid("equilibrium.nrtl_alpha", e))?;

            let mut model =
                BubblePointModel::new(light, heavy, activity, column_pressure.to_pressure())
                    .map_err(|e| thermo_invalid("equilibrium.column_pressure", e))?;
            if let Some(t0) = initial_temperature_k {
                model = model
                    .with_initial_temperature(k(*t0))
                    .map_err(|e| thermo_invalid("equilibrium.initial_temperature_k", e))?;
            }
            Ok(model.into())
        }
    }
}

/// Build and validate the column described by `def`.
pub fn compile_column(def: &ColumnDef) -> Result<DistillationColumn, ValidationError> {
    let config = ColumnConfig {
        num_trays: def.num_trays,
        feed_stage: def.feed_stage,
        feed_flow: def.feed_flow,
        feed_composition: def.feed_composition,
        feed_quality: def.feed_quality,
        reflux_ratio: def.reflux_ratio,
        distillate_flow: def.distillate_flow,
        weir_constant: def.weir_constant,
        tray_holdup: def.tray_holdup,
        reboiler_holdup: def.reboiler_holdup,
        condenser_holdup: def.condenser_holdup,
        level_gain: def.level_gain,
        equilibrium: compile_equilibrium(&def.equilibrium)?,
    };
    Ok(DistillationColumn::new(config)?)
}

/// Integrator options for a run section. `t_end` is set by the caller.
pub fn sim_options(run: &RunDef) -> SimOptions {
    let defaults = SimOptions::default();
    SimOptions {
        t_end: run.duration,
        dt: run.dt,
        integrator: match run.integrator {
            IntegratorDef::Rosenbrock23 => IntegratorType::Rosenbrock23,
            IntegratorDef::Rk4 => IntegratorType::RK4,
        },
        tolerances: run.tolerances.unwrap_or(defaults.tolerances),
        max_steps: run.max_steps.unwrap_or(defaults.max_steps),
        ..defaults
    }
}
