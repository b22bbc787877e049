//! Column file schema definitions.

use dc_core::Tolerances;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColumnFile {
    pub version: u32,
    pub name: String,
    pub column: ColumnDef,
    #[serde(default)]
    pub run: RunDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    pub num_trays: usize,
    pub feed_stage: usize,
    pub feed_flow: f64,
    pub feed_composition: f64,
    #[serde(default = "default_feed_quality")]
    pub feed_quality: f64,
    pub reflux_ratio: f64,
    pub distillate_flow: f64,
    #[serde(default = "default_weir_constant")]
    pub weir_constant: f64,
    #[serde(default = "default_tray_holdup")]
    pub tray_holdup: f64,
    #[serde(default = "default_vessel_holdup")]
    pub reboiler_holdup: f64,
    #[serde(default = "default_vessel_holdup")]
    pub condenser_holdup: f64,
    #[serde(default)]
    pub level_gain: f64,
    pub equilibrium: EquilibriumDef,
}

/// Equilibrium model; `model` selects the variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model", rename_all = "snake_case", deny_unknown_fields)]
pub enum EquilibriumDef {
    ConstantVolatility {
        alpha: f64,
    },
    BubblePoint {
        #[serde(default)]
        column_pressure: PressureDef,
        /// `[a, b, c, d, e]` of `exp(a + b/T + c ln T + d T^e)` in Pa; missing
        /// trailing coefficients are zero
        light_vapor_pressure: Vec<f64>,
        heavy_vapor_pressure: Vec<f64>,
        /// `[A, B, C, D]` of `A + B/T + C ln T + D T`
        #[serde(default)]
        tau12: Vec<f64>,
        #[serde(default)]
        tau21: Vec<f64>,
        #[serde(default = "default_nrtl_alpha")]
        nrtl_alpha: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_temperature_k: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PressureDef {
    pub value: f64,
    #[serde(default)]
    pub unit: PressureUnit,
}

impl Default for PressureDef {
    fn default() -> Self {
        Self {
            value: dc_core::units::constants::STANDARD_ATMOSPHERE_PA,
            unit: PressureUnit::Pa,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PressureUnit {
    #[default]
    Pa,
    Psi,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    Rosenbrock23,
    Rk4,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartDef {
    /// Analytic holdups, uniform feed composition
    #[default]
    Analytic,
    /// Newton-solved steady state
    SteadyState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunDef {
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default)]
    pub start: StartDef,
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerances: Option<Tolerances>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            samples: default_samples(),
            start: StartDef::default(),
            integrator: IntegratorDef::default(),
            dt: None,
            tolerances: None,
            max_steps: None,
        }
    }
}

fn default_feed_quality() -> f64 {
    1.0
}

fn default_weir_constant() -> f64 {
    1.0
}

fn default_tray_holdup() -> f64 {
    0.1
}

fn default_vessel_holdup() -> f64 {
    0.5
}

fn default_nrtl_alpha() -> f64 {
    dc_thermo::Nrtl::DEFAULT_ALPHA
}

fn default_duration() -> f64 {
    100.0
}

fn default_samples() -> usize {
    100
}
