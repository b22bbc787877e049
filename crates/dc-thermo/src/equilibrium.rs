//! Equilibrium model trait and the constant relative-volatility model.

use crate::FRACTION_TOLERANCE;
use crate::bubble_point::BubblePointModel;
use crate::error::{ThermoError, ThermoResult};

/// Maps a liquid light-component mole fraction to the equilibrium vapor
/// mole fraction at the model's pressure.
///
/// Implementations must be thread-safe (Send + Sync) so that stage-wise
/// evaluation can run in parallel.
pub trait VaporLiquidEquilibrium: Send + Sync {
    /// Model name (for logging).
    fn name(&self) -> &str;

    /// Equilibrium vapor fraction for one liquid composition.
    fn vapor_fraction(&self, x: f64) -> ThermoResult<f64>;

    /// Element-wise equilibrium for a composition vector.
    ///
    /// Errors carry the index of the offending element.
    fn vapor_fractions(&self, xs: &[f64]) -> ThermoResult<Vec<f64>> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| self.vapor_fraction(x).map_err(|e| e.at_index(i)))
            .collect()
    }
}

/// Reject a vapor fraction outside [0, 1] when the liquid fraction is inside.
pub(crate) fn check_consistent(x: f64, y: f64) -> ThermoResult<f64> {
    let x_in_range = (0.0..=1.0).contains(&x);
    let y_in_range = y >= -FRACTION_TOLERANCE && y <= 1.0 + FRACTION_TOLERANCE;
    if !y.is_finite() || (x_in_range && !y_in_range) {
        return Err(ThermoError::Inconsistent { index: 0, x, y });
    }
    Ok(y)
}

/// Constant relative volatility: `y = alpha*x / (1 + x*(alpha - 1))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantVolatility {
    alpha: f64,
}

impl ConstantVolatility {
    pub fn new(alpha: f64) -> ThermoResult<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ThermoError::InvalidArg {
                what: "relative volatility must be positive and finite",
            });
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl VaporLiquidEquilibrium for ConstantVolatility {
    fn name(&self) -> &str {
        "constant-volatility"
    }

    fn vapor_fraction(&self, x: f64) -> ThermoResult<f64> {
        let y = self.alpha * x / (1.0 + x * (self.alpha - 1.0));
        check_consistent(x, y)
    }
}

/// Equilibrium model selected by column configuration.
#[derive(Clone, Debug)]
pub enum EquilibriumModel {
    ConstantVolatility(ConstantVolatility),
    BubblePoint(BubblePointModel),
}

impl From<ConstantVolatility> for EquilibriumModel {
    fn from(model: ConstantVolatility) -> Self {
        EquilibriumModel::ConstantVolatility(model)
    }
}

impl From<BubblePointModel> for EquilibriumModel {
    fn from(model: BubblePointModel) -> Self {
        EquilibriumModel::BubblePoint(model)
    }
}

impl VaporLiquidEquilibrium for EquilibriumModel {
    fn name(&self) -> &str {
        match self {
            EquilibriumModel::ConstantVolatility(m) => m.name(),
            EquilibriumModel::BubblePoint(m) => m.name(),
        }
    }

    fn vapor_fraction(&self, x: f64) -> ThermoResult<f64> {
        match self {
            EquilibriumModel::ConstantVolatility(m) => m.vapor_fraction(x),
            EquilibriumModel::BubblePoint(m) => m.vapor_fraction(x),
        }
    }

    fn vapor_fractions(&self, xs: &[f64]) -> ThermoResult<Vec<f64>> {
        match self {
            EquilibriumModel::ConstantVolatility(m) => m.vapor_fractions(xs),
            EquilibriumModel::BubblePoint(m) => m.vapor_fractions(xs),
        }
    }
}
