//! Column configuration.

use crate::error::{ColumnError, ColumnResult};
use dc_core::units::Pressure;
use dc_core::{ensure_in_range, ensure_positive};
use dc_thermo::{ConstantVolatility, EquilibriumModel};

/// Operating and geometric parameters of a binary column.
///
/// Stage 0 is the reboiler, stages `1..=num_trays` are trays counted from the
/// bottom and stage `num_trays + 1` is the total condenser.
#[derive(Clone, Debug)]
pub struct ColumnConfig {
    /// Number of trays (NT)
    pub num_trays: usize,
    /// Feed stage (NF), `0..=num_trays + 1`
    pub feed_stage: usize,
    /// Feed flow (F), mol/time
    pub feed_flow: f64,
    /// Light-component feed mole fraction (zF)
    pub feed_composition: f64,
    /// Feed quality (qF): liquid fraction of the feed
    pub feed_quality: f64,
    /// Reflux ratio (R)
    pub reflux_ratio: f64,
    /// Distillate flow (D)
    pub distillate_flow: f64,
    /// Francis weir constant
    pub weir_constant: f64,
    /// Tray holdup below which no liquid leaves over the weir
    pub tray_holdup: f64,
    /// Nominal reboiler holdup
    pub reboiler_holdup: f64,
    /// Nominal condenser holdup
    pub condenser_holdup: f64,
    /// Reboiler level controller gain (Kc)
    pub level_gain: f64,
    pub equilibrium: EquilibriumModel,
}

impl ColumnConfig {
    /// Configuration with the default hydraulics (weir constant 1, tray holdup
    /// 0.1, reboiler/condenser holdup 0.5, no level control) and unit reflux.
    pub fn new(
        num_trays: usize,
        feed_stage: usize,
        feed_flow: f64,
        feed_composition: f64,
        distillate_flow: f64,
        equilibrium: impl Into<EquilibriumModel>,
    ) -> Self {
        Self {
            num_trays,
            feed_stage,
            feed_flow,
            feed_composition,
            feed_quality: 1.0,
            reflux_ratio: 1.0,
            distillate_flow,
            weir_constant: 1.0,
            tray_holdup: 0.1,
            reboiler_holdup: 0.5,
            condenser_holdup: 0.5,
            level_gain: 0.0,
            equilibrium: equilibrium.into(),
        }
    }

    /// Ideal column with constant relative volatility `alpha`.
    pub fn ideal(
        num_trays: usize,
        feed_stage: usize,
        feed_flow: f64,
        feed_composition: f64,
        distillate_flow: f64,
        alpha: f64,
    ) -> ColumnResult<Self> {
        let vle = ConstantVolatility::new(alpha)
            .map_err(|e| ColumnError::configuration(e.to_string()))?;
        Ok(Self::new(
            num_trays,
            feed_stage,
            feed_flow,
            feed_composition,
            distillate_flow,
            vle,
        ))
    }

    pub fn with_reflux_ratio(mut self, reflux_ratio: f64) -> Self {
        self.reflux_ratio = reflux_ratio;
        self
    }

    pub fn with_feed_quality(mut self, feed_quality: f64) -> Self {
        self.feed_quality = feed_quality;
        self
    }

    pub fn with_level_gain(mut self, level_gain: f64) -> Self {
        self.level_gain = level_gain;
        self
    }

    /// Number of stages including reboiler and condenser.
    pub fn num_stages(&self) -> usize {
        self.num_trays + 2
    }

    /// Index of the condenser stage.
    pub fn condenser(&self) -> usize {
        self.num_trays + 1
    }

    /// Liquid returned to the top tray. A zero distillate flow reads the reflux
    /// ratio as an absolute reflux flow.
    pub fn reflux_flow(&self) -> f64 {
        if self.distillate_flow != 0.0 {
            self.distillate_flow * self.reflux_ratio
        } else {
            self.reflux_ratio
        }
    }

    /// Vapor rising through the rectifying section.
    pub fn rectifying_vapor(&self) -> f64 {
        self.reflux_flow() + self.distillate_flow
    }

    /// Vapor rising through the stripping section.
    pub fn stripping_vapor(&self) -> f64 {
        self.rectifying_vapor() - self.feed_flow * (1.0 - self.feed_quality)
    }

    /// Liquid descending through the stripping section at steady holdups.
    pub fn stripping_liquid(&self) -> f64 {
        self.stripping_vapor() + self.feed_flow - self.distillate_flow
    }

    /// Column pressure, when the equilibrium model depends on one.
    pub fn column_pressure(&self) -> Option<Pressure> {
        match &self.equilibrium {
            EquilibriumModel::ConstantVolatility(_) => None,
            EquilibriumModel::BubblePoint(model) => Some(model.pressure()),
        }
    }

    /// Check ranges and flow consistency.
    pub fn validate(&self) -> ColumnResult<()> {
        if self.num_trays == 0 {
            return Err(ColumnError::configuration("column needs at least one tray"));
        }
        if self.feed_stage > self.condenser() {
            return Err(ColumnError::configuration(format!(
                "feed stage {} outside stages 0..={}",
                self.feed_stage,
                self.condenser()
            )));
        }

        for (name, value) in [
            ("feed_flow", self.feed_flow),
            ("reflux_ratio", self.reflux_ratio),
            ("distillate_flow", self.distillate_flow),
            ("level_gain", self.level_gain),
        ] {
            ensure_in_range(value, 0.0, f64::INFINITY, name)?;
        }
        ensure_in_range(self.feed_composition, 0.0, 1.0, "feed_composition")?;
        ensure_in_range(self.feed_quality, 0.0, 1.0, "feed_quality")?;
        ensure_positive(self.weir_constant, "weir_constant")?;
        ensure_positive(self.tray_holdup, "tray_holdup")?;
        ensure_positive(self.reboiler_holdup, "reboiler_holdup")?;
        ensure_positive(self.condenser_holdup, "condenser_holdup")?;

        if self.distillate_flow > self.feed_flow {
            return Err(ColumnError::configuration(
                "distillate flow exceeds feed flow",
            ));
        }
        if self.stripping_vapor() < 0.0 {
            return Err(ColumnError::configuration(format!(
                "stripping vapor {} is negative: boilup cannot carry the vapor feed",
                self.stripping_vapor()
            )));
        }
        Ok(())
    }
}
