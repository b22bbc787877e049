//! Overall and light-component material balance of a column state.

use crate::error::ColumnResult;
use crate::model::DistillationColumn;
use dc_thermo::VaporLiquidEquilibrium;
use nalgebra::DVector;

/// Inventories and boundary flows at one state.
///
/// At any state `accumulation = feed - distillate - bottoms`, and the same
/// holds for the light component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialBalance {
    /// Total holdup over all stages
    pub inventory: f64,
    /// Light-component holdup over all stages
    pub light_inventory: f64,
    pub feed: f64,
    pub distillate: f64,
    pub bottoms: f64,
    pub light_feed: f64,
    pub light_distillate: f64,
    pub light_bottoms: f64,
    /// Rate of change of `inventory`
    pub accumulation: f64,
    /// Rate of change of `light_inventory`
    pub light_accumulation: f64,
}

impl MaterialBalance {
    /// Balance of `state` taken at time `t`.
    pub fn evaluate(column: &DistillationColumn, t: f64, state: &DVector<f64>) -> ColumnResult<Self> {
        let (m, x) = column.split_state(state)?;
        column.check_physical(t, m, x)?;

        let cfg = column.config();
        let y = column.equilibrium().vapor_fractions(x)?;
        let flows = column.flow_profile(m)?;
        let (dm, dmx) = column.balances(&flows, x, &y);

        let top = cfg.condenser();
        let bottoms = flows.bottoms();

        Ok(Self {
            inventory: m.iter().sum(),
            light_inventory: m.iter().zip(x).map(|(m, x)| m * x).sum(),
            feed: cfg.feed_flow,
            distillate: cfg.distillate_flow,
            bottoms,
            light_feed: cfg.feed_flow * cfg.feed_composition,
            light_distillate: cfg.distillate_flow * x[top],
            light_bottoms: bottoms * x[0],
            accumulation: dm.iter().sum(),
            light_accumulation: dmx.iter().sum(),
        })
    }

    /// `accumulation - (feed - distillate - bottoms)`.
    pub fn imbalance(&self) -> f64 {
        self.accumulation - (self.feed - self.distillate - self.bottoms)
    }

    /// Light-component counterpart of `imbalance`.
    pub fn light_imbalance(&self) -> f64 {
        self.light_accumulation - (self.light_feed - self.light_distillate - self.light_bottoms)
    }
}
