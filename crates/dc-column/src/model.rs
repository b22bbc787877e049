//! Tray-by-tray material balances.

use crate::config::ColumnConfig;
use crate::error::{ColumnError, ColumnResult};
use crate::flows::FlowProfile;
use dc_sim::{SimError, SimResult, TransientModel};
use dc_thermo::{EquilibriumModel, VaporLiquidEquilibrium};
use nalgebra::DVector;

/// Slack on mole fractions before a state is treated as non-physical.
pub const COMPOSITION_TOLERANCE: f64 = 1e-6;

/// Validated binary distillation column.
///
/// The state vector holds stage holdups followed by liquid light-component
/// mole fractions, both ordered reboiler, trays bottom to top, condenser.
#[derive(Clone, Debug)]
pub struct DistillationColumn {
    config: ColumnConfig,
}

impl DistillationColumn {
    pub fn new(config: ColumnConfig) -> ColumnResult<Self> {
        config.validate()?;
        tracing::debug!(
            trays = config.num_trays,
            feed_stage = config.feed_stage,
            equilibrium = config.equilibrium.name(),
            "column configured"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &ColumnConfig {
        &self.config
    }

    pub fn equilibrium(&self) -> &EquilibriumModel {
        &self.config.equilibrium
    }

    pub fn num_stages(&self) -> usize {
        self.config.num_stages()
    }

    /// Length of the state vector.
    pub fn state_dimension(&self) -> usize {
        2 * self.num_stages()
    }

    /// Human-readable stage names in state order.
    pub fn stage_labels(&self) -> Vec<String> {
        let top = self.config.condenser();
        (0..self.num_stages())
            .map(|i| match i {
                0 => "reboiler".to_string(),
                i if i == top => "condenser".to_string(),
                i => format!("tray {i}"),
            })
            .collect()
    }

    /// Split a state vector into `(holdups, compositions)`.
    pub fn split_state<'a>(&self, state: &'a DVector<f64>) -> ColumnResult<(&'a [f64], &'a [f64])> {
        if state.len() != self.state_dimension() {
            return Err(ColumnError::configuration(format!(
                "state has {} entries, column needs {}",
                state.len(),
                self.state_dimension()
            )));
        }
        Ok(state.as_slice().split_at(self.num_stages()))
    }

    /// Join holdups and compositions into a state vector.
    pub fn join_state(&self, holdups: &[f64], compositions: &[f64]) -> DVector<f64> {
        DVector::from_iterator(
            holdups.len() + compositions.len(),
            holdups.iter().chain(compositions).copied(),
        )
    }

    pub fn flow_profile(&self, holdups: &[f64]) -> ColumnResult<FlowProfile> {
        FlowProfile::from_holdups(&self.config, holdups)
    }

    /// Reject non-positive holdups and compositions outside [0, 1].
    pub fn check_physical(&self, t: f64, holdups: &[f64], compositions: &[f64]) -> ColumnResult<()> {
        if let Some((stage, &m)) = holdups
            .iter()
            .enumerate()
            .find(|(_, m)| !(m.is_finite() && **m > 0.0))
        {
            return Err(ColumnError::PhysicalState {
                stage,
                t,
                value: m,
                what: "holdup",
            });
        }

        let range = -COMPOSITION_TOLERANCE..=1.0 + COMPOSITION_TOLERANCE;
        if let Some((stage, &x)) = compositions
            .iter()
            .enumerate()
            .find(|(_, x)| !range.contains(*x))
        {
            return Err(ColumnError::PhysicalState {
                stage,
                t,
                value: x,
                what: "composition",
            });
        }
        Ok(())
    }

    /// Holdup and light-component accumulation rates `(dm, d(mx))` per stage.
    pub(crate) fn balances(
        &self,
        flows: &FlowProfile,
        x: &[f64],
        y: &[f64],
    ) -> (Vec<f64>, Vec<f64>) {
        let cfg = &self.config;
        let n = cfg.num_stages();
        let top = cfg.condenser();
        let nf = cfg.feed_stage;
        let d = cfg.distillate_flow;
        let (v, l) = (&flows.vapor, &flows.liquid);

        let mut dm = vec![0.0; n];
        let mut dmx = vec![0.0; n];

        dm[0] = l[1] - v[0] - l[0];
        dmx[0] = x[1] * l[1] - v[0] * y[0] - x[0] * l[0];

        for i in 1..top {
            dm[i] = v[i - 1] + l[i + 1] - v[i] - l[i];
            dmx[i] = y[i - 1] * v[i - 1] + x[i + 1] * l[i + 1] - v[i] * y[i] - x[i] * l[i];
        }

        // Total condenser
        dm[top] = v[top - 1] - l[top] - d;
        dmx[top] = y[top - 1] * v[top - 1] - x[top] * (l[top] + d);

        dm[nf] += cfg.feed_flow;
        dmx[nf] += cfg.feed_flow * cfg.feed_composition;

        (dm, dmx)
    }

    /// Time derivative of the state: holdup rates followed by composition rates.
    pub fn derivatives(&self, t: f64, state: &DVector<f64>) -> ColumnResult<DVector<f64>> {
        let (m, x) = self.split_state(state)?;
        self.check_physical(t, m, x)?;

        let y = self.config.equilibrium.vapor_fractions(x)?;
        let flows = self.flow_profile(m)?;
        let (dm, dmx) = self.balances(&flows, x, &y);

        let dx: Vec<f64> = (0..m.len())
            .map(|i| (dmx[i] - x[i] * dm[i]) / m[i])
            .collect();

        Ok(self.join_state(&dm, &dx))
    }
}

fn into_sim_error(err: ColumnError) -> SimError {
    match err {
        ColumnError::PhysicalState {
            stage,
            t,
            value,
            what,
        } => SimError::NonPhysical {
            what,
            index: stage,
            t,
            value,
        },
        other => SimError::model(other),
    }
}

impl TransientModel for DistillationColumn {
    fn dimension(&self) -> usize {
        self.state_dimension()
    }

    fn initial_state(&self) -> DVector<f64> {
        self.analytic_initial_state()
    }

    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        self.derivatives(t, x).map_err(into_sim_error)
    }

    fn check_state(&self, t: f64, x: &DVector<f64>) -> SimResult<()> {
        let (m, comp) = self.split_state(x).map_err(into_sim_error)?;
        self.check_physical(t, m, comp).map_err(into_sim_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> DistillationColumn {
        let cfg = ColumnConfig::ideal(3, 2, 10.0, 0.4, 4.0, 2.0)
            .unwrap()
            .with_reflux_ratio(2.0);
        DistillationColumn::new(cfg).unwrap()
    }

    #[test]
    fn labels_follow_stage_order() {
        let labels = column().stage_labels();
        assert_eq!(labels, vec!["reboiler", "tray 1", "tray 2", "tray 3", "condenser"]);
    }

    #[test]
    fn split_and_join() {
        let col = column();
        let state = col.join_state(&[1.0; 5], &[0.5; 5]);
        let (m, x) = col.split_state(&state).unwrap();
        assert_eq!(m, &[1.0; 5]);
        assert_eq!(x, &[0.5; 5]);
        assert!(col.split_state(&DVector::zeros(4)).is_err());
    }

    #[test]
    fn zero_holdup_is_physical_state_error() {
        let col = column();
        let mut m = [1.0; 5];
        m[2] = 0.0;
        let state = col.join_state(&m, &[0.5; 5]);
        match col.derivatives(3.5, &state) {
            Err(ColumnError::PhysicalState { stage, t, what, .. }) => {
                assert_eq!(stage, 2);
                assert_eq!(t, 3.5);
                assert_eq!(what, "holdup");
            }
            other => panic!("expected PhysicalState, got {other:?}"),
        }
    }

    #[test]
    fn composition_outside_tolerance_is_rejected() {
        let col = column();
        let mut x = [0.5; 5];
        x[4] = 1.0 + 1e-7;
        assert!(col.derivatives(0.0, &col.join_state(&[1.0; 5], &x)).is_ok());
        x[4] = 1.001;
        assert!(matches!(
            col.derivatives(0.0, &col.join_state(&[1.0; 5], &x)),
            Err(ColumnError::PhysicalState {
                stage: 4,
                what: "composition",
                ..
            })
        ));
    }

    #[test]
    fn feed_enters_only_feed_stage() {
        // Uniform composition with x = y everywhere isolates the feed term
        let cfg = ColumnConfig::ideal(3, 2, 10.0, 0.4, 4.0, 1.0)
            .unwrap()
            .with_reflux_ratio(2.0);
        let col = DistillationColumn::new(cfg).unwrap();
        let state = col.join_state(&[1.0; 5], &[0.4; 5]);
        let dxdt = col.derivatives(0.0, &state).unwrap();
        for i in 0..5 {
            assert!(dxdt[5 + i].abs() < 1e-12, "stage {i}: {}", dxdt[5 + i]);
        }

        // Moving feed composition away from the stage composition shows up only at NF
        let mut cfg = col.config().clone();
        cfg.feed_composition = 0.9;
        let col = DistillationColumn::new(cfg).unwrap();
        let dxdt = col.derivatives(0.0, &state).unwrap();
        for i in 0..5 {
            if i == 2 {
                assert!((dxdt[5 + i] - 10.0 * 0.5).abs() < 1e-12);
            } else {
                assert!(dxdt[5 + i].abs() < 1e-12);
            }
        }
    }
}
