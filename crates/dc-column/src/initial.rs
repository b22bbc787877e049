//! Initial states: analytic steady holdups and the Newton-solved steady state.

use crate::error::ColumnResult;
use crate::flows::WEIR_EXPONENT;
use crate::model::DistillationColumn;
use dc_core::clamped_pow;
use dc_solver::{NewtonConfig, central_difference_jacobian, newton_solve};
use dc_thermo::VaporLiquidEquilibrium;
use nalgebra::DVector;

impl DistillationColumn {
    /// Holdups at which every stage's mass balance closes.
    ///
    /// Trays up to the feed carry the stripping liquid, trays above it the
    /// reflux; the weir law is inverted for each.
    pub fn analytic_holdups(&self) -> Vec<f64> {
        let cfg = self.config();
        let top = cfg.condenser();
        let l_str = cfg.stripping_liquid();
        let l_rec = cfg.reflux_flow();

        (0..cfg.num_stages())
            .map(|i| match i {
                0 => cfg.reboiler_holdup,
                i if i == top => cfg.condenser_holdup,
                i => {
                    let liquid = if i <= cfg.feed_stage { l_str } else { l_rec };
                    clamped_pow(liquid / cfg.weir_constant, 1.0 / WEIR_EXPONENT) + cfg.tray_holdup
                }
            })
            .collect()
    }

    /// Analytic holdups with every composition at the feed composition.
    pub fn analytic_initial_state(&self) -> DVector<f64> {
        let m = self.analytic_holdups();
        let x = vec![self.config().feed_composition; m.len()];
        self.join_state(&m, &x)
    }

    /// Steady state with analytic holdups and solved compositions.
    ///
    /// Newton's method drives the composition balances `d(mx) - x*dm` to zero
    /// with the compositions boxed to [0, 1], starting from the feed
    /// composition. The Jacobian uses central differences.
    pub fn steady_state(&self) -> ColumnResult<DVector<f64>> {
        self.steady_state_with(&NewtonConfig {
            abs_tol: 1e-9,
            ..NewtonConfig::unit_interval()
        })
    }

    pub fn steady_state_with(&self, config: &NewtonConfig) -> ColumnResult<DVector<f64>> {
        let m = self.analytic_holdups();
        let flows = self.flow_profile(&m)?;
        let n = m.len();

        let residual = |x: &DVector<f64>| -> ColumnResult<DVector<f64>> {
            let y = self.equilibrium().vapor_fractions(x.as_slice())?;
            let (dm, dmx) = self.balances(&flows, x.as_slice(), &y);
            Ok(DVector::from_iterator(n, (0..n).map(|i| dmx[i] - x[i] * dm[i])))
        };
        let jacobian = |x: &DVector<f64>, _r: &DVector<f64>| {
            central_difference_jacobian(x, &residual, 1e-6)
        };

        let x0 = DVector::from_element(n, self.config().feed_composition);
        let solved = newton_solve(x0, &residual, jacobian, config)?;

        tracing::info!(
            iterations = solved.iterations,
            residual = solved.residual_norm,
            "steady state solved"
        );
        Ok(self.join_state(&m, solved.x.as_slice()))
    }
}
