//! Transient runs of a column.

use crate::error::{ColumnError, ColumnResult};
use crate::model::DistillationColumn;
use dc_sim::{IntegrationStats, SimOptions, Trajectory, run_sim_from};
use nalgebra::DVector;

/// Result of a transient column run with dense output.
#[derive(Clone, Debug)]
pub struct ColumnTrajectory {
    trajectory: Trajectory,
    num_stages: usize,
}

impl ColumnTrajectory {
    /// `(t_start, t_end)` covered by the run.
    pub fn t_span(&self) -> (f64, f64) {
        self.trajectory.t_span()
    }

    /// Interpolated state at `t`, or None outside the span.
    pub fn state_at(&self, t: f64) -> Option<DVector<f64>> {
        self.trajectory.evaluate(t)
    }

    /// Time grid taken by the integrator.
    pub fn times(&self) -> &[f64] {
        self.trajectory.times()
    }

    /// States on `times()`.
    pub fn states(&self) -> &[DVector<f64>] {
        self.trajectory.states()
    }

    pub fn final_state(&self) -> &DVector<f64> {
        self.trajectory.final_state()
    }

    /// Final condenser (distillate) composition.
    pub fn top_composition(&self) -> f64 {
        self.final_state()[2 * self.num_stages - 1]
    }

    /// Final reboiler (bottoms) composition.
    pub fn bottom_composition(&self) -> f64 {
        self.final_state()[self.num_stages]
    }

    /// Final liquid compositions, reboiler first.
    pub fn final_compositions(&self) -> &[f64] {
        &self.final_state().as_slice()[self.num_stages..]
    }

    /// `n + 1` evenly spaced samples over the span.
    pub fn sample(&self, n: usize) -> Vec<(f64, DVector<f64>)> {
        self.trajectory.sample(n)
    }

    pub fn stats(&self) -> IntegrationStats {
        self.trajectory.stats()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }
}

impl DistillationColumn {
    /// Integrate the column for `duration` from `initial_state`, or from the
    /// analytic initial state when None.
    pub fn run_simulation(
        &self,
        duration: f64,
        initial_state: Option<DVector<f64>>,
    ) -> ColumnResult<ColumnTrajectory> {
        self.run_simulation_with(duration, initial_state, &SimOptions::default())
    }

    /// As `run_simulation`, with explicit integrator options. `opts.t_end` is
    /// replaced by `duration`.
    pub fn run_simulation_with(
        &self,
        duration: f64,
        initial_state: Option<DVector<f64>>,
        opts: &SimOptions,
    ) -> ColumnResult<ColumnTrajectory> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ColumnError::configuration(format!(
                "duration must be positive, got {duration}"
            )));
        }

        let x0 = initial_state.unwrap_or_else(|| self.analytic_initial_state());
        let (m, x) = self.split_state(&x0)?;
        self.check_physical(0.0, m, x)?;

        let opts = SimOptions {
            t_end: duration,
            ..opts.clone()
        };
        tracing::info!(
            duration,
            stages = self.num_stages(),
            integrator = ?opts.integrator,
            "column run started"
        );

        let trajectory = run_sim_from(self, x0, &opts).map_err(ColumnError::from)?;

        for (t, state) in trajectory.times().iter().zip(trajectory.states()) {
            let (m, x) = self.split_state(state)?;
            self.check_physical(*t, m, x)?;
        }

        let stats = trajectory.stats();
        tracing::info!(
            steps = stats.accepted_steps,
            rejected = stats.rejected_steps,
            rhs_evals = stats.rhs_evals,
            "column run finished"
        );

        Ok(ColumnTrajectory {
            trajectory,
            num_stages: self.num_stages(),
        })
    }
}
