//! Dense-output simulation record.

use nalgebra::DVector;

/// Counters collected by the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegrationStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
    pub jacobian_evals: usize,
}

/// Accepted steps of a run with cubic Hermite dense output.
///
/// Every accepted step stores the state and its derivative, so any time inside
/// the span can be evaluated with third-order accuracy between grid points.
#[derive(Clone, Debug)]
pub struct Trajectory {
    t: Vec<f64>,
    x: Vec<DVector<f64>>,
    dxdt: Vec<DVector<f64>>,
    stats: IntegrationStats,
}

impl Trajectory {
    pub(crate) fn new(t0: f64, x0: DVector<f64>, dxdt0: DVector<f64>) -> Self {
        Self {
            t: vec![t0],
            x: vec![x0],
            dxdt: vec![dxdt0],
            stats: IntegrationStats::default(),
        }
    }

    pub(crate) fn push(&mut self, t: f64, x: DVector<f64>, dxdt: DVector<f64>) {
        self.t.push(t);
        self.x.push(x);
        self.dxdt.push(dxdt);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut IntegrationStats {
        &mut self.stats
    }

    /// Time grid actually taken by the integrator.
    pub fn times(&self) -> &[f64] {
        &self.t
    }

    /// States at `times()`.
    pub fn states(&self) -> &[DVector<f64>] {
        &self.x
    }

    /// Derivatives at `times()`.
    pub fn derivatives(&self) -> &[DVector<f64>] {
        &self.dxdt
    }

    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// `(t_start, t_end)` covered by the record.
    pub fn t_span(&self) -> (f64, f64) {
        (self.t[0], self.t[self.t.len() - 1])
    }

    pub fn final_state(&self) -> &DVector<f64> {
        &self.x[self.x.len() - 1]
    }

    /// Interpolated state at `t`, or None outside the covered span.
    pub fn evaluate(&self, t: f64) -> Option<DVector<f64>> {
        let (t0, t1) = self.t_span();
        if !(t >= t0 && t <= t1) {
            return None;
        }
        if self.t.len() == 1 {
            return Some(self.x[0].clone());
        }

        let i = self
            .t
            .partition_point(|&ti| ti <= t)
            .saturating_sub(1)
            .min(self.t.len() - 2);
        let (ta, tb) = (self.t[i], self.t[i + 1]);
        let h = tb - ta;
        let s = (t - ta) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        Some(
            &self.x[i] * h00
                + &self.dxdt[i] * (h10 * h)
                + &self.x[i + 1] * h01
                + &self.dxdt[i + 1] * (h11 * h),
        )
    }

    /// `n + 1` evenly spaced dense-output samples over the span.
    pub fn sample(&self, n: usize) -> Vec<(f64, DVector<f64>)> {
        let (t0, t1) = self.t_span();
        let n = n.max(1);
        (0..=n)
            .filter_map(|i| {
                let t = if i == n {
                    t1
                } else {
                    t0 + (t1 - t0) * i as f64 / n as f64
                };
                self.evaluate(t).map(|x| (t, x))
            })
            .collect()
    }
}
