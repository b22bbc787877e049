//! Time integrators.
//!
//! Each integrator attempts a single step; accepting or rejecting the step and
//! choosing the next step size is the driver's job (see `sim`).

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;
use dc_core::Tolerances;
use dc_solver::finite_difference_jacobian;
use nalgebra::{DMatrix, DVector};

/// Outcome of one attempted step.
#[derive(Clone, Debug)]
pub struct StepAttempt {
    /// State at `t + dt`
    pub x: DVector<f64>,
    /// Derivative at `(t + dt, x)`, reused by the next step and dense output
    pub dxdt: DVector<f64>,
    /// Weighted max-norm of the local error estimate (None for fixed-step methods)
    pub error_norm: Option<f64>,
    /// Number of RHS evaluations spent on this attempt
    pub rhs_evals: usize,
    /// Number of Jacobian evaluations spent on this attempt
    pub jacobian_evals: usize,
}

/// Trait for time integrators.
pub trait Integrator {
    /// Attempt one step of size `dt` from `(t, x)` where `dxdt = rhs(t, x)`.
    fn step<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dxdt: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepAttempt>;

    /// Order of the embedded error estimate, if the method has one.
    fn error_order(&self) -> Option<u32> {
        None
    }

    /// Forget anything cached for the current step origin.
    fn reset(&mut self) {}
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug, Default)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dxdt: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepAttempt> {
        let k1 = dxdt;

        let x2 = x + k1 * (0.5 * dt);
        let k2 = model.rhs(t + 0.5 * dt, &x2)?;

        let x3 = x + &k2 * (0.5 * dt);
        let k3 = model.rhs(t + 0.5 * dt, &x3)?;

        let x4 = x + &k3 * dt;
        let k4 = model.rhs(t + dt, &x4)?;

        // Combine: x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1 + k2 * 2.0 + k3 * 2.0 + k4;
        let x_new = x + k_sum * (dt / 6.0);
        let dxdt_new = model.rhs(t + dt, &x_new)?;

        Ok(StepAttempt {
            x: x_new,
            dxdt: dxdt_new,
            error_norm: None,
            rhs_evals: 4,
            jacobian_evals: 0,
        })
    }
}

/// Jacobian and time derivative evaluated at the current step origin.
#[derive(Clone, Debug)]
struct Linearization {
    t: f64,
    jacobian: DMatrix<f64>,
    dfdt: DVector<f64>,
}

/// Linearly-implicit Rosenbrock W-method of orders 2(3).
///
/// L-stable, one LU factorisation of `I - h*d*J` per attempt and three
/// right-hand-side evaluations; the third stage provides the embedded error
/// estimate. The Jacobian is computed by forward differences once per step
/// origin and reused across rejected attempts.
#[derive(Clone, Debug)]
pub struct Rosenbrock23 {
    pub tolerances: Tolerances,
    /// Relative perturbation for finite-difference derivatives
    pub jacobian_epsilon: f64,
    cache: Option<Linearization>,
}

impl Rosenbrock23 {
    const D: f64 = 1.0 / (2.0 + std::f64::consts::SQRT_2);
    const E32: f64 = 6.0 + std::f64::consts::SQRT_2;

    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            jacobian_epsilon: 1e-8,
            cache: None,
        }
    }

    fn linearize<M: TransientModel + ?Sized>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dxdt: &DVector<f64>,
    ) -> SimResult<(Linearization, usize)> {
        let jacobian =
            finite_difference_jacobian(x, dxdt, |y| model.rhs(t, y), self.jacobian_epsilon)?;

        let delta = self.jacobian_epsilon.sqrt() * t.abs().max(1.0);
        let dfdt = (model.rhs(t + delta, x)? - dxdt) / delta;

        Ok((Linearization { t, jacobian, dfdt }, x.len() + 1))
    }
}

impl Default for Rosenbrock23 {
    fn default() -> Self {
        Self::new(Tolerances {
            abs: 1e-8,
            rel: 1e-6,
        })
    }
}

impl Integrator for Rosenbrock23 {
    fn step<M: TransientModel + ?Sized>(
        &mut self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dxdt: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepAttempt> {
        let mut rhs_evals = 0;
        let mut jacobian_evals = 0;

        let stale = self.cache.as_ref().is_none_or(|lin| lin.t != t);
        if stale {
            let (lin, evals) = self.linearize(model, t, x, dxdt)?;
            self.cache = Some(lin);
            rhs_evals += evals;
            jacobian_evals += 1;
        }
        let Some(lin) = self.cache.as_ref() else {
            return Err(SimError::InvalidArg {
                what: "missing linearization",
            });
        };

        let n = x.len();
        let hd = dt * Self::D;
        let w = DMatrix::<f64>::identity(n, n) - &lin.jacobian * hd;
        let lu = w.lu();
        let solve = |b: &DVector<f64>| lu.solve(b).ok_or(SimError::Singular { t, dt });

        let t_term = &lin.dfdt * hd;

        let k1 = solve(&(dxdt + &t_term))?;

        let f1 = model.rhs(t + 0.5 * dt, &(x + &k1 * (0.5 * dt)))?;
        let k2 = solve(&(&f1 - &k1))? + &k1;

        let x_new = x + &k2 * dt;
        let f2 = model.rhs(t + dt, &x_new)?;
        rhs_evals += 2;

        let k3 = solve(&(&f2 - (&k2 - &f1) * Self::E32 - (&k1 - dxdt) * 2.0 + &t_term))?;

        let local_error = (&k1 - &k2 * 2.0 + &k3) * (dt / 6.0);
        let error_norm = local_error
            .iter()
            .zip(x.iter().zip(x_new.iter()))
            .map(|(e, (a, b))| e.abs() / self.tolerances.weight(a.abs().max(b.abs())))
            .fold(0.0, f64::max);

        Ok(StepAttempt {
            x: x_new,
            dxdt: f2,
            error_norm: Some(error_norm),
            rhs_evals,
            jacobian_evals,
        })
    }

    fn error_order(&self) -> Option<u32> {
        Some(2)
    }

    fn reset(&mut self) {
        self.cache = None;
    }
}
