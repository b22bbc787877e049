//! Simulation runner with adaptive step control.

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, RK4, Rosenbrock23};
use crate::model::TransientModel;
use crate::trajectory::Trajectory;
use dc_core::{Tolerances, nearly_equal};
use nalgebra::DVector;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Adaptive linearly-implicit Rosenbrock 2(3) (default, stiff-capable).
    #[default]
    Rosenbrock23,
    /// Fixed-step 4th-order Runge-Kutta (non-stiff problems only).
    RK4,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Final simulation time
    pub t_end: f64,
    /// Fixed step for RK4; initial step for Rosenbrock23 (estimated when None)
    pub dt: Option<f64>,
    /// Integrator type (default: Rosenbrock23)
    pub integrator: IntegratorType,
    /// Local error tolerances for adaptive integrators
    pub tolerances: Tolerances,
    /// Smallest step before the run fails with step-size underflow
    pub min_dt: f64,
    /// Largest step taken by adaptive integrators
    pub max_dt: f64,
    /// Maximum number of accepted steps (safety limit)
    pub max_steps: usize,
    /// Consecutive rejected attempts allowed per step
    pub max_retries: usize,
    /// Step reduction after a non-physical trial state or singular matrix
    pub cutback_factor: f64,
    /// Maximum step growth between accepted steps
    pub grow_factor: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            t_end: 1.0,
            dt: None,
            integrator: IntegratorType::default(),
            tolerances: Tolerances {
                abs: 1e-8,
                rel: 1e-6,
            },
            min_dt: 1e-12,
            max_dt: f64::INFINITY,
            max_steps: 100_000,
            max_retries: 50,
            cutback_factor: 0.5,
            grow_factor: 5.0,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.t_end.is_finite() && self.t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if let Some(dt) = self.dt
            && !(dt.is_finite() && dt > 0.0)
        {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.integrator == IntegratorType::RK4 && self.dt.is_none() {
            return Err(SimError::InvalidArg {
                what: "RK4 requires a fixed dt",
            });
        }
        if !(self.min_dt > 0.0 && self.max_dt >= self.min_dt) {
            return Err(SimError::InvalidArg {
                what: "step bounds must satisfy 0 < min_dt <= max_dt",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if !(self.cutback_factor > 0.0 && self.cutback_factor < 1.0) {
            return Err(SimError::InvalidArg {
                what: "cutback_factor must be in (0, 1)",
            });
        }
        if self.grow_factor < 1.0 {
            return Err(SimError::InvalidArg {
                what: "grow_factor must be at least 1",
            });
        }
        if !(self.tolerances.abs > 0.0 && self.tolerances.rel >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "tolerances must be positive",
            });
        }
        Ok(())
    }
}

/// Run a transient simulation from the model's initial state.
pub fn run_sim<M: TransientModel + ?Sized>(model: &M, opts: &SimOptions) -> SimResult<Trajectory> {
    run_sim_from(model, model.initial_state(), opts)
}

/// Run a transient simulation from `x0` at t=0.
pub fn run_sim_from<M: TransientModel + ?Sized>(
    model: &M,
    x0: DVector<f64>,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    opts.validate()?;
    if x0.len() != model.dimension() {
        return Err(SimError::DimensionMismatch {
            expected: model.dimension(),
            got: x0.len(),
        });
    }

    match opts.integrator {
        IntegratorType::Rosenbrock23 => {
            drive(model, x0, opts, Rosenbrock23::new(opts.tolerances))
        }
        IntegratorType::RK4 => drive(model, x0, opts, RK4),
    }
}

/// Initial step from the size of the derivative relative to the tolerances.
fn initial_step(x: &DVector<f64>, dxdt: &DVector<f64>, opts: &SimOptions) -> f64 {
    let tol = opts.tolerances;
    let rate = x
        .iter()
        .zip(dxdt.iter())
        .map(|(xi, fi)| fi.abs() / tol.weight(*xi))
        .fold(0.0, f64::max);
    let h = if rate > 0.0 {
        0.8 * tol.rel.max(1e-12).cbrt() / rate
    } else {
        opts.t_end
    };
    h.clamp(opts.min_dt, opts.max_dt)
}

fn drive<M, I>(model: &M, x0: DVector<f64>, opts: &SimOptions, mut integrator: I) -> SimResult<Trajectory>
where
    M: TransientModel + ?Sized,
    I: Integrator,
{
    let mut t = 0.0;
    model.check_state(t, &x0)?;
    let dxdt0 = model.rhs(t, &x0)?;

    let mut h = match opts.dt {
        Some(dt) => dt.min(opts.max_dt),
        None => initial_step(&x0, &dxdt0, opts),
    };
    let mut record = Trajectory::new(t, x0, dxdt0);
    record.stats_mut().rhs_evals += 1;

    let end_tol = Tolerances {
        abs: 1e-12,
        rel: 1e-12,
    };
    let at_end = |t: f64| t >= opts.t_end || nearly_equal(t, opts.t_end, end_tol);
    let exponent = integrator.error_order().map(|p| -1.0 / (p as f64 + 1.0));
    let nominal_dt = opts.dt;

    tracing::info!(t_end = opts.t_end, dt0 = h, integrator = ?opts.integrator, "transient run started");

    while !at_end(t) {
        if record.stats().accepted_steps >= opts.max_steps {
            return Err(SimError::MaxStepsExceeded {
                t,
                steps: opts.max_steps,
            });
        }

        let x = record.final_state().clone();
        let dxdt = record.derivatives()[record.len() - 1].clone();
        let mut retries = 0;
        let mut last_recoverable: Option<SimError> = None;

        let (h_taken, attempt) = loop {
            h = h.min(opts.t_end - t);
            let outcome = integrator.step(model, t, &x, &dxdt, h);

            let failure = match outcome {
                Ok(attempt) => {
                    let stats = record.stats_mut();
                    stats.rhs_evals += attempt.rhs_evals;
                    stats.jacobian_evals += attempt.jacobian_evals;

                    match (attempt.error_norm, exponent) {
                        (Some(err), Some(exp)) if err > 1.0 => {
                            let factor = (0.9 * err.powf(exp)).clamp(0.2, 0.9);
                            tracing::debug!(t, dt = h, err, "step rejected by error test");
                            h *= factor;
                            None
                        }
                        _ => match model.check_state(t + h, &attempt.x) {
                            Ok(()) => break (h, attempt),
                            Err(e) if e.is_recoverable() => Some(e),
                            Err(e) => return Err(e),
                        },
                    }
                }
                Err(e) if e.is_recoverable() => Some(e),
                Err(e) => return Err(e),
            };

            if let Some(e) = failure {
                tracing::debug!(t, dt = h, error = %e, "step cut back");
                h *= opts.cutback_factor;
                last_recoverable = Some(e);
            }

            record.stats_mut().rejected_steps += 1;
            retries += 1;
            if h < opts.min_dt || retries > opts.max_retries {
                tracing::warn!(t, dt = h, retries, "step control gave up");
                return Err(last_recoverable.unwrap_or(SimError::StepSizeUnderflow { t, dt: h }));
            }
        };

        t += h_taken;
        if at_end(t) {
            t = opts.t_end;
        }
        let err = attempt.error_norm;
        record.push(t, attempt.x, attempt.dxdt);
        record.stats_mut().accepted_steps += 1;
        integrator.reset();

        h = match (err, exponent) {
            (Some(err), Some(exp)) => {
                let factor = if err > 0.0 {
                    (0.9 * err.powf(exp)).clamp(0.2, opts.grow_factor)
                } else {
                    opts.grow_factor
                };
                (h_taken * factor).clamp(opts.min_dt, opts.max_dt)
            }
            // Fixed-step methods recover from a cutback toward the nominal step
            _ => {
                let nominal = nominal_dt.unwrap_or(h_taken);
                (h_taken * opts.grow_factor).min(nominal)
            }
        };
    }

    tracing::info!(stats = ?record.stats(), "transient run finished");
    Ok(record)
}
