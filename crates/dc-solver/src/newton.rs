//! Newton solver with box constraints.

use crate::error::SolverError;
use nalgebra::{DMatrix, DVector};

/// Newton solver configuration.
#[derive(Clone, Debug)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm
    pub rel_tol: f64,
    /// Lower bound applied to every unknown
    pub lower_bound: f64,
    /// Upper bound applied to every unknown
    pub upper_bound: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-10,
            rel_tol: 1e-12,
            lower_bound: f64::NEG_INFINITY,
            upper_bound: f64::INFINITY,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

impl NewtonConfig {
    /// Config for unknowns that are mole fractions.
    pub fn unit_interval() -> Self {
        Self {
            lower_bound: 0.0,
            upper_bound: 1.0,
            ..Self::default()
        }
    }

    fn feasible(&self, x: &DVector<f64>) -> bool {
        x.iter()
            .all(|&v| v.is_finite() && v >= self.lower_bound && v <= self.upper_bound)
    }
}

/// Newton iteration result.
#[derive(Clone, Debug)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Newton solver with backtracking line search.
///
/// Trial points outside `[lower_bound, upper_bound]` are rejected by the line
/// search the same way as trial points that do not reduce the residual norm.
pub fn newton_solve<F, J, E>(
    x0: DVector<f64>,
    mut residual_fn: F,
    mut jacobian_fn: J,
    config: &NewtonConfig,
) -> Result<NewtonResult, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
    J: FnMut(&DVector<f64>, &DVector<f64>) -> Result<DMatrix<f64>, E>,
    E: From<SolverError>,
{
    if !config.feasible(&x0) {
        return Err(SolverError::ProblemSetup {
            what: "initial guess violates bounds".to_string(),
        }
        .into());
    }

    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.norm();
    let r0_norm = r_norm;

    for iter in 0..config.max_iterations {
        if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
            tracing::debug!(iterations = iter, residual = r_norm, "newton converged");
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = jacobian_fn(&x, &r)?;

        // Solve J * dx = -r
        let dx = jac.lu().solve(&(-&r)).ok_or_else(|| SolverError::Numeric {
            what: format!("singular Jacobian at iteration {iter}"),
        })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            if config.feasible(&x_new) {
                let r_new = residual_fn(&x_new)?;
                let r_new_norm = r_new.norm();
                if r_new_norm < r_norm {
                    accepted = Some((x_new, r_new, r_new_norm));
                    break;
                }
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            return Err(SolverError::ConvergenceFailed {
                what: format!("line search stagnated at iteration {iter}"),
                iterations: iter,
                last_x: x.norm(),
                residual: r_norm,
            }
            .into());
        };

        tracing::trace!(iteration = iter, alpha, residual = r_new_norm, "newton step");
        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
        });
    }

    Err(SolverError::ConvergenceFailed {
        what: format!("maximum iterations {} reached", config.max_iterations),
        iterations: config.max_iterations,
        last_x: x.norm(),
        residual: r_norm,
    }
    .into())
}
