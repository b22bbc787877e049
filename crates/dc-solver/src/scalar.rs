//! Scalar root finding: Newton first, bracketing bisection as fallback.

use crate::error::{SolverError, SolverResult};

/// Root-finding configuration for a single unknown.
#[derive(Clone, Debug)]
pub struct ScalarConfig {
    /// Newton iteration limit before falling back to bisection
    pub max_iterations: usize,
    /// Relative step tolerance
    pub x_tol: f64,
    /// Absolute residual tolerance
    pub f_tol: f64,
    /// Relative step for the central-difference derivative
    pub derivative_step: f64,
    /// Smallest admissible value of the unknown (exclusive)
    pub min_x: f64,
    /// Initial bracket for the bisection fallback
    pub bracket: (f64, f64),
    /// Bracket growth factor per expansion
    pub expand_factor: f64,
    /// Maximum bracket expansions
    pub max_expansions: usize,
    /// Bisection iteration limit
    pub max_bisections: usize,
}

impl Default for ScalarConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            x_tol: 1e-12,
            f_tol: 1e-12,
            derivative_step: 1e-6,
            min_x: 0.0,
            bracket: (1.0, 10.0),
            expand_factor: 1.5,
            max_expansions: 30,
            max_bisections: 200,
        }
    }
}

/// Which algorithm produced the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootMethod {
    Newton,
    Bisection,
}

/// A converged scalar root.
#[derive(Clone, Copy, Debug)]
pub struct ScalarRoot {
    pub x: f64,
    pub residual: f64,
    pub iterations: usize,
    pub method: RootMethod,
}

enum NewtonOutcome {
    Converged(ScalarRoot),
    Failed { x: f64, residual: f64, iterations: usize },
}

/// Find `x` with `f(x) = 0`, starting Newton's method at `x0`.
///
/// If Newton stalls, leaves the admissible region or hits the iteration
/// limit, the root is bracketed (expanding `config.bracket`) and bisected.
/// Errors returned by `f` are propagated unchanged.
pub fn find_root<F>(mut f: F, x0: f64, config: &ScalarConfig) -> SolverResult<ScalarRoot>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    match newton(&mut f, x0, config)? {
        NewtonOutcome::Converged(root) => Ok(root),
        NewtonOutcome::Failed {
            x,
            residual,
            iterations,
        } => {
            tracing::warn!(
                x0,
                last_x = x,
                residual,
                iterations,
                "newton did not converge, falling back to bisection"
            );
            bisect(&mut f, config, x, residual, iterations)
        }
    }
}

fn newton<F>(f: &mut F, x0: f64, config: &ScalarConfig) -> SolverResult<NewtonOutcome>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let mut x = x0;
    let mut fx = f(x)?;

    for iter in 0..config.max_iterations {
        if !fx.is_finite() {
            return Ok(NewtonOutcome::Failed {
                x,
                residual: fx,
                iterations: iter,
            });
        }
        if fx.abs() <= config.f_tol {
            return Ok(NewtonOutcome::Converged(ScalarRoot {
                x,
                residual: fx,
                iterations: iter,
                method: RootMethod::Newton,
            }));
        }

        let h = config.derivative_step * x.abs().max(1.0);
        let dfdx = (f(x + h)? - f(x - h)?) / (2.0 * h);
        if !dfdx.is_finite() || dfdx == 0.0 {
            return Ok(NewtonOutcome::Failed {
                x,
                residual: fx,
                iterations: iter,
            });
        }

        // Halve the step until the iterate stays admissible
        let mut step = -fx / dfdx;
        let mut x_new = x + step;
        let mut halvings = 0;
        while !(x_new.is_finite() && x_new > config.min_x) {
            if halvings >= 60 {
                return Ok(NewtonOutcome::Failed {
                    x,
                    residual: fx,
                    iterations: iter,
                });
            }
            step *= 0.5;
            x_new = x + step;
            halvings += 1;
        }

        x = x_new;
        fx = f(x)?;

        if step.abs() <= config.x_tol * x.abs().max(1.0) {
            // Stalled: only a root if the residual agrees
            if fx.is_finite() && fx.abs() <= config.f_tol {
                return Ok(NewtonOutcome::Converged(ScalarRoot {
                    x,
                    residual: fx,
                    iterations: iter + 1,
                    method: RootMethod::Newton,
                }));
            }
            return Ok(NewtonOutcome::Failed {
                x,
                residual: fx,
                iterations: iter + 1,
            });
        }
    }

    Ok(NewtonOutcome::Failed {
        x,
        residual: fx,
        iterations: config.max_iterations,
    })
}

fn bisect<F>(
    f: &mut F,
    config: &ScalarConfig,
    last_x: f64,
    last_residual: f64,
    newton_iterations: usize,
) -> SolverResult<ScalarRoot>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let (mut lo, mut hi) = config.bracket;
    if !(lo < hi) || lo <= config.min_x {
        return Err(SolverError::ProblemSetup {
            what: format!("invalid bracket [{lo}, {hi}]"),
        });
    }

    let mut f_lo = f(lo)?;
    let mut f_hi = f(hi)?;
    let mut expansions = 0;
    while !(f_lo.is_finite() && f_hi.is_finite() && f_lo * f_hi <= 0.0) {
        if expansions >= config.max_expansions {
            return Err(SolverError::ConvergenceFailed {
                what: format!("no sign change in bracket [{lo}, {hi}]"),
                iterations: newton_iterations,
                last_x,
                residual: last_residual,
            });
        }
        lo = (lo / config.expand_factor).max(config.min_x + f64::EPSILON * lo.abs().max(1.0));
        hi *= config.expand_factor;
        f_lo = f(lo)?;
        f_hi = f(hi)?;
        expansions += 1;
    }

    for iter in 0..config.max_bisections {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid)?;
        let width = hi - lo;
        if f_mid.abs() <= config.f_tol || width <= config.x_tol * mid.abs().max(1.0) {
            return Ok(ScalarRoot {
                x: mid,
                residual: f_mid,
                iterations: newton_iterations + iter + 1,
                method: RootMethod::Bisection,
            });
        }
        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = 0.5 * (lo + hi);
    Err(SolverError::ConvergenceFailed {
        what: "bisection iteration limit reached".to_string(),
        iterations: newton_iterations + config.max_bisections,
        last_x: mid,
        residual: f(mid)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newton_finds_sqrt_two() {
        let root = find_root(|x| Ok(x * x - 2.0), 1.0, &ScalarConfig::default()).unwrap();
        assert_eq!(root.method, RootMethod::Newton);
        assert!((root.x - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn positivity_is_respected() {
        // Newton from 10 on ln(x) - 0 would overshoot below zero without halving
        let config = ScalarConfig {
            min_x: 0.0,
            ..ScalarConfig::default()
        };
        let root = find_root(|x: f64| Ok(x.ln()), 10.0, &config).unwrap();
        assert!((root.x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn falls_back_to_bisection() {
        // Flat derivative at the start point defeats Newton
        let config = ScalarConfig {
            bracket: (0.5, 4.0),
            ..ScalarConfig::default()
        };
        let f = |x: f64| Ok(if x < 1.0 { -1.0 } else { x - 2.0 });
        let root = find_root(f, 0.0, &config).unwrap();
        assert_eq!(root.method, RootMethod::Bisection);
        assert!((root.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn reports_failure_without_sign_change() {
        let config = ScalarConfig {
            bracket: (1.0, 2.0),
            max_expansions: 3,
            ..ScalarConfig::default()
        };
        let err = find_root(|x| Ok(x * x + 1.0), 1.0, &config).unwrap_err();
        assert!(matches!(err, SolverError::ConvergenceFailed { .. }));
    }
}
