//! Finite difference Jacobian computation.

use nalgebra::{DMatrix, DVector};

/// Perturbation size for column `j`, scaled with the magnitude of `x[j]`.
#[inline]
fn perturbation(xj: f64, epsilon: f64) -> f64 {
    epsilon * xj.abs().max(1.0)
}

/// Compute Jacobian using forward finite differences.
///
/// `f_x` is the already-evaluated `f(x)`; passing it in saves one evaluation
/// for callers (the integrators) that have it at hand.
pub fn finite_difference_jacobian<F, E>(
    x: &DVector<f64>,
    f_x: &DVector<f64>,
    mut f: F,
    epsilon: f64,
) -> Result<DMatrix<f64>, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
{
    let n = x.len();
    let mut jac = DMatrix::zeros(f_x.len(), n);
    let mut x_perturbed = x.clone();

    for j in 0..n {
        let dx = perturbation(x[j], epsilon);
        x_perturbed[j] = x[j] + dx;
        let f_perturbed = f(&x_perturbed)?;
        x_perturbed[j] = x[j];

        jac.set_column(j, &((f_perturbed - f_x) / dx));
    }

    Ok(jac)
}

/// Compute Jacobian using central finite differences (more accurate but 2x cost).
pub fn central_difference_jacobian<F, E>(
    x: &DVector<f64>,
    mut f: F,
    epsilon: f64,
) -> Result<DMatrix<f64>, E>
where
    F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
{
    let n = x.len();
    let mut jac: Option<DMatrix<f64>> = None;
    let mut x_shift = x.clone();

    for j in 0..n {
        let dx = perturbation(x[j], epsilon);

        x_shift[j] = x[j] + dx;
        let f_plus = f(&x_shift)?;
        x_shift[j] = x[j] - dx;
        let f_minus = f(&x_shift)?;
        x_shift[j] = x[j];

        let jac = jac.get_or_insert_with(|| DMatrix::zeros(f_plus.len(), n));
        jac.set_column(j, &((f_plus - f_minus) / (2.0 * dx)));
    }

    Ok(jac.unwrap_or_else(|| DMatrix::zeros(0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SolverResult;

    #[test]
    fn jacobian_linear() {
        // f(x) = 2*x, J = 2
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(x * 2.0) };

        let x = DVector::from_element(1, 3.0);
        let fx = f(&x).unwrap();
        let jac = finite_difference_jacobian(&x, &fx, f, 1e-7).unwrap();

        assert!((jac[(0, 0)] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn jacobian_coupled_central() {
        // f = (x0*x1, x0 + x1^2) at (2, 3): J = [[3, 2], [1, 6]]
        let f = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[1], x[0] + x[1] * x[1]]))
        };

        let x = DVector::from_vec(vec![2.0, 3.0]);
        let jac = central_difference_jacobian(&x, f, 1e-6).unwrap();

        assert!((jac[(0, 0)] - 3.0).abs() < 1e-6);
        assert!((jac[(0, 1)] - 2.0).abs() < 1e-6);
        assert!((jac[(1, 0)] - 1.0).abs() < 1e-6);
        assert!((jac[(1, 1)] - 6.0).abs() < 1e-6);
    }

    #[test]
    fn jacobian_propagates_errors() {
        let f = |_: &DVector<f64>| -> Result<DVector<f64>, &'static str> { Err("boom") };
        let x = DVector::from_element(2, 1.0);
        let fx = DVector::from_element(2, 0.0);
        assert_eq!(finite_difference_jacobian(&x, &fx, f, 1e-7), Err("boom"));
    }
}
