//! NRTL activity coefficients for a binary mixture.

use crate::error::{ThermoError, ThermoResult};

/// Temperature-dependent NRTL interaction parameter
/// `tau(T) = a + b/T + c*ln(T) + d*T`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TauCorrelation {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl TauCorrelation {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Build from a `[a, b, c, d]` slice; shorter slices are zero-padded.
    pub fn from_slice(coeffs: &[f64]) -> ThermoResult<Self> {
        if coeffs.len() > 4 {
            return Err(ThermoError::InvalidArg {
                what: "tau correlation takes at most four coefficients",
            });
        }
        let mut c = [0.0; 4];
        c[..coeffs.len()].copy_from_slice(coeffs);
        Ok(Self::new(c[0], c[1], c[2], c[3]))
    }

    pub fn coefficients(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    #[inline]
    pub fn value(&self, t_k: f64) -> f64 {
        self.a + self.b / t_k + self.c * t_k.ln() + self.d * t_k
    }
}

/// Binary NRTL model. Component 1 is the light component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nrtl {
    pub tau12: TauCorrelation,
    pub tau21: TauCorrelation,
    /// Non-randomness parameter
    pub alpha: f64,
}

impl Default for Nrtl {
    fn default() -> Self {
        Self::ideal()
    }
}

impl Nrtl {
    pub const DEFAULT_ALPHA: f64 = 0.3;

    pub fn new(tau12: TauCorrelation, tau21: TauCorrelation, alpha: f64) -> ThermoResult<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ThermoError::InvalidArg {
                what: "NRTL non-randomness must be positive",
            });
        }
        let all = tau12.coefficients().into_iter().chain(tau21.coefficients());
        if !all.into_iter().all(f64::is_finite) {
            return Err(ThermoError::InvalidArg {
                what: "NRTL interaction coefficients must be finite",
            });
        }
        Ok(Self {
            tau12,
            tau21,
            alpha,
        })
    }

    /// All interaction parameters zero: both activity coefficients are one.
    pub fn ideal() -> Self {
        Self {
            tau12: TauCorrelation::default(),
            tau21: TauCorrelation::default(),
            alpha: Self::DEFAULT_ALPHA,
        }
    }

    /// `ln(gamma_1)` for light-component mole fraction `x1`.
    fn ln_gamma(x1: f64, tau12: f64, tau21: f64, alpha: f64) -> f64 {
        let x2 = 1.0 - x1;
        let g12 = (-alpha * tau12).exp();
        let g21 = (-alpha * tau21).exp();
        let a = g21 / (x1 + x2 * g21);
        let b = x2 + x1 * g12;
        x2 * x2 * (tau21 * a * a + tau12 * g12 / (b * b))
    }

    /// Activity coefficients `(gamma_1, gamma_2)` at `x1` and `t_k`.
    pub fn gammas(&self, x1: f64, t_k: f64) -> (f64, f64) {
        let t12 = self.tau12.value(t_k);
        let t21 = self.tau21.value(t_k);
        let gamma1 = Self::ln_gamma(x1, t12, t21, self.alpha).exp();
        // Component 2 sees the mirrored mixture
        let gamma2 = Self::ln_gamma(1.0 - x1, t21, t12, self.alpha).exp();
        (gamma1, gamma2)
    }
}
