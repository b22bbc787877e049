//! Five-parameter vapor-pressure correlation.
//!
//! `ln(p / Pa) = a + b/T + c*ln(T) + d*T^e` with `T` in kelvin.

use crate::error::{ThermoError, ThermoResult};
use dc_core::units::{Pressure, Temperature, pa, to_k};

/// Coefficients of the vapor-pressure correlation for one component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaporPressure {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

impl VaporPressure {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64) -> ThermoResult<Self> {
        if ![a, b, c, d, e].iter().all(|v| v.is_finite()) {
            return Err(ThermoError::InvalidArg {
                what: "vapor-pressure coefficients must be finite",
            });
        }
        Ok(Self { a, b, c, d, e })
    }

    /// Build from a `[a, b, c, d, e]` slice; shorter slices are zero-padded.
    pub fn from_slice(coeffs: &[f64]) -> ThermoResult<Self> {
        if coeffs.len() > 5 {
            return Err(ThermoError::InvalidArg {
                what: "vapor-pressure correlation takes at most five coefficients",
            });
        }
        let mut c = [0.0; 5];
        c[..coeffs.len()].copy_from_slice(coeffs);
        Self::new(c[0], c[1], c[2], c[3], c[4])
    }

    /// Coefficients as `[a, b, c, d, e]`.
    pub fn coefficients(&self) -> [f64; 5] {
        [self.a, self.b, self.c, self.d, self.e]
    }

    /// `ln(p / Pa)` at temperature `t_k` (kelvin).
    #[inline]
    pub fn ln_pressure_pa(&self, t_k: f64) -> f64 {
        self.a + self.b / t_k + self.c * t_k.ln() + self.d * t_k.powf(self.e)
    }

    /// Vapor pressure in pascal at `t_k`.
    #[inline]
    pub fn pressure_pa(&self, t_k: f64) -> f64 {
        self.ln_pressure_pa(t_k).exp()
    }

    /// Vapor pressure at `t`.
    pub fn pressure(&self, t: Temperature) -> ThermoResult<Pressure> {
        let t_k = to_k(t);
        if !(t_k.is_finite() && t_k > 0.0) {
            return Err(ThermoError::NonPhysical {
                what: "temperature",
                value: t_k,
            });
        }
        let p = self.pressure_pa(t_k);
        if !p.is_finite() {
            return Err(ThermoError::NonPhysical {
                what: "vapor pressure",
                value: p,
            });
        }
        Ok(pa(p))
    }

    /// Benzene (DIPPR 101 form).
    pub fn benzene() -> Self {
        Self {
            a: 83.107,
            b: -6486.2,
            c: -9.2194,
            d: 6.9844e-6,
            e: 2.0,
        }
    }

    /// Toluene (DIPPR 101 form).
    pub fn toluene() -> Self {
        Self {
            a: 76.945,
            b: -6729.8,
            c: -8.179,
            d: 5.3017e-6,
            e: 2.0,
        }
    }
}
