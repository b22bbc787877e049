use crate::{DcError, DcResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Error weight for a component with magnitude `scale`.
    #[inline]
    pub fn weight(&self, scale: Real) -> Real {
        self.abs + self.rel * scale.abs()
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> DcResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DcError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> DcResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(DcError::OutOfRange {
            what,
            value: v,
            min: 0.0,
            max: Real::INFINITY,
        })
    }
}

/// Finite and inside the closed interval `[min, max]`.
pub fn ensure_in_range(v: Real, min: Real, max: Real, what: &'static str) -> DcResult<Real> {
    let v = ensure_finite(v, what)?;
    if v < min || v > max {
        return Err(DcError::OutOfRange {
            what,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

/// `max(base, 0)^exponent`; never produces NaN for a negative base.
#[inline]
pub fn clamped_pow(base: Real, exponent: Real) -> Real {
    base.max(0.0).powf(exponent)
}
