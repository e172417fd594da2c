use crate::{CoreError, CoreResult};

/// Floating point type used for levels, flows and times.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Midpoint of `[lo, hi]`, written to avoid overflow for large magnitudes.
#[inline]
pub fn midpoint(lo: Real, hi: Real) -> Real {
    lo + (hi - lo) / 2.0
}
