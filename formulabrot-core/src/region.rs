use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// A rectangular region of the complex plane.
///
/// Invariant: `real_start < real_end` and `imag_start < imag_end`, all
/// finite. Regions are immutable values; zoom and pan produce replacements
/// rather than mutating in place.
///
/// The serialized form uses the long-hand `imaginary_*` keys so regions
/// round-trip against the documented configuration shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexRegion {
    pub real_start: f64,
    pub real_end: f64,
    #[serde(rename = "imaginary_start")]
    pub imag_start: f64,
    #[serde(rename = "imaginary_end")]
    pub imag_end: f64,
}

impl ComplexRegion {
    /// Create a region, enforcing the ordering and finiteness invariants.
    pub fn new(
        real_start: f64,
        real_end: f64,
        imag_start: f64,
        imag_end: f64,
    ) -> crate::Result<Self> {
        let region = Self {
            real_start,
            real_end,
            imag_start,
            imag_end,
        };
        if !region.validate() {
            return Err(CoreError::invalid_parameter(format!(
                "malformed region: re [{real_start}, {real_end}], im [{imag_start}, {imag_end}]"
            )));
        }
        Ok(region)
    }

    /// `true` iff all bounds are finite and strictly ordered.
    ///
    /// Structurally missing fields are rejected earlier, by deserialization.
    pub fn validate(&self) -> bool {
        let finite = self.real_start.is_finite()
            && self.real_end.is_finite()
            && self.imag_start.is_finite()
            && self.imag_end.is_finite();
        finite && self.real_start < self.real_end && self.imag_start < self.imag_end
    }

    /// Extent along the real axis.
    #[inline]
    pub fn width(&self) -> f64 {
        self.real_end - self.real_start
    }

    /// Extent along the imaginary axis.
    #[inline]
    pub fn height(&self) -> f64 {
        self.imag_end - self.imag_start
    }

    /// The midpoint of the region.
    #[inline]
    pub fn center(&self) -> Complex {
        Complex::new(
            (self.real_start + self.real_end) / 2.0,
            (self.imag_start + self.imag_end) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mandelbrot_region() -> ComplexRegion {
        ComplexRegion::new(-2.0, 1.0, -1.2, 1.2).unwrap()
    }

    #[test]
    fn derived_extents() {
        let r = mandelbrot_region();
        assert!((r.width() - 3.0).abs() < 1e-12);
        assert!((r.height() - 2.4).abs() < 1e-12);
        let c = r.center();
        assert!((c.re - (-0.5)).abs() < 1e-12);
        assert!(c.im.abs() < 1e-12);
    }

    #[test]
    fn valid_region_passes() {
        assert!(mandelbrot_region().validate());
    }

    #[test]
    fn reversed_bounds_rejected() {
        assert!(ComplexRegion::new(2.0, 1.0, -1.2, 1.2).is_err());
        assert!(ComplexRegion::new(-2.0, 1.0, 1.2, -1.2).is_err());
    }

    #[test]
    fn degenerate_region_rejected() {
        assert!(ComplexRegion::new(1.0, 1.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn non_finite_bounds_rejected() {
        assert!(ComplexRegion::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(ComplexRegion::new(-2.0, f64::INFINITY, -1.0, 1.0).is_err());
    }

    #[test]
    fn deserializes_from_long_hand_keys() {
        let r: ComplexRegion = serde_json::from_str(
            r#"{"real_start": -2.0, "real_end": 1.0,
                "imaginary_start": -1.2, "imaginary_end": 1.2}"#,
        )
        .unwrap();
        assert_eq!(r, mandelbrot_region());
    }

    #[test]
    fn missing_field_fails_deserialization() {
        let result: Result<ComplexRegion, _> = serde_json::from_str(
            r#"{"real_start": -2.0, "real_end": 1.0, "imaginary_start": -1.2}"#,
        );
        assert!(result.is_err(), "missing imaginary_end must be rejected");
    }
}
