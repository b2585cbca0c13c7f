//! Pixel ↔ complex-plane mapping with zoom and pan.
//!
//! Pure functions, no shared state. Every viewport interaction (click,
//! drag, wheel) goes through here; grid generation does not — it derives
//! its own linear per-pixel step for speed.
//!
//! Zoom narrows the effective region around the ORIGINAL region's center,
//! not around the queried point. To zoom around an arbitrary point,
//! combine `zoom_factor` with [`calculate_zoom_region`].

use crate::complex::Complex;
use crate::error::CoreError;
use crate::region::ComplexRegion;

/// Saturation bounds for [`clamp_zoom`].
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 100.0;

/// Zoom/pan state owned by the presentation layer.
///
/// The core only ever reads this; it is replaced wholesale on each
/// viewport change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub region: ComplexRegion,
    pub zoom_factor: f64,
    pub pan_offset: (i32, i32),
}

impl ViewportState {
    pub fn new(region: ComplexRegion) -> Self {
        Self {
            region,
            zoom_factor: 1.0,
            pan_offset: (0, 0),
        }
    }

    /// [`pixel_to_complex`] with this state's region, zoom, and pan.
    pub fn pixel_to_complex(
        &self,
        px: i32,
        py: i32,
        viewport_w: u32,
        viewport_h: u32,
    ) -> crate::Result<Complex> {
        pixel_to_complex(
            px,
            py,
            viewport_w,
            viewport_h,
            &self.region,
            self.zoom_factor,
            self.pan_offset,
        )
    }

    /// [`complex_to_pixel`] with this state's region, zoom, and pan.
    pub fn complex_to_pixel(
        &self,
        point: Complex,
        viewport_w: u32,
        viewport_h: u32,
    ) -> crate::Result<(i32, i32)> {
        complex_to_pixel(
            point,
            viewport_w,
            viewport_h,
            &self.region,
            self.zoom_factor,
            self.pan_offset,
        )
    }
}

fn check_view_params(viewport_w: u32, viewport_h: u32, zoom: f64) -> crate::Result<()> {
    if viewport_w == 0 || viewport_h == 0 {
        return Err(CoreError::invalid_parameter(format!(
            "viewport size must be positive, got {viewport_w}×{viewport_h}"
        )));
    }
    if zoom <= 0.0 || !zoom.is_finite() {
        return Err(CoreError::invalid_parameter(format!(
            "zoom factor must be positive and finite, got {zoom}"
        )));
    }
    Ok(())
}

/// The sub-region actually visible at `zoom`: `extent/zoom`, centered on
/// the region's own midpoint. Returns `(start_re, start_im, width, height)`.
#[inline]
fn zoomed_window(region: &ComplexRegion, zoom: f64) -> (f64, f64, f64, f64) {
    let width = region.width() / zoom;
    let height = region.height() / zoom;
    let center = region.center();
    (center.re - width / 2.0, center.im - height / 2.0, width, height)
}

/// Map a pixel coordinate to a point on the complex plane.
///
/// The pan offset is subtracted from the pixel first, then the pixel is
/// normalized to `[0,1]²` and mapped linearly into the zoomed sub-region.
/// Pixel `(0,0)` at `zoom = 1`, no pan, is exactly
/// `(real_start, imag_start)`.
pub fn pixel_to_complex(
    px: i32,
    py: i32,
    viewport_w: u32,
    viewport_h: u32,
    region: &ComplexRegion,
    zoom: f64,
    pan: (i32, i32),
) -> crate::Result<Complex> {
    check_view_params(viewport_w, viewport_h, zoom)?;

    let norm_x = f64::from(px - pan.0) / f64::from(viewport_w);
    let norm_y = f64::from(py - pan.1) / f64::from(viewport_h);

    let (start_re, start_im, width, height) = zoomed_window(region, zoom);
    Ok(Complex::new(
        start_re + norm_x * width,
        start_im + norm_y * height,
    ))
}

/// Map a complex-plane point back to a pixel coordinate.
///
/// Exact algebraic inverse of [`pixel_to_complex`] (same zoomed
/// sub-region, same pan convention), truncating to integer pixels.
/// Round-tripping a pixel through both reproduces it within ±1.
pub fn complex_to_pixel(
    point: Complex,
    viewport_w: u32,
    viewport_h: u32,
    region: &ComplexRegion,
    zoom: f64,
    pan: (i32, i32),
) -> crate::Result<(i32, i32)> {
    check_view_params(viewport_w, viewport_h, zoom)?;

    let (start_re, start_im, width, height) = zoomed_window(region, zoom);
    let norm_x = (point.re - start_re) / width;
    let norm_y = (point.im - start_im) / height;

    let px = (norm_x * f64::from(viewport_w)) as i32 + pan.0;
    let py = (norm_y * f64::from(viewport_h)) as i32 + pan.1;
    Ok((px, py))
}

/// Compute the region visible after zooming by `factor` around `center`.
///
/// Unlike the `zoom` argument of the mapping functions, this re-centers:
/// the new region has extent `old/factor` centered on `center`.
pub fn calculate_zoom_region(
    region: &ComplexRegion,
    center: Complex,
    factor: f64,
) -> crate::Result<ComplexRegion> {
    if factor <= 0.0 || !factor.is_finite() {
        return Err(CoreError::invalid_parameter(format!(
            "zoom factor must be positive and finite, got {factor}"
        )));
    }

    let half_w = region.width() / factor / 2.0;
    let half_h = region.height() / factor / 2.0;
    ComplexRegion::new(
        center.re - half_w,
        center.re + half_w,
        center.im - half_h,
        center.im + half_h,
    )
}

/// Compute the region visible after panning by `pixel_delta`.
///
/// The pixel displacement is converted to a plane displacement at the
/// zoom-adjusted scale and SUBTRACTED from both bounds: dragging the
/// viewport right moves the visible region left. The end bounds are
/// reconstructed as `start + extent` so width and height are preserved
/// bit-exactly.
pub fn calculate_pan_region(
    region: &ComplexRegion,
    pixel_delta: (i32, i32),
    viewport_size: (u32, u32),
    zoom: f64,
) -> crate::Result<ComplexRegion> {
    check_view_params(viewport_size.0, viewport_size.1, zoom)?;

    let width = region.width();
    let height = region.height();
    let re_delta = f64::from(pixel_delta.0) / f64::from(viewport_size.0) * (width / zoom);
    let im_delta = f64::from(pixel_delta.1) / f64::from(viewport_size.1) * (height / zoom);

    let real_start = region.real_start - re_delta;
    let imag_start = region.imag_start - im_delta;
    ComplexRegion::new(
        real_start,
        real_start + width,
        imag_start,
        imag_start + height,
    )
}

/// Saturating clamp of a zoom factor to `[MIN_ZOOM, MAX_ZOOM]`.
#[inline]
pub fn clamp_zoom(value: f64) -> f64 {
    value.clamp(MIN_ZOOM, MAX_ZOOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> ComplexRegion {
        ComplexRegion::new(-2.0, 1.0, -1.2, 1.2).unwrap()
    }

    #[test]
    fn origin_pixel_maps_to_region_corner() {
        let c = pixel_to_complex(0, 0, 400, 400, &region(), 1.0, (0, 0)).unwrap();
        assert!((c.re - (-2.0)).abs() < 1e-12);
        assert!((c.im - (-1.2)).abs() < 1e-12);
    }

    #[test]
    fn center_pixel_maps_to_region_center() {
        let c = pixel_to_complex(200, 200, 400, 400, &region(), 1.0, (0, 0)).unwrap();
        assert!((c.re - (-0.5)).abs() < 1e-12);
        assert!(c.im.abs() < 1e-12);
    }

    #[test]
    fn zoom_narrows_around_region_center() {
        // At zoom 2 the visible window is half as wide, still centered on
        // the region's own midpoint, so pixel (0,0) lands a quarter of the
        // original width in from each corner.
        let c = pixel_to_complex(0, 0, 400, 400, &region(), 2.0, (0, 0)).unwrap();
        assert!((c.re - (-1.25)).abs() < 1e-12);
        assert!((c.im - (-0.6)).abs() < 1e-12);
    }

    #[test]
    fn pan_offset_is_subtracted() {
        let base = pixel_to_complex(50, 70, 400, 400, &region(), 1.0, (0, 0)).unwrap();
        let panned = pixel_to_complex(60, 90, 400, 400, &region(), 1.0, (10, 20)).unwrap();
        assert!((base.re - panned.re).abs() < 1e-12);
        assert!((base.im - panned.im).abs() < 1e-12);
    }

    #[test]
    fn invalid_view_params_rejected() {
        let r = region();
        assert!(pixel_to_complex(0, 0, 0, 400, &r, 1.0, (0, 0)).is_err());
        assert!(pixel_to_complex(0, 0, 400, 0, &r, 1.0, (0, 0)).is_err());
        assert!(pixel_to_complex(0, 0, 400, 400, &r, 0.0, (0, 0)).is_err());
        assert!(pixel_to_complex(0, 0, 400, 400, &r, -2.0, (0, 0)).is_err());
        assert!(complex_to_pixel(Complex::ZERO, 0, 400, &r, 1.0, (0, 0)).is_err());
    }

    #[test]
    fn round_trip_within_one_pixel() {
        let r = region();
        let zooms = [0.5, 1.0, 2.0, 7.3, 64.0];
        let pans = [(0, 0), (13, -40), (-200, 95)];
        for &zoom in &zooms {
            for &pan in &pans {
                for &(px, py) in &[(0, 0), (1, 1), (399, 399), (200, 137), (17, 350)] {
                    let c = pixel_to_complex(px, py, 400, 400, &r, zoom, pan).unwrap();
                    let (bx, by) = complex_to_pixel(c, 400, 400, &r, zoom, pan).unwrap();
                    assert!(
                        (bx - px).abs() <= 1 && (by - py).abs() <= 1,
                        "round trip drifted: ({px},{py}) -> ({bx},{by}) at zoom {zoom}, pan {pan:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn round_trip_tiny_viewport() {
        let r = region();
        let c = pixel_to_complex(0, 0, 1, 1, &r, 3.0, (0, 0)).unwrap();
        let (px, py) = complex_to_pixel(c, 1, 1, &r, 3.0, (0, 0)).unwrap();
        assert!(px.abs() <= 1 && py.abs() <= 1);
    }

    #[test]
    fn zoom_region_halves_extent() {
        let r = region();
        let center = Complex::new(0.5, 0.25);
        let zoomed = calculate_zoom_region(&r, center, 2.0).unwrap();
        assert_eq!(zoomed.width(), r.width() / 2.0);
        assert_eq!(zoomed.height(), r.height() / 2.0);
        let zc = zoomed.center();
        assert!((zc.re - center.re).abs() < 1e-12);
        assert!((zc.im - center.im).abs() < 1e-12);
    }

    #[test]
    fn zoom_region_rejects_non_positive_factor() {
        let r = region();
        assert!(calculate_zoom_region(&r, Complex::ZERO, 0.0).is_err());
        assert!(calculate_zoom_region(&r, Complex::ZERO, -1.5).is_err());
    }

    #[test]
    fn pan_preserves_extent_exactly() {
        let r = region();
        let panned = calculate_pan_region(&r, (37, -122), (400, 300), 2.7).unwrap();
        assert_eq!(panned.width(), r.width());
        assert_eq!(panned.height(), r.height());
    }

    #[test]
    fn pan_shifts_opposite_to_delta() {
        // Panning right (+x) by a quarter viewport at zoom 1 moves the
        // region left by a quarter of its width.
        let r = region();
        let panned = calculate_pan_region(&r, (100, 0), (400, 400), 1.0).unwrap();
        assert!((panned.real_start - (r.real_start - 0.75)).abs() < 1e-12);
        assert!((panned.real_end - (r.real_end - 0.75)).abs() < 1e-12);
        assert!((panned.imag_start - r.imag_start).abs() < 1e-12);
    }

    #[test]
    fn pan_scale_respects_zoom() {
        // At zoom 2 the same pixel delta covers half the plane distance.
        let r = region();
        let z1 = calculate_pan_region(&r, (100, 0), (400, 400), 1.0).unwrap();
        let z2 = calculate_pan_region(&r, (100, 0), (400, 400), 2.0).unwrap();
        let d1 = r.real_start - z1.real_start;
        let d2 = r.real_start - z2.real_start;
        assert!((d1 - 2.0 * d2).abs() < 1e-12);
    }

    #[test]
    fn clamp_zoom_saturates() {
        assert_eq!(clamp_zoom(0.05), 0.1);
        assert_eq!(clamp_zoom(150.0), 100.0);
        assert_eq!(clamp_zoom(5.0), 5.0);
    }

    #[test]
    fn viewport_state_delegates() {
        let state = ViewportState::new(region());
        let c = state.pixel_to_complex(0, 0, 400, 400).unwrap();
        assert!((c.re - (-2.0)).abs() < 1e-12);
        let (px, py) = state.complex_to_pixel(c, 400, 400).unwrap();
        assert!(px.abs() <= 1 && py.abs() <= 1);
    }
}
