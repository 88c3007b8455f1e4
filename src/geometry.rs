//! Coordinate spaces and the image-to-display transform.
//!
//! Two spaces are involved while editing:
//! - **image space**: pixels of the original asset,
//! - **display space**: pixels of the scaled preview surface.
//!
//! The two are kept apart as distinct point types so a display coordinate can
//! never be fed into region math by accident.

use std::ops::Sub;

/// Default maximum width of the display surface.
pub const DEFAULT_MAX_DISPLAY_WIDTH: u32 = 560;
/// Default maximum height of the display surface.
pub const DEFAULT_MAX_DISPLAY_HEIGHT: u32 = 420;

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImagePoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl ImagePoint {
    /// Create a point in image space.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for ImagePoint {
    type Output = (f64, f64);

    fn sub(self, rhs: Self) -> (f64, f64) {
        (self.x - rhs.x, self.y - rhs.y)
    }
}

/// A point on the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayPoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl DisplayPoint {
    /// Create a point in display space.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Uniform scale between image space and display space.
///
/// Computed once per loaded image and never mutated, so coordinate math stays
/// stable for the whole lifetime of a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    image_width: u32,
    image_height: u32,
}

impl ViewTransform {
    /// Fit an image of `width x height` into `max_width x max_height`, never
    /// enlarging it.
    ///
    /// Zero-sized inputs are treated as a single pixel so the scale stays in
    /// `(0, 1]`; the editor rejects such images before getting here.
    #[must_use]
    pub fn fit(width: u32, height: u32, max_width: u32, max_height: u32) -> Self {
        let w = f64::from(width.max(1));
        let h = f64::from(height.max(1));
        let sx = f64::from(max_width.max(1)) / w;
        let sy = f64::from(max_height.max(1)) / h;
        let scale = sx.min(sy).min(1.0);
        Self {
            scale,
            image_width: width,
            image_height: height,
        }
    }

    /// The scale factor `s`, always in `(0, 1]`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Image dimensions this transform was computed for.
    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// Size of the display surface in whole pixels (at least 1x1).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_size(&self) -> (u32, u32) {
        let w = (f64::from(self.image_width) * self.scale).round().max(1.0);
        let h = (f64::from(self.image_height) * self.scale).round().max(1.0);
        (w as u32, h as u32)
    }

    /// Map an image point onto the display surface.
    #[must_use]
    pub fn to_display(&self, p: ImagePoint) -> DisplayPoint {
        DisplayPoint::new(p.x * self.scale, p.y * self.scale)
    }

    /// Map a display point back into image space.
    #[must_use]
    pub fn to_image(&self, p: DisplayPoint) -> ImagePoint {
        ImagePoint::new(p.x / self.scale, p.y / self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_never_enlarges() {
        let t = ViewTransform::fit(100, 80, 560, 420);
        assert!((t.scale() - 1.0).abs() < f64::EPSILON);
        assert_eq!(t.display_size(), (100, 80));
    }

    #[test]
    fn fit_uses_tighter_axis() {
        let t = ViewTransform::fit(1120, 420, 560, 420);
        assert!((t.scale() - 0.5).abs() < 1e-12);
        assert_eq!(t.display_size(), (560, 210));

        let t = ViewTransform::fit(800, 600, 560, 420);
        assert!((t.scale() - 0.7).abs() < 1e-12);
        assert_eq!(t.display_size(), (560, 420));
    }

    #[test]
    fn scale_stays_positive_for_huge_images() {
        let t = ViewTransform::fit(100_000, 100_000, 560, 420);
        assert!(t.scale() > 0.0 && t.scale() <= 1.0);
        assert_eq!(t.display_size().1, 420);
    }

    #[test]
    fn round_trip_recovers_image_point() {
        let t = ViewTransform::fit(4000, 3000, 560, 420);
        for &(x, y) in &[(0.0, 0.0), (123.5, 77.25), (3999.0, 2999.0), (2000.0, 1.0)] {
            let p = ImagePoint::new(x, y);
            let back = t.to_image(t.to_display(p));
            assert!((back.x - p.x).abs() < 1e-9, "x {x} -> {}", back.x);
            assert!((back.y - p.y).abs() < 1e-9, "y {y} -> {}", back.y);
        }
    }

    #[test]
    fn image_point_difference() {
        let d = ImagePoint::new(10.0, 4.0) - ImagePoint::new(3.0, 6.0);
        assert_eq!(d, (7.0, -2.0));
    }
}
