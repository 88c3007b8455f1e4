//! The selected rectangle and its invariants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest width/height a region may shrink to, in image pixels.
pub const MIN_SIZE: u32 = 20;

/// Default region size placed on a freshly loaded image.
const DEFAULT_SIZE: (u32, u32) = (100, 30);
/// Distance of the default region's top-left corner from the right/bottom edges.
const DEFAULT_INSET: (u32, u32) = (120, 40);

/// Rectangle in image pixel space.
///
/// Every region handed out by this crate satisfies, for the image it belongs to:
/// `x + w <= width`, `y + h <= height`, `w >= min(MIN_SIZE, width)` and
/// `h >= min(MIN_SIZE, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// Minimum extent along an axis of length `dim`.
///
/// Images narrower than [`MIN_SIZE`] get a region spanning the full axis.
#[must_use]
pub fn min_extent(dim: u32) -> u32 {
    MIN_SIZE.min(dim)
}

impl Region {
    /// Create a region without validating it. Use [`Region::clamp_to`] to bring
    /// it inside an image.
    #[must_use]
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Initial guess for a freshly loaded image: anchored near the bottom-right
    /// corner, where watermarks usually sit.
    #[must_use]
    pub fn default_for(width: u32, height: u32) -> Self {
        Self {
            x: width.saturating_sub(DEFAULT_INSET.0),
            y: height.saturating_sub(DEFAULT_INSET.1),
            w: DEFAULT_SIZE.0,
            h: DEFAULT_SIZE.1,
        }
        .clamp_to(width, height)
    }

    /// Right edge (`x + w`).
    #[must_use]
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (`y + h`).
    #[must_use]
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Enforce the region invariants for an image of `width x height`.
    ///
    /// Sizes below the minimum grow right/down; sizes larger than the image
    /// shrink to it; the origin then slides back inside. Applying this to an
    /// already valid region returns it unchanged.
    #[must_use]
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let (x, w) = clamp_axis(self.x, self.w, width);
        let (y, h) = clamp_axis(self.y, self.h, height);
        Self { x, y, w, h }
    }

    /// Whether the region satisfies every invariant for the given image.
    #[must_use]
    pub fn is_valid_for(&self, width: u32, height: u32) -> bool {
        self.w >= min_extent(width)
            && self.h >= min_extent(height)
            && self.right() <= width
            && self.bottom() <= height
    }

    /// Build a region from fractional edges, rounding each edge to the nearest
    /// pixel and clamping the result into the image.
    ///
    /// Edges are rounded independently so an integer edge that did not move
    /// during a drag stays exactly where it was.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64, width: u32, height: u32) -> Self {
        let fw = f64::from(width);
        let fh = f64::from(height);
        let l = left.round().clamp(0.0, fw);
        let t = top.round().clamp(0.0, fh);
        let r = right.round().clamp(l, fw);
        let b = bottom.round().clamp(t, fh);
        Self {
            x: l as u32,
            y: t as u32,
            w: (r - l) as u32,
            h: (b - t) as u32,
        }
        .clamp_to(width, height)
    }

    /// Edges as floating point `(left, top, right, bottom)` for drag math.
    #[must_use]
    pub fn edges(&self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// Short `w × h` label shown next to the editing surface.
    #[must_use]
    pub fn size_label(&self) -> String {
        format!("{} × {}", self.w, self.h)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

fn clamp_axis(pos: u32, len: u32, dim: u32) -> (u32, u32) {
    let len = len.max(min_extent(dim)).min(dim);
    let pos = pos.min(dim - len);
    (pos, len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_for_800x600() {
        let r = Region::default_for(800, 600);
        assert_eq!(r, Region::new(680, 560, 100, 30));
        assert!(r.right() <= 800);
        assert!(r.bottom() <= 600);
        assert!(r.is_valid_for(800, 600));
    }

    #[test]
    fn default_region_fits_small_images() {
        let r = Region::default_for(90, 35);
        assert_eq!(r, Region::new(0, 0, 90, 30));
        assert!(r.is_valid_for(90, 35));

        let r = Region::default_for(10, 8);
        assert_eq!(r, Region::new(0, 0, 10, 8));
        assert!(r.is_valid_for(10, 8));
    }

    #[test]
    fn clamp_floors_size_and_slides_origin() {
        let r = Region::new(790, 595, 5, 5).clamp_to(800, 600);
        assert_eq!(r, Region::new(780, 580, 20, 20));
    }

    #[test]
    fn clamp_is_idempotent() {
        let samples = [
            Region::new(0, 0, 0, 0),
            Region::new(1000, 1000, 10, 10),
            Region::new(5, 5, 2000, 30),
            Region::new(680, 560, 100, 30),
            Region::new(u32::MAX, 3, 7, u32::MAX),
        ];
        for r in samples {
            let once = r.clamp_to(800, 600);
            assert!(once.is_valid_for(800, 600), "{once:?}");
            assert_eq!(once.clamp_to(800, 600), once);
        }
    }

    #[test]
    fn from_edges_rounds_each_edge() {
        let r = Region::from_edges(10.4, 20.6, 50.5, 60.2, 800, 600);
        assert_eq!(r, Region::new(10, 21, 41, 39));
    }

    #[test]
    fn from_edges_clips_to_image() {
        let r = Region::from_edges(-30.0, -10.0, 900.0, 700.0, 800, 600);
        assert_eq!(r, Region::new(0, 0, 800, 600));
    }

    #[test]
    fn size_label_and_display() {
        let r = Region::new(1, 2, 100, 30);
        assert_eq!(r.size_label(), "100 × 30");
        assert_eq!(r.to_string(), "100x30+1+2");
    }
}
