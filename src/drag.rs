//! Pointer drag sessions that reshape the region.
//!
//! A [`DragSession`] lives from pointer-down to pointer-up. It remembers where
//! the pointer went down and what the region looked like at that moment, and
//! every pointer-move recomputes the region from that snapshot. Nothing is
//! accumulated between moves, so a drag that returns to its starting point
//! restores the starting region exactly.

use crate::geometry::{DisplayPoint, ViewTransform};
use crate::hit::{hit_test, DragMode};
use crate::region::{min_extent, Region};

/// An in-progress pointer drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    mode: DragMode,
    anchor_pointer: DisplayPoint,
    anchor_region: Region,
}

impl DragSession {
    /// Start a session with an explicit mode.
    #[must_use]
    pub fn new(mode: DragMode, anchor_pointer: DisplayPoint, anchor_region: Region) -> Self {
        Self {
            mode,
            anchor_pointer,
            anchor_region,
        }
    }

    /// Start a session whose mode is chosen by hit-testing the pointer.
    #[must_use]
    pub fn begin(
        pointer: DisplayPoint,
        region: Region,
        transform: &ViewTransform,
        margin: f64,
    ) -> Self {
        let mode = hit_test(pointer, &region, transform, margin);
        Self::new(mode, pointer, region)
    }

    /// Mode picked at pointer-down.
    #[must_use]
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Pointer position at pointer-down, in display space.
    #[must_use]
    pub fn anchor_pointer(&self) -> DisplayPoint {
        self.anchor_pointer
    }

    /// Region snapshot taken at pointer-down.
    #[must_use]
    pub fn anchor_region(&self) -> Region {
        self.anchor_region
    }

    /// Region resulting from moving the pointer to `pointer`.
    ///
    /// The result always satisfies the region invariants for the image the
    /// transform was built for.
    #[must_use]
    pub fn update(&self, pointer: DisplayPoint, transform: &ViewTransform) -> Region {
        let (width, height) = transform.image_size();
        let anchor = transform.to_image(self.anchor_pointer);
        let current = transform.to_image(pointer);
        let (dx, dy) = current - anchor;

        match self.mode {
            DragMode::Move => self.moved(dx, dy, width, height),
            DragMode::Create => {
                let (fw, fh) = (f64::from(width), f64::from(height));
                let (cx, cy) = (current.x.clamp(0.0, fw), current.y.clamp(0.0, fh));
                let (ax, ay) = (anchor.x.clamp(0.0, fw), anchor.y.clamp(0.0, fh));
                let (l, r) = span_axis(ax, cx, f64::from(min_extent(width)));
                let (t, b) = span_axis(ay, cy, f64::from(min_extent(height)));
                Region::from_edges(l, t, r, b, width, height)
            }
            mode => self.resized(mode, dx, dy, width, height),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn moved(&self, dx: f64, dy: f64, width: u32, height: u32) -> Region {
        let r = self.anchor_region;
        let max_x = f64::from(width.saturating_sub(r.w));
        let max_y = f64::from(height.saturating_sub(r.h));
        let x = (f64::from(r.x) + dx).round().max(0.0).min(max_x);
        let y = (f64::from(r.y) + dy).round().max(0.0).min(max_y);
        Region::new(x as u32, y as u32, r.w, r.h).clamp_to(width, height)
    }

    fn resized(&self, mode: DragMode, dx: f64, dy: f64, width: u32, height: u32) -> Region {
        let (l, t, r, b) = self.anchor_region.edges();
        let (fw, fh) = (f64::from(width), f64::from(height));
        let min_w = f64::from(min_extent(width));
        let min_h = f64::from(min_extent(height));
        let (move_l, move_t, move_r, move_b) = mode.moving_edges();

        // A moving edge may travel up to the image border but never closer
        // than the minimum size to the opposite, anchored edge.
        let nl = if move_l { (l + dx).max(0.0).min(r - min_w) } else { l };
        let nr = if move_r { (r + dx).min(fw).max(l + min_w) } else { r };
        let nt = if move_t { (t + dy).max(0.0).min(b - min_h) } else { t };
        let nb = if move_b { (b + dy).min(fh).max(t + min_h) } else { b };

        Region::from_edges(nl, nt, nr, nb, width, height)
    }
}

/// Span between an anchor coordinate and the pointer on one axis, grown away
/// from the anchor in the drag direction when shorter than `min`.
fn span_axis(anchor: f64, current: f64, min: f64) -> (f64, f64) {
    if current >= anchor {
        (anchor, current.max(anchor + min))
    } else {
        (current.min(anchor - min), anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::DEFAULT_HIT_MARGIN;

    const ALL_MODES: [DragMode; 10] = [
        DragMode::Move,
        DragMode::Create,
        DragMode::N,
        DragMode::S,
        DragMode::E,
        DragMode::W,
        DragMode::NW,
        DragMode::NE,
        DragMode::SW,
        DragMode::SE,
    ];

    fn unit() -> ViewTransform {
        ViewTransform::fit(800, 600, 800, 600)
    }

    fn drag(mode: DragMode, start: Region, dx: f64, dy: f64) -> Region {
        let t = unit();
        let anchor = DisplayPoint::new(400.0, 300.0);
        DragSession::new(mode, anchor, start)
            .update(DisplayPoint::new(anchor.x + dx, anchor.y + dy), &t)
    }

    #[test]
    fn every_mode_keeps_invariants() {
        let starts = [
            Region::new(100, 100, 50, 50),
            Region::new(0, 0, 20, 20),
            Region::new(780, 580, 20, 20),
            Region::new(0, 0, 800, 600),
            Region::new(680, 560, 100, 30),
        ];
        let deltas = [-2000.0, -333.3, -80.0, -19.5, -1.0, 0.0, 0.4, 7.0, 61.2, 250.0, 5000.0];
        for mode in ALL_MODES {
            for start in starts {
                for &dx in &deltas {
                    for &dy in &deltas {
                        let r = drag(mode, start, dx, dy);
                        assert!(
                            r.is_valid_for(800, 600),
                            "{mode:?} from {start:?} by ({dx},{dy}) -> {r:?}"
                        );
                        assert_eq!(r.clamp_to(800, 600), r);
                    }
                }
            }
        }
    }

    #[test]
    fn single_edges_keep_opposite_edge() {
        let start = Region::new(200, 150, 120, 90);
        for &d in &[-500.0, -110.0, -30.0, 0.0, 25.0, 300.0] {
            let e = drag(DragMode::E, start, d, d);
            assert_eq!((e.x, e.y, e.h), (start.x, start.y, start.h));

            let w = drag(DragMode::W, start, d, d);
            assert_eq!(w.right(), start.right());
            assert_eq!((w.y, w.h), (start.y, start.h));

            let n = drag(DragMode::N, start, d, d);
            assert_eq!(n.bottom(), start.bottom());
            assert_eq!((n.x, n.w), (start.x, start.w));

            let s = drag(DragMode::S, start, d, d);
            assert_eq!((s.x, s.y, s.w), (start.x, start.y, start.w));
        }
    }

    #[test]
    fn corners_compose_adjacent_edges() {
        let start = Region::new(300, 200, 100, 80);
        let pairs = [
            (DragMode::NW, DragMode::W, DragMode::N),
            (DragMode::NE, DragMode::E, DragMode::N),
            (DragMode::SW, DragMode::W, DragMode::S),
            (DragMode::SE, DragMode::E, DragMode::S),
        ];
        for &(corner, horiz, vert) in &pairs {
            for &(dx, dy) in &[(-40.0, 15.0), (90.0, -300.0), (-1000.0, 1000.0), (3.5, 2.5)] {
                let c = drag(corner, start, dx, dy);
                let h = drag(horiz, start, dx, dy);
                let v = drag(vert, start, dx, dy);
                assert_eq!((c.x, c.w), (h.x, h.w), "{corner:?} ({dx},{dy})");
                assert_eq!((c.y, c.h), (v.y, v.h), "{corner:?} ({dx},{dy})");
            }
        }
    }

    #[test]
    fn se_shrink_floors_at_min_size() {
        // scale 0.5, so a display delta of -40 is an image delta of -80
        let t = ViewTransform::fit(1600, 1200, 800, 600);
        let start = Region::new(100, 100, 50, 50);
        let anchor = DisplayPoint::new(75.0, 75.0);
        let session = DragSession::begin(anchor, start, &t, DEFAULT_HIT_MARGIN);
        assert_eq!(session.mode(), DragMode::SE);

        let r = session.update(DisplayPoint::new(35.0, 35.0), &t);
        assert_eq!(r, Region::new(100, 100, 20, 20));
    }

    #[test]
    fn west_edge_never_crosses_east_edge() {
        let start = Region::new(100, 100, 50, 50);
        let r = drag(DragMode::W, start, 400.0, 0.0);
        assert_eq!(r, Region::new(130, 100, 20, 50));
    }

    #[test]
    fn create_normalizes_to_min_corner() {
        let t = unit();
        let session =
            DragSession::new(DragMode::Create, DisplayPoint::new(300.0, 200.0), Region::default_for(800, 600));
        let r = session.update(DisplayPoint::new(250.0, 150.0), &t);
        assert_eq!(r, Region::new(250, 150, 50, 50));
    }

    #[test]
    fn create_tiny_span_grows_away_from_anchor() {
        let t = unit();
        let session =
            DragSession::new(DragMode::Create, DisplayPoint::new(300.0, 200.0), Region::default_for(800, 600));
        let r = session.update(DisplayPoint::new(295.0, 203.0), &t);
        assert_eq!(r, Region::new(280, 200, 20, 20));
    }

    #[test]
    fn create_clips_pointer_to_image() {
        let t = unit();
        let session =
            DragSession::new(DragMode::Create, DisplayPoint::new(700.0, 500.0), Region::default_for(800, 600));
        let r = session.update(DisplayPoint::new(2000.0, -50.0), &t);
        assert_eq!(r, Region::new(700, 0, 100, 500));
    }

    #[test]
    fn move_clamps_inside_image() {
        let start = Region::new(100, 100, 50, 50);
        assert_eq!(drag(DragMode::Move, start, 25.0, -10.0), Region::new(125, 90, 50, 50));
        assert_eq!(drag(DragMode::Move, start, -500.0, 9000.0), Region::new(0, 550, 50, 50));
    }

    #[test]
    fn returning_to_anchor_restores_region() {
        let start = Region::new(100, 120, 60, 40);
        for mode in ALL_MODES.into_iter().filter(|m| *m != DragMode::Create) {
            assert_eq!(drag(mode, start, 0.0, 0.0), start, "{mode:?}");
        }
    }
}
