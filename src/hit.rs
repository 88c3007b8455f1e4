//! Pointer hit-testing against the region's handles and body.

use crate::geometry::{DisplayPoint, ImagePoint, ViewTransform};
use crate::region::Region;

/// Default hit tolerance around handles and edges, in display pixels.
pub const DEFAULT_HIT_MARGIN: f64 = 10.0;

/// What a pointer-down at a given position will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Translate the whole region.
    Move,
    /// Span a brand new region from the pointer.
    Create,
    /// Top edge.
    N,
    /// Bottom edge.
    S,
    /// Right edge.
    E,
    /// Left edge.
    W,
    /// Top-left corner.
    NW,
    /// Top-right corner.
    NE,
    /// Bottom-left corner.
    SW,
    /// Bottom-right corner.
    SE,
}

impl DragMode {
    /// Which edges this mode moves, as `(left, top, right, bottom)`.
    #[must_use]
    pub fn moving_edges(self) -> (bool, bool, bool, bool) {
        match self {
            Self::N => (false, true, false, false),
            Self::S => (false, false, false, true),
            Self::E => (false, false, true, false),
            Self::W => (true, false, false, false),
            Self::NW => (true, true, false, false),
            Self::NE => (false, true, true, false),
            Self::SW => (true, false, false, true),
            Self::SE => (false, false, true, true),
            Self::Move | Self::Create => (false, false, false, false),
        }
    }

    /// Pointer shape to show while hovering or dragging in this mode.
    #[must_use]
    pub fn cursor(self) -> CursorIcon {
        match self {
            Self::Move => CursorIcon::Move,
            Self::Create => CursorIcon::Crosshair,
            Self::NW | Self::SE => CursorIcon::NwseResize,
            Self::NE | Self::SW => CursorIcon::NeswResize,
            Self::N | Self::S => CursorIcon::NsResize,
            Self::E | Self::W => CursorIcon::EwResize,
        }
    }
}

/// Pointer affordance shown over the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    /// Nothing to interact with.
    #[default]
    Default,
    /// Pointer will draw a new region.
    Crosshair,
    /// Pointer will move the region.
    Move,
    /// Diagonal resize, top-left/bottom-right.
    NwseResize,
    /// Diagonal resize, top-right/bottom-left.
    NeswResize,
    /// Vertical resize.
    NsResize,
    /// Horizontal resize.
    EwResize,
}

impl CursorIcon {
    /// CSS-style cursor name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Crosshair => "crosshair",
            Self::Move => "move",
            Self::NwseResize => "nwse-resize",
            Self::NeswResize => "nesw-resize",
            Self::NsResize => "ns-resize",
            Self::EwResize => "ew-resize",
        }
    }
}

/// Classify `pointer` against `region` as drawn through `transform`.
///
/// Corners win over edges so small regions stay grabbable; edges need the
/// pointer strictly within the region's extent along that edge; the body
/// is the open interior. Anything else starts a new region.
#[must_use]
pub fn hit_test(
    pointer: DisplayPoint,
    region: &Region,
    transform: &ViewTransform,
    margin: f64,
) -> DragMode {
    let (l, t, r, b) = region.edges();
    let tl = transform.to_display(ImagePoint::new(l, t));
    let br = transform.to_display(ImagePoint::new(r, b));
    let (x0, y0, x1, y1) = (tl.x, tl.y, br.x, br.y);
    let (mx, my) = (pointer.x, pointer.y);

    let near = |a: f64, b: f64| (a - b).abs() < margin;
    let inside_x = mx > x0 && mx < x1;
    let inside_y = my > y0 && my < y1;

    if near(mx, x0) && near(my, y0) {
        DragMode::NW
    } else if near(mx, x1) && near(my, y0) {
        DragMode::NE
    } else if near(mx, x0) && near(my, y1) {
        DragMode::SW
    } else if near(mx, x1) && near(my, y1) {
        DragMode::SE
    } else if near(my, y0) && inside_x {
        DragMode::N
    } else if near(my, y1) && inside_x {
        DragMode::S
    } else if near(mx, x0) && inside_y {
        DragMode::W
    } else if near(mx, x1) && inside_y {
        DragMode::E
    } else if inside_x && inside_y {
        DragMode::Move
    } else {
        DragMode::Create
    }
}

/// Display-space centers of the eight handles, corners first
/// (NW, NE, SW, SE) followed by edge midpoints (N, S, W, E).
#[must_use]
pub fn handle_points(region: &Region, transform: &ViewTransform) -> [(DragMode, DisplayPoint); 8] {
    let (l, t, r, b) = region.edges();
    let cx = (l + r) / 2.0;
    let cy = (t + b) / 2.0;
    let p = |x: f64, y: f64| transform.to_display(ImagePoint::new(x, y));
    [
        (DragMode::NW, p(l, t)),
        (DragMode::NE, p(r, t)),
        (DragMode::SW, p(l, b)),
        (DragMode::SE, p(r, b)),
        (DragMode::N, p(cx, t)),
        (DragMode::S, p(cx, b)),
        (DragMode::W, p(l, cy)),
        (DragMode::E, p(r, cy)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Region, ViewTransform) {
        // scale 0.5: region spans display (50,50)-(150,100)
        (
            Region::new(100, 100, 200, 100),
            ViewTransform::fit(1120, 840, 560, 420),
        )
    }

    fn hit(x: f64, y: f64) -> DragMode {
        let (r, t) = setup();
        hit_test(DisplayPoint::new(x, y), &r, &t, DEFAULT_HIT_MARGIN)
    }

    #[test]
    fn corners() {
        assert_eq!(hit(50.0, 50.0), DragMode::NW);
        assert_eq!(hit(155.0, 45.0), DragMode::NE);
        assert_eq!(hit(42.0, 104.0), DragMode::SW);
        assert_eq!(hit(150.0, 100.0), DragMode::SE);
    }

    #[test]
    fn edges() {
        assert_eq!(hit(100.0, 52.0), DragMode::N);
        assert_eq!(hit(100.0, 95.0), DragMode::S);
        assert_eq!(hit(48.0, 75.0), DragMode::W);
        assert_eq!(hit(158.0, 75.0), DragMode::E);
    }

    #[test]
    fn body_and_outside() {
        assert_eq!(hit(100.0, 75.0), DragMode::Move);
        assert_eq!(hit(300.0, 300.0), DragMode::Create);
        assert_eq!(hit(0.0, 0.0), DragMode::Create);
    }

    #[test]
    fn margin_is_exclusive() {
        assert_eq!(hit(100.0, 40.0), DragMode::Create);
        assert_eq!(hit(100.0, 40.1), DragMode::N);
    }

    #[test]
    fn corners_take_precedence_on_tiny_regions() {
        let region = Region::new(0, 0, 20, 20);
        let t = ViewTransform::fit(100, 100, 560, 420);
        let mode = hit_test(DisplayPoint::new(5.0, 5.0), &region, &t, DEFAULT_HIT_MARGIN);
        assert_eq!(mode, DragMode::NW);
    }

    #[test]
    fn edge_band_requires_position_inside_extent() {
        // Beyond the corner tolerance along the top line, outside the extent.
        assert_eq!(hit(165.0, 50.0), DragMode::Create);
    }

    #[test]
    fn handle_points_match_display_corners() {
        let (r, t) = setup();
        let pts = handle_points(&r, &t);
        assert_eq!(pts[0], (DragMode::NW, DisplayPoint::new(50.0, 50.0)));
        assert_eq!(pts[3], (DragMode::SE, DisplayPoint::new(150.0, 100.0)));
        assert_eq!(pts[4], (DragMode::N, DisplayPoint::new(100.0, 50.0)));
        assert_eq!(pts[7], (DragMode::E, DisplayPoint::new(150.0, 75.0)));
    }

    #[test]
    fn cursor_mapping() {
        assert_eq!(DragMode::Create.cursor().name(), "crosshair");
        assert_eq!(DragMode::Move.cursor(), CursorIcon::Move);
        assert_eq!(DragMode::SE.cursor(), CursorIcon::NwseResize);
        assert_eq!(DragMode::SW.cursor(), CursorIcon::NeswResize);
        assert_eq!(DragMode::N.cursor(), CursorIcon::NsResize);
        assert_eq!(DragMode::W.cursor().name(), "ew-resize");
    }
}
