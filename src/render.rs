//! Compositing of the editing surface.
//!
//! The surface is redrawn from scratch on every change: base raster, a
//! translucent preview of the removal over the region, a dashed outline, and
//! the eight resize handles. Handle and outline sizes are in display pixels
//! and do not follow the image scale.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::color::{FillColor, RemovalMode};
use crate::geometry::{ImagePoint, ViewTransform};
use crate::hit::handle_points;
use crate::region::Region;

/// Visual constants of the editing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    /// Outline and handle color.
    pub accent: Rgba<u8>,
    /// Outline thickness in display pixels.
    pub outline_width: u32,
    /// Dash length and gap length of the outline.
    pub dash: (u32, u32),
    /// Side length of the square handles in display pixels.
    pub handle_size: u32,
    /// Overlay standing in for the blur result.
    pub blur_overlay: Rgba<u8>,
    /// Opacity applied to the fill color preview.
    pub fill_alpha: u8,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            accent: Rgba([0x16, 0x77, 0xff, 0xff]),
            outline_width: 2,
            dash: (5, 3),
            handle_size: 8,
            blur_overlay: Rgba([128, 128, 128, 102]),
            fill_alpha: 0xaa,
        }
    }
}

/// Everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Display-resolution raster of the image.
    pub base: &'a RgbaImage,
    /// Selected region in image space.
    pub region: Region,
    /// Image-to-display transform.
    pub transform: ViewTransform,
    /// Current removal mode.
    pub mode: RemovalMode,
    /// Current fill color (previewed only in fill mode).
    pub fill: FillColor,
}

/// Scale a decoded thumbnail to the display surface size of `transform`.
#[must_use]
pub fn prepare_base(thumbnail: &DynamicImage, transform: &ViewTransform) -> RgbaImage {
    let (w, h) = transform.display_size();
    let rgba = thumbnail.to_rgba8();
    if rgba.dimensions() == (w, h) {
        rgba
    } else {
        imageops::resize(&rgba, w, h, FilterType::Triangle)
    }
}

/// Draw a complete frame.
#[must_use]
pub fn render(scene: &Scene<'_>, style: &RenderStyle) -> RgbaImage {
    let mut surface = scene.base.clone();
    let (x0, y0, x1, y1) = display_rect(&scene.region, &scene.transform);

    let overlay = match scene.mode {
        RemovalMode::Blur => style.blur_overlay,
        RemovalMode::Fill => Rgba([scene.fill.r, scene.fill.g, scene.fill.b, style.fill_alpha]),
    };
    fill_rect(&mut surface, x0, y0, x1, y1, overlay);
    dashed_outline(&mut surface, (x0, y0, x1, y1), style);

    let half = i64::from(style.handle_size / 2);
    let size = i64::from(style.handle_size);
    for (_, p) in handle_points(&scene.region, &scene.transform) {
        #[allow(clippy::cast_possible_truncation)]
        let (cx, cy) = (p.x.round() as i64, p.y.round() as i64);
        fill_rect(&mut surface, cx - half, cy - half, cx - half + size, cy - half + size, style.accent);
    }

    surface
}

/// Region corners on the display surface, rounded to whole pixels.
#[allow(clippy::cast_possible_truncation)]
fn display_rect(region: &Region, transform: &ViewTransform) -> (i64, i64, i64, i64) {
    let (l, t, r, b) = region.edges();
    let tl = transform.to_display(ImagePoint::new(l, t));
    let br = transform.to_display(ImagePoint::new(r, b));
    (
        tl.x.round() as i64,
        tl.y.round() as i64,
        br.x.round() as i64,
        br.y.round() as i64,
    )
}

/// Alpha-blend `color` over the half-open rectangle `[x0, x1) x [y0, y1)`.
fn fill_rect(img: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    for y in y0.max(0)..y1.min(h) {
        for x in x0.max(0)..x1.min(w) {
            blend_pixel(img, x, y, color);
        }
    }
}

/// Stroke the rectangle outline clockwise from its top-left corner, with the
/// dash pattern running continuously around the corners.
fn dashed_outline(img: &mut RgbaImage, rect: (i64, i64, i64, i64), style: &RenderStyle) {
    let (x0, y0, x1, y1) = rect;
    let (on, off) = (i64::from(style.dash.0), i64::from(style.dash.1));
    let period = (on + off).max(1);
    let lo = -i64::from(style.outline_width / 2);
    let hi = lo + i64::from(style.outline_width.max(1));

    let top = (x0..x1).map(|x| (x, y0));
    let right = (y0..y1).map(|y| (x1, y));
    let bottom = (x0 + 1..=x1).rev().map(|x| (x, y1));
    let left = (y0 + 1..=y1).rev().map(|y| (x0, y));

    let mut step = 0_i64;
    for (px, py) in top.chain(right).chain(bottom).chain(left) {
        step += 1;
        if (step - 1) % period >= on {
            continue;
        }
        for oy in lo..hi {
            for ox in lo..hi {
                put_pixel(img, px + ox, py + oy, style.accent);
            }
        }
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn put_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
        blend_pixel(img, x, y, color);
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn blend_pixel(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    let px = img.get_pixel_mut(x as u32, y as u32);
    let alpha = f32::from(color[3]) / 255.0;
    for ch in 0..3 {
        let over = f32::from(color[ch]);
        let under = f32::from(px[ch]);
        px[ch] = (over * alpha + under * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
    }
    px[3] = px[3].max(color[3]);
}
