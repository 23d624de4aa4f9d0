//! Primitive rasterization.
//!
//! Device coordinates are pixels with the origin in the top-left corner and
//! pixel `(x, y)` covering `[x, x+1) x [y, y+1)`.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw a line using Bresenham's algorithm (non-antialiased).
///
/// Pixels outside the framebuffer are skipped.
pub fn draw_line(fb: &mut Framebuffer, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        fb.plot(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a segment of the given pen width.
///
/// The segment is first clipped to the page so far-off endpoints cost
/// nothing. Widths above one stamp a square brush along the Bresenham path.
pub fn draw_segment(fb: &mut Framebuffer, a: Point, b: Point, width: u32, color: Rgba) {
    let margin = f64::from(width);
    let (w, h) = (f64::from(fb.width()), f64::from(fb.height()));
    let page = Rect::new(-margin, w + margin, -margin, h + margin);
    let Some((a, b)) = page.clip_segment(a, b) else {
        return;
    };

    let (x0, y0) = (a.x.floor() as i64, a.y.floor() as i64);
    let (x1, y1) = (b.x.floor() as i64, b.y.floor() as i64);

    if width <= 1 {
        draw_line(fb, x0, y0, x1, y1, color);
        return;
    }

    let lo = -(i64::from(width) - 1) / 2;
    let hi = lo + i64::from(width);
    for oy in lo..hi {
        for ox in lo..hi {
            draw_line(fb, x0 + ox, y0 + oy, x1 + ox, y1 + oy, color);
        }
    }
}

/// Draw connected segments through `points`.
pub fn draw_polyline(fb: &mut Framebuffer, points: &[Point], width: u32, color: Rgba) {
    if let [only] = points {
        draw_segment(fb, *only, *only, width, color);
        return;
    }
    for pair in points.windows(2) {
        draw_segment(fb, pair[0], pair[1], width, color);
    }
}

// ============================================================================
// Polygon Fill
// ============================================================================

/// Fill a polygon using the even-odd rule with pixel-centre sampling.
///
/// A pixel is filled when its centre `(x + 0.5, y + 0.5)` lies inside. Two
/// polygons sharing an edge therefore never both claim a pixel on it, and
/// never both miss one.
pub fn fill_polygon(fb: &mut Framebuffer, polygon: &[Point], color: Rgba) {
    if polygon.len() < 3 {
        return;
    }

    let mut ymin = f64::INFINITY;
    let mut ymax = f64::NEG_INFINITY;
    for p in polygon {
        ymin = ymin.min(p.y);
        ymax = ymax.max(p.y);
    }
    if !ymin.is_finite() || !ymax.is_finite() {
        return;
    }

    let row_start = ((ymin - 0.5).ceil() as i64).max(0);
    let row_end = ((ymax - 0.5).ceil() as i64).min(i64::from(fb.height()));

    let mut crossings: Vec<f64> = Vec::with_capacity(8);
    for row in row_start..row_end {
        let yc = row as f64 + 0.5;
        crossings.clear();

        for (idx, a) in polygon.iter().enumerate() {
            let b = polygon[(idx + 1) % polygon.len()];
            if (a.y <= yc) != (b.y <= yc) {
                let t = (yc - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }

        crossings.sort_by(f64::total_cmp);
        for span in crossings.chunks_exact(2) {
            let x0 = (span[0] - 0.5).ceil() as i64;
            let x1 = (span[1] - 0.5).ceil() as i64;
            fb.fill_span(x0, x1, row, color);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
