//! Plot symbols.
//!
//! Glyphs are stroke outlines in unit coordinates (y up, radius about 1),
//! generated from the glyph code:
//!
//! | Row digit | Family |
//! |---|---|
//! | 0 | regular polygon with `3 + col` sides |
//! | 1 | star with `3 + col` points |
//! | 2 | asterisk with `2 + col` spokes |
//! | 3 | circle around a `3 + col` sided polygon |
//! | 4 | arrow pointing at `36 * col` degrees |
//! | 5 | square with `col` hatch lines |
//! | 6 | spiral of `1 + col / 4` turns |
//! | 7 | polygon with diagonals from one vertex |
//! | 8 | seven-segment digit `col` |
//! | 9 | polygon with a centre cross |
//!
//! The hundreds block rotates the whole glyph by `15` degrees per block, so
//! every code in a font set yields a distinct, deterministic outline.

use std::f64::consts::{FRAC_PI_2, TAU};

/// A loadable symbol set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSet {
    /// Codes `0..1000`.
    #[default]
    Standard,
    /// Codes `0..3000`.
    Extended,
}

impl FontSet {
    /// One past the highest code in the set.
    #[must_use]
    pub const fn limit(self) -> u32 {
        match self {
            Self::Standard => 1000,
            Self::Extended => 3000,
        }
    }

    /// Whether `code` is part of the set.
    #[must_use]
    pub const fn contains(self, code: u32) -> bool {
        code < self.limit()
    }
}

/// Stroke outline of a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Open polylines; closed shapes repeat their first point.
    pub strokes: Vec<Vec<(f64, f64)>>,
}

impl Glyph {
    /// Total number of points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// Largest distance of any point from the glyph centre.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.strokes
            .iter()
            .flatten()
            .map(|&(x, y)| x.hypot(y))
            .fold(0.0, f64::max)
    }

    fn rotated(mut self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        for (x, y) in self.strokes.iter_mut().flatten() {
            let (rx, ry) = (*x * cos - *y * sin, *x * sin + *y * cos);
            *x = rx;
            *y = ry;
        }
        self
    }
}

/// The glyph for `code`, or `None` if the code is outside the loaded set.
#[must_use]
pub fn glyph(code: u32, set: FontSet) -> Option<Glyph> {
    if !set.contains(code) {
        return None;
    }
    let block = code / 100;
    let row = (code / 10) % 10;
    let col = (code % 10) as usize;

    let strokes = match row {
        0 => vec![regular_polygon(3 + col, 1.0, 0.0)],
        1 => vec![star(3 + col)],
        2 => asterisk(2 + col),
        3 => vec![
            regular_polygon(32, 1.0, 0.0),
            regular_polygon(3 + col, 0.55, 0.0),
        ],
        4 => arrow(36.0 * col as f64),
        5 => hatched_square(col),
        6 => vec![spiral(1.0 + col as f64 / 4.0)],
        7 => polygon_with_diagonals(4 + col),
        8 => seven_segment(col),
        _ => {
            let mut strokes = vec![regular_polygon(3 + col, 1.0, 0.0)];
            strokes.push(vec![(-0.5, 0.0), (0.5, 0.0)]);
            strokes.push(vec![(0.0, -0.5), (0.0, 0.5)]);
            strokes
        }
    };

    Some(Glyph { strokes }.rotated(15.0 * f64::from(block % 24)))
}

/// Closed regular polygon, first vertex at the top.
fn regular_polygon(sides: usize, radius: f64, phase: f64) -> Vec<(f64, f64)> {
    (0..=sides)
        .map(|k| {
            let t = FRAC_PI_2 + phase + TAU * (k % sides) as f64 / sides as f64;
            (radius * t.cos(), radius * t.sin())
        })
        .collect()
}

fn star(points: usize) -> Vec<(f64, f64)> {
    let n = points * 2;
    (0..=n)
        .map(|k| {
            let r = if k % 2 == 0 { 1.0 } else { 0.45 };
            let t = FRAC_PI_2 + TAU * (k % n) as f64 / n as f64;
            (r * t.cos(), r * t.sin())
        })
        .collect()
}

fn asterisk(spokes: usize) -> Vec<Vec<(f64, f64)>> {
    (0..spokes)
        .map(|k| {
            let t = FRAC_PI_2 + TAU * k as f64 / spokes as f64;
            vec![(0.0, 0.0), (t.cos(), t.sin())]
        })
        .collect()
}

fn arrow(heading: f64) -> Vec<Vec<(f64, f64)>> {
    let shaft = vec![(-1.0, 0.0), (1.0, 0.0)];
    let head = vec![(0.45, 0.45), (1.0, 0.0), (0.45, -0.45)];
    let strokes = vec![shaft, head];
    Glyph { strokes }.rotated(heading).strokes
}

fn hatched_square(lines: usize) -> Vec<Vec<(f64, f64)>> {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    let mut strokes = vec![vec![(-h, -h), (h, -h), (h, h), (-h, h), (-h, -h)]];
    for k in 1..=lines {
        let y = -h + 2.0 * h * k as f64 / (lines + 1) as f64;
        strokes.push(vec![(-h, y), (h, y)]);
    }
    strokes
}

fn spiral(turns: f64) -> Vec<(f64, f64)> {
    let steps = (turns * 24.0).ceil() as usize;
    (0..=steps)
        .map(|k| {
            let f = k as f64 / steps as f64;
            let t = TAU * turns * f;
            (f * t.cos(), f * t.sin())
        })
        .collect()
}

fn polygon_with_diagonals(sides: usize) -> Vec<Vec<(f64, f64)>> {
    let outline = regular_polygon(sides, 1.0, 0.0);
    let apex = outline[0];
    let mut strokes: Vec<_> = outline[2..sides - 1]
        .iter()
        .map(|&v| vec![apex, v])
        .collect();
    strokes.insert(0, outline);
    strokes
}

fn seven_segment(digit: usize) -> Vec<Vec<(f64, f64)>> {
    // Segments a..g as bits 0..6.
    const MASKS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];
    // Corners at radius sqrt(w^2 + h^2) < 1.
    let (w, h) = (0.5, 0.8);
    let segments = [
        [(-w, h), (w, h)],     // a
        [(w, h), (w, 0.0)],    // b
        [(w, 0.0), (w, -h)],   // c
        [(-w, -h), (w, -h)],   // d
        [(-w, 0.0), (-w, -h)], // e
        [(-w, h), (-w, 0.0)],  // f
        [(-w, 0.0), (w, 0.0)], // g
    ];
    let mask = MASKS[digit % 10];
    segments
        .iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, seg)| seg.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_set_limits() {
        assert!(glyph(999, FontSet::Standard).is_some());
        assert!(glyph(1000, FontSet::Standard).is_none());
        assert!(glyph(2999, FontSet::Extended).is_some());
        assert!(glyph(3000, FontSet::Extended).is_none());
    }

    #[test]
    fn test_every_code_has_strokes_within_unit_radius() {
        for code in 0..FontSet::Extended.limit() {
            let g = glyph(code, FontSet::Extended).unwrap();
            assert!(!g.strokes.is_empty(), "code {code}");
            assert!(g.strokes.iter().all(|s| !s.is_empty()), "code {code}");
            assert!(g.radius() <= 1.0 + 1e-9, "code {code}");
        }
    }

    #[test]
    fn test_seven_segment_eight_fits_symbol_box() {
        let strokes = seven_segment(8);
        assert_eq!(strokes.len(), 7);
        let g = Glyph { strokes };
        assert!(g.radius() < 1.0);
        assert!(g.radius() > 0.9);
    }

    #[test]
    fn test_polygon_closed() {
        let g = glyph(2, FontSet::Standard).unwrap();
        let ring = &g.strokes[0];
        assert_eq!(ring.len(), 6);
        assert_relative_eq!(ring[0].0, ring[5].0, epsilon = 1e-12);
        assert_relative_eq!(ring[0].1, ring[5].1, epsilon = 1e-12);
    }

    #[test]
    fn test_block_rotates_glyph() {
        let a = glyph(4, FontSet::Extended).unwrap();
        let b = glyph(2004, FontSet::Extended).unwrap();
        assert_eq!(a.point_count(), b.point_count());
        assert_ne!(a, b);
        assert_relative_eq!(a.radius(), b.radius(), epsilon = 1e-12);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            glyph(2345, FontSet::Extended),
            glyph(2345, FontSet::Extended)
        );
    }

    #[test]
    fn test_seven_segment_counts() {
        assert_eq!(seven_segment(8).len(), 7);
        assert_eq!(seven_segment(1).len(), 2);
        assert_eq!(glyph(88, FontSet::Standard).unwrap().strokes.len(), 7);
    }

    #[test]
    fn test_hatch_lines() {
        assert_eq!(glyph(50, FontSet::Standard).unwrap().strokes.len(), 1);
        assert_eq!(glyph(59, FontSet::Standard).unwrap().strokes.len(), 10);
    }
}
