//! Geometric primitives and clipping.
//!
//! World-space points and axis-aligned rectangles, plus the clipping used to
//! keep polylines and fills inside the plot window.

/// A 2D point with double-precision coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// An axis-aligned rectangle given by its bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left bound.
    pub xmin: f64,
    /// Right bound.
    pub xmax: f64,
    /// Lower bound.
    pub ymin: f64,
    /// Upper bound.
    pub ymax: f64,
}

impl Rect {
    /// Create a rectangle, normalising swapped bounds.
    #[must_use]
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin: xmin.min(xmax),
            xmax: xmin.max(xmax),
            ymin: ymin.min(ymax),
            ymax: ymin.max(ymax),
        }
    }

    /// The unit square `[0, 1] x [0, 1]`.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Check if a point is inside the rectangle (bounds inclusive).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.xmin && point.x <= self.xmax && point.y >= self.ymin && point.y <= self.ymax
    }

    /// Clip a polygon against this rectangle (Sutherland–Hodgman).
    ///
    /// Returns an empty vector when nothing of the polygon is inside.
    #[must_use]
    pub fn clip_polygon(&self, polygon: &[Point]) -> Vec<Point> {
        let mut out = polygon.to_vec();
        for edge in [Edge::Left, Edge::Right, Edge::Bottom, Edge::Top] {
            if out.is_empty() {
                break;
            }
            out = self.clip_against(&out, edge);
        }
        out
    }

    fn clip_against(&self, input: &[Point], edge: Edge) -> Vec<Point> {
        let inside = |p: Point| match edge {
            Edge::Left => p.x >= self.xmin,
            Edge::Right => p.x <= self.xmax,
            Edge::Bottom => p.y >= self.ymin,
            Edge::Top => p.y <= self.ymax,
        };
        let cross = |a: Point, b: Point| {
            let t = match edge {
                Edge::Left => (self.xmin - a.x) / (b.x - a.x),
                Edge::Right => (self.xmax - a.x) / (b.x - a.x),
                Edge::Bottom => (self.ymin - a.y) / (b.y - a.y),
                Edge::Top => (self.ymax - a.y) / (b.y - a.y),
            };
            a.lerp(b, t)
        };

        let mut out = Vec::with_capacity(input.len() + 4);
        for (idx, &current) in input.iter().enumerate() {
            let previous = input[(idx + input.len() - 1) % input.len()];
            match (inside(previous), inside(current)) {
                (true, true) => out.push(current),
                (true, false) => out.push(cross(previous, current)),
                (false, true) => {
                    out.push(cross(previous, current));
                    out.push(current);
                }
                (false, false) => {}
            }
        }
        out
    }

    /// Clip a segment against this rectangle (Liang–Barsky).
    ///
    /// Returns `None` when the segment lies entirely outside.
    #[must_use]
    pub fn clip_segment(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for (p, q) in [
            (-dx, a.x - self.xmin),
            (dx, self.xmax - a.x),
            (-dy, a.y - self.ymin),
            (dy, self.ymax - a.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        // Unclipped endpoints are returned exactly so callers can chain segments.
        let start = if t0 <= 0.0 { a } else { a.lerp(b, t0) };
        let end = if t1 >= 1.0 { b } else { a.lerp(b, t1) };
        Some((start, end))
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

/// Signed area of a polygon (positive for counter-clockwise winding).
#[must_use]
pub fn polygon_area(polygon: &[Point]) -> f64 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let twice: f64 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice / 2.0
}
