//! Band fill and contour geometry.
//!
//! Each grid cell's four corners are mapped to world space through the active
//! [`CoordTransform`] and the cell is split along its `(i0, j0)-(i1, j1)`
//! diagonal. Within a triangle `z` is linear, so clipping the triangle against
//! `z >= lo` and then `z <= hi` (Sutherland–Hodgman in attribute space) gives
//! exactly the part inside the band, and the bands of a pass tile the cell
//! without overlap. Cells lying wholly inside a band are emitted as one quad.
//!
//! Contour lines are traced on the same triangles, so band boundaries and
//! contour lines agree.

use crate::coords::CoordTransform;
use crate::error::Result;
use crate::geometry::{polygon_area, Point};
use crate::grid::Grid;

/// Periodic closure of the index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
    /// No wrapping.
    #[default]
    None,
    /// Index `i` is periodic: a cell joins `i = nx-1` back to `i = 0`.
    I,
    /// Index `j` is periodic: a cell joins `j = ny-1` back to `j = 0`.
    J,
}

/// A line segment in world coordinates.
pub type Segment = (Point, Point);

#[derive(Debug, Clone, Copy)]
struct Vertex {
    p: Point,
    z: f64,
}

impl Vertex {
    fn towards(self, other: Self, level: f64) -> Self {
        let t = (level - self.z) / (other.z - self.z);
        Self {
            p: self.p.lerp(other.p, t),
            z: level,
        }
    }
}

/// The cells `(i0, i1, j0, j1)` of an `nx x ny` grid, honouring wrap.
fn cells(nx: usize, ny: usize, wrap: Wrap) -> impl Iterator<Item = (usize, usize, usize, usize)> {
    let ci = if wrap == Wrap::I { nx } else { nx - 1 };
    let cj = if wrap == Wrap::J { ny } else { ny - 1 };
    (0..ci)
        .flat_map(move |i| (0..cj).map(move |j| (i, j)))
        .map(move |(i, j)| (i, (i + 1) % nx, j, (j + 1) % ny))
}

/// Corner ring of a cell in counter-clockwise index order.
fn corner_ring(
    z: &Grid,
    transform: &CoordTransform<'_>,
    (i0, i1, j0, j1): (usize, usize, usize, usize),
) -> Option<[Vertex; 4]> {
    let (nx, ny) = z.dims();
    let corner = |i: usize, j: usize| Vertex {
        p: transform.map(i, j, nx, ny),
        z: z.get(i, j),
    };
    let ring = [
        corner(i0, j0),
        corner(i1, j0),
        corner(i1, j1),
        corner(i0, j1),
    ];
    let finite = |v: &Vertex| v.z.is_finite() && v.p.x.is_finite() && v.p.y.is_finite();
    ring.iter().all(finite).then_some(ring)
}

/// Polygons below this fraction of the squared cell extent are dropped.
///
/// Covers folded cells, such as the closing cell of a periodic mesh whose
/// last column repeats the first, where rounding leaves an area near 1e-17.
const MIN_RELATIVE_AREA: f64 = 1e-12;

/// Larger side of a cell's bounding box.
fn cell_extent(ring: &[Vertex; 4]) -> f64 {
    let mut lo = ring[0].p;
    let mut hi = ring[0].p;
    for v in &ring[1..] {
        lo.x = lo.x.min(v.p.x);
        lo.y = lo.y.min(v.p.y);
        hi.x = hi.x.max(v.p.x);
        hi.y = hi.y.max(v.p.y);
    }
    (hi.x - lo.x).max(hi.y - lo.y)
}

/// Split a corner ring along its first diagonal.
fn triangles(ring: &[Vertex; 4]) -> [[Vertex; 3]; 2] {
    [[ring[0], ring[1], ring[2]], [ring[0], ring[2], ring[3]]]
}

fn clip_ring(input: &[Vertex], inside: impl Fn(f64) -> bool, level: f64) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(input.len() + 2);
    for (idx, &current) in input.iter().enumerate() {
        let previous = input[(idx + input.len() - 1) % input.len()];
        match (inside(previous.z), inside(current.z)) {
            (true, true) => out.push(current),
            (true, false) => out.push(previous.towards(current, level)),
            (false, true) => {
                out.push(previous.towards(current, level));
                out.push(current);
            }
            (false, false) => {}
        }
    }
    out
}

/// Polygons covering the part of the field with `lo <= z <= hi`.
///
/// Cells with a non-finite corner are skipped.
///
/// # Errors
///
/// Returns [`crate::Error::MeshMismatch`] if the transform's mesh does not
/// match the field.
pub fn band_polygons(
    z: &Grid,
    lo: f64,
    hi: f64,
    transform: &CoordTransform<'_>,
    wrap: Wrap,
) -> Result<Vec<Vec<Point>>> {
    let (nx, ny) = z.dims();
    transform.validate(nx, ny)?;

    let mut polygons = Vec::new();
    for cell in cells(nx, ny, wrap) {
        let Some(ring) = corner_ring(z, transform, cell) else {
            continue;
        };

        let min_area = MIN_RELATIVE_AREA * cell_extent(&ring).powi(2);
        if ring.iter().all(|v| v.z >= lo && v.z <= hi) {
            let polygon: Vec<Point> = ring.iter().map(|v| v.p).collect();
            if polygon_area(&polygon).abs() > min_area {
                polygons.push(polygon);
            }
            continue;
        }
        if ring.iter().all(|v| v.z < lo) || ring.iter().all(|v| v.z > hi) {
            continue;
        }

        for tri in triangles(&ring) {
            let above = clip_ring(&tri, |v| v >= lo, lo);
            if above.len() < 3 {
                continue;
            }
            let inside = clip_ring(&above, |v| v <= hi, hi);
            if inside.len() < 3 {
                continue;
            }
            let polygon: Vec<Point> = inside.iter().map(|v| v.p).collect();
            // Triangles touching the band at a vertex or edge collapse to zero area.
            if polygon_area(&polygon).abs() > min_area {
                polygons.push(polygon);
            }
        }
    }
    Ok(polygons)
}

/// Contour segments of the field at `level`.
///
/// # Errors
///
/// Returns [`crate::Error::MeshMismatch`] if the transform's mesh does not
/// match the field.
pub fn contour_segments(
    z: &Grid,
    level: f64,
    transform: &CoordTransform<'_>,
    wrap: Wrap,
) -> Result<Vec<Segment>> {
    let (nx, ny) = z.dims();
    transform.validate(nx, ny)?;

    let mut segments = Vec::new();
    for cell in cells(nx, ny, wrap) {
        let Some(ring) = corner_ring(z, transform, cell) else {
            continue;
        };

        for tri in triangles(&ring) {
            let mut crossings = Vec::with_capacity(2);
            for k in 0..3 {
                let a = tri[k];
                let b = tri[(k + 1) % 3];
                if (a.z < level) != (b.z < level) {
                    crossings.push(a.towards(b, level).p);
                }
            }
            // A triangle is crossed on exactly zero or two edges.
            if let [a, b] = crossings[..] {
                segments.push((a, b));
            }
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Mesh2;
    use crate::demos::fields::polar_field;
    use crate::geometry::Rect;
    use crate::levels::BandSet;
    use approx::assert_relative_eq;

    fn ramp(nx: usize, ny: usize) -> Grid {
        // z = x over [0, 1]
        Grid::from_fn(nx, ny, |i, _| i as f64 / (nx - 1) as f64).unwrap()
    }

    fn unit() -> CoordTransform<'static> {
        CoordTransform::Identity(Rect::unit())
    }

    fn total_area(polys: &[Vec<Point>]) -> f64 {
        polys.iter().map(|p| polygon_area(p).abs()).sum()
    }

    #[test]
    fn test_band_area_matches_fraction() {
        let z = ramp(11, 5);
        let polys = band_polygons(&z, 0.25, 0.75, &unit(), Wrap::None).unwrap();
        assert_relative_eq!(total_area(&polys), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_bands_tile_the_domain() {
        let z = Grid::from_fn(9, 7, |i, j| ((i * 3 + j * 5) % 11) as f64).unwrap();
        let (zmin, zmax) = z.min_max().unwrap();
        let n = 6;
        let dz = (zmax - zmin) / n as f64;
        let mut area = 0.0;
        for k in 0..n {
            let lo = zmin + dz * k as f64;
            let hi = zmin + dz * (k + 1) as f64;
            area += total_area(&band_polygons(&z, lo, hi, &unit(), Wrap::None).unwrap());
        }
        assert_relative_eq!(area, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_band_outside_range_is_empty() {
        let z = ramp(5, 5);
        let polys = band_polygons(&z, 2.0, 3.0, &unit(), Wrap::None).unwrap();
        assert!(polys.is_empty());
    }

    #[test]
    fn test_nan_cells_skipped() {
        let z = Grid::from_vec(2, 2, vec![0.0, f64::NAN, 0.5, 1.0]).unwrap();
        let polys = band_polygons(&z, 0.0, 1.0, &unit(), Wrap::None).unwrap();
        assert!(polys.is_empty());
    }

    #[test]
    fn test_wrap_adds_closing_cells() {
        assert_eq!(cells(4, 3, Wrap::None).count(), 3 * 2);
        assert_eq!(cells(4, 3, Wrap::I).count(), 4 * 2);
        assert_eq!(cells(4, 3, Wrap::J).count(), 3 * 3);
        let last = cells(4, 3, Wrap::J).last().unwrap();
        assert_eq!(last, (2, 3, 2, 0));
    }

    #[test]
    fn test_folded_wrap_cells_dropped() {
        let (mesh, z) = polar_field(35, 46).unwrap();
        let t = CoordTransform::Grid2(&mesh);
        let bands = BandSet::from_grid(&z, 20).unwrap();

        let mut total = 0;
        for band in &bands {
            let polys = band_polygons(&z, band.min, band.max, &t, Wrap::J).unwrap();
            total += polys.len();
            // Closing cells collapse onto the t = 0 ray.
            let on_ray = |p: &Vec<Point>| p.iter().all(|v| v.y.abs() < 1e-12 && v.x >= -1e-12);
            assert!(!polys.iter().any(on_ray), "band {}", band.index);
        }
        assert!(total > 0);
    }

    #[test]
    fn test_uniform_band_keeps_every_cell() {
        let z = Grid::from_fn(4, 3, |_, _| 0.5).unwrap();
        let polys = band_polygons(&z, 0.0, 1.0, &unit(), Wrap::None).unwrap();
        assert_eq!(polys.len(), 3 * 2);
        assert_relative_eq!(total_area(&polys), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mesh_mismatch_rejected() {
        let z = ramp(4, 4);
        let mesh = Mesh2::new(ramp(4, 3), ramp(4, 3)).unwrap();
        let t = CoordTransform::Grid2(&mesh);
        assert!(band_polygons(&z, 0.0, 1.0, &t, Wrap::None).is_err());
        assert!(contour_segments(&z, 0.5, &t, Wrap::None).is_err());
    }

    #[test]
    fn test_contour_of_ramp_is_vertical_line() {
        let z = ramp(5, 4);
        let segments = contour_segments(&z, 0.6, &unit(), Wrap::None).unwrap();
        // Two triangles per crossed cell, one cell per row.
        assert_eq!(segments.len(), 6);
        for (a, b) in &segments {
            assert_relative_eq!(a.x, 0.6, epsilon = 1e-12);
            assert_relative_eq!(b.x, 0.6, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_saddle_gives_two_segments() {
        let z = Grid::from_vec(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let segments = contour_segments(&z, 0.5, &unit(), Wrap::None).unwrap();
        assert_eq!(segments.len(), 2);
    }
}
