//! Coordinate meshes and grid-index transforms.
//!
//! A field sampled on an `nx x ny` grid is drawn by mapping each index pair
//! `(i, j)` to a world point. Exactly one [`CoordTransform`] is in effect for
//! a pass:
//!
//! - [`CoordTransform::Identity`] spreads the indices evenly over a rectangle.
//! - [`CoordTransform::Grid1`] looks up separable 1-D arrays, `(xg[i], yg[j])`.
//! - [`CoordTransform::Grid2`] looks up full 2-D arrays, `(xg[i][j], yg[i][j])`.

use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::grid::Grid;

/// Separable coordinate arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh1 {
    /// World x for each first index.
    pub xg: Vec<f64>,
    /// World y for each second index.
    pub yg: Vec<f64>,
}

impl Mesh1 {
    /// `(xg.len(), yg.len())`.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        (self.xg.len(), self.yg.len())
    }
}

/// Non-separable coordinate arrays with the same shape as the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh2 {
    /// World x for each sample.
    pub xg: Grid,
    /// World y for each sample.
    pub yg: Grid,
}

impl Mesh2 {
    /// Pair two coordinate grids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordShapeMismatch`] if the grids differ in shape.
    pub fn new(xg: Grid, yg: Grid) -> Result<Self> {
        if xg.dims() != yg.dims() {
            return Err(Error::CoordShapeMismatch {
                xg_nx: xg.nx(),
                xg_ny: xg.ny(),
                yg_nx: yg.nx(),
                yg_ny: yg.ny(),
            });
        }
        Ok(Self { xg, yg })
    }

    /// Shape of the coordinate grids.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        self.xg.dims()
    }
}

/// Which kind of mapping a transform applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordMode {
    /// Evenly spaced over a rectangle.
    Identity,
    /// Separable 1-D arrays.
    Grid1,
    /// Full 2-D arrays.
    Grid2,
}

impl std::fmt::Display for CoordMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Identity => "identity",
            Self::Grid1 => "grid1",
            Self::Grid2 => "grid2",
        };
        f.write_str(name)
    }
}

/// Mapping from grid indices to world coordinates.
#[derive(Debug, Clone, Copy)]
pub enum CoordTransform<'a> {
    /// Index `0..nx-1` spans `xmin..xmax`, `0..ny-1` spans `ymin..ymax`.
    Identity(Rect),
    /// Lookup in separable arrays.
    Grid1(&'a Mesh1),
    /// Lookup in 2-D arrays.
    Grid2(&'a Mesh2),
}

impl CoordTransform<'_> {
    /// The mode of this transform.
    #[must_use]
    pub const fn mode(&self) -> CoordMode {
        match self {
            Self::Identity(_) => CoordMode::Identity,
            Self::Grid1(_) => CoordMode::Grid1,
            Self::Grid2(_) => CoordMode::Grid2,
        }
    }

    /// Check that the transform covers a field of `nx x ny` samples exactly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MeshMismatch`] when a mesh has a different shape.
    pub fn validate(&self, nx: usize, ny: usize) -> Result<()> {
        let (mesh_nx, mesh_ny) = match self {
            Self::Identity(_) => return Ok(()),
            Self::Grid1(mesh) => mesh.dims(),
            Self::Grid2(mesh) => mesh.dims(),
        };
        if (mesh_nx, mesh_ny) != (nx, ny) {
            return Err(Error::MeshMismatch {
                field_nx: nx,
                field_ny: ny,
                mesh_nx,
                mesh_ny,
            });
        }
        Ok(())
    }

    /// World position of sample `(i, j)` of an `nx x ny` field.
    ///
    /// Callers validate the shape first; indices must be in range.
    #[must_use]
    pub fn map(&self, i: usize, j: usize, nx: usize, ny: usize) -> Point {
        match self {
            Self::Identity(rect) => {
                let fx = i as f64 / (nx - 1) as f64;
                let fy = j as f64 / (ny - 1) as f64;
                Point::new(
                    rect.xmin + rect.width() * fx,
                    rect.ymin + rect.height() * fy,
                )
            }
            Self::Grid1(mesh) => Point::new(mesh.xg[i], mesh.yg[j]),
            Self::Grid2(mesh) => Point::new(mesh.xg.get(i, j), mesh.yg.get(i, j)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_spans_rect() {
        let t = CoordTransform::Identity(Rect::new(-1.0, 1.0, -1.0, 1.0));
        let p0 = t.map(0, 0, 5, 3);
        let p1 = t.map(4, 2, 5, 3);
        let mid = t.map(2, 1, 5, 3);
        assert_relative_eq!(p0.x, -1.0);
        assert_relative_eq!(p0.y, -1.0);
        assert_relative_eq!(p1.x, 1.0);
        assert_relative_eq!(p1.y, 1.0);
        assert_relative_eq!(mid.x, 0.0);
        assert_relative_eq!(mid.y, 0.0);
        assert_eq!(t.mode(), CoordMode::Identity);
        assert!(t.validate(7, 9).is_ok());
    }

    #[test]
    fn test_grid1_lookup_and_validation() {
        let mesh = Mesh1 {
            xg: vec![0.0, 0.5, 2.0],
            yg: vec![10.0, 20.0],
        };
        let t = CoordTransform::Grid1(&mesh);
        let p = t.map(2, 1, 3, 2);
        assert_relative_eq!(p.x, 2.0);
        assert_relative_eq!(p.y, 20.0);
        assert!(t.validate(3, 2).is_ok());
        assert!(matches!(
            t.validate(3, 3),
            Err(Error::MeshMismatch {
                mesh_ny: 2,
                field_ny: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_grid2_lookup_and_validation() {
        let xg = Grid::from_fn(3, 2, |i, j| (i * 10 + j) as f64).unwrap();
        let yg = Grid::from_fn(3, 2, |i, j| -((i * 10 + j) as f64)).unwrap();
        let mesh = Mesh2::new(xg, yg).unwrap();
        let t = CoordTransform::Grid2(&mesh);
        let p = t.map(2, 1, 3, 2);
        assert_relative_eq!(p.x, 21.0);
        assert_relative_eq!(p.y, -21.0);
        assert_eq!(t.mode(), CoordMode::Grid2);
        assert!(t.validate(2, 3).is_err());
    }

    #[test]
    fn test_mesh2_shapes_must_agree() {
        let xg = Grid::from_fn(3, 2, |_, _| 0.0).unwrap();
        let yg = Grid::from_fn(2, 3, |_, _| 0.0).unwrap();
        let err = Mesh2::new(xg, yg).unwrap_err();
        assert!(matches!(
            err,
            Error::CoordShapeMismatch {
                xg_nx: 3,
                xg_ny: 2,
                yg_nx: 2,
                yg_ny: 3,
            }
        ));
        assert_eq!(
            err.to_string(),
            "Mesh x coordinates are 3x2 but y coordinates are 2x3"
        );
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(CoordMode::Grid1.to_string(), "grid1");
    }
}
