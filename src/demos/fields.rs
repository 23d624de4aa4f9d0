//! Synthetic fields and coordinate meshes for the shaded-field demo.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::coords::{Mesh1, Mesh2};
use crate::error::Result;
use crate::grid::Grid;

/// The "bogon" density `zz` and its companion stream field `ww`.
///
/// With `x = (i - nx/2) / (nx/2)` and `y = (j - ny/2) / (ny/2) - 1`:
///
/// - `zz = -sin(7x) cos(7y) + x^2 - y^2`
/// - `ww = -cos(7x) sin(7y) + 2xy`
///
/// # Errors
///
/// Returns [`crate::Error::InvalidGrid`] if either dimension is below 2.
pub fn bogon_fields(nx: usize, ny: usize) -> Result<(Grid, Grid)> {
    let hx = nx as f64 / 2.0;
    let hy = ny as f64 / 2.0;
    let x = |i: usize| (i as f64 - hx) / hx;
    let y = |j: usize| (j as f64 - hy) / hy - 1.0;

    let zz = Grid::from_fn(nx, ny, |i, j| {
        let (x, y) = (x(i), y(j));
        -(7.0 * x).sin() * (7.0 * y).cos() + x * x - y * y
    })?;
    let ww = Grid::from_fn(nx, ny, |i, j| {
        let (x, y) = (x(i), y(j));
        -(7.0 * x).cos() * (7.0 * y).sin() + 2.0 * x * y
    })?;
    Ok((zz, ww))
}

/// Evenly spaced `-1..=1` at index `k` of `n`.
fn unit_span(k: usize, n: usize) -> f64 {
    -1.0 + 2.0 * k as f64 / (n - 1) as f64
}

/// Separable distorted mesh.
///
/// `xg[i] = xx + d cos(pi/2 xx)` and `yg[j] = yy - d cos(pi/2 yy)`, where
/// `xx` and `yy` span `[-1, 1]`. Strictly increasing on both axes for
/// `d < 2/pi`.
#[must_use]
pub fn distorted_mesh1(nx: usize, ny: usize, distort: f64) -> Mesh1 {
    let xg = (0..nx)
        .map(|i| {
            let xx = unit_span(i, nx);
            xx + distort * (FRAC_PI_2 * xx).cos()
        })
        .collect();
    let yg = (0..ny)
        .map(|j| {
            let yy = unit_span(j, ny);
            yy - distort * (FRAC_PI_2 * yy).cos()
        })
        .collect();
    Mesh1 { xg, yg }
}

/// Non-separable distorted mesh.
///
/// With `c = cos(pi/2 xx) cos(pi/2 yy)`: `xg = xx + d c` and `yg = yy - d c`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidGrid`] if either dimension is below 2.
pub fn distorted_mesh2(nx: usize, ny: usize, distort: f64) -> Result<Mesh2> {
    let bump = |i: usize, j: usize| {
        let xx = unit_span(i, nx);
        let yy = unit_span(j, ny);
        (xx, yy, (FRAC_PI_2 * xx).cos() * (FRAC_PI_2 * yy).cos())
    };
    let xg = Grid::from_fn(nx, ny, |i, j| {
        let (xx, _, c) = bump(i, j);
        xx + distort * c
    })?;
    let yg = Grid::from_fn(nx, ny, |i, j| {
        let (_, yy, c) = bump(i, j);
        yy - distort * c
    })?;
    Mesh2::new(xg, yg)
}

/// Polar mesh and field.
///
/// With `r = i/(nx-1)` and `t = 2 pi j/(ny-1)`: the mesh is
/// `(r cos t, r sin t)` and the field is `exp(-r^2) cos(5t) cos(5 pi r)`.
/// The last `j` column repeats the first angle, closing the disc.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidGrid`] if either dimension is below 2.
pub fn polar_field(nx: usize, ny: usize) -> Result<(Mesh2, Grid)> {
    let r = |i: usize| i as f64 / (nx - 1) as f64;
    let t = |j: usize| TAU * j as f64 / (ny - 1) as f64;

    let xg = Grid::from_fn(nx, ny, |i, j| r(i) * t(j).cos())?;
    let yg = Grid::from_fn(nx, ny, |i, j| r(i) * t(j).sin())?;
    let z = Grid::from_fn(nx, ny, |i, j| {
        let (r, t) = (r(i), t(j));
        (-r * r).exp() * (5.0 * t).cos() * (5.0 * PI * r).cos()
    })?;
    Ok((Mesh2::new(xg, yg)?, z))
}

/// Closed unit circle of `n` points, first and last coinciding.
#[must_use]
pub fn perimeter(n: usize) -> (Vec<f64>, Vec<f64>) {
    if n < 2 {
        return (vec![1.0; n], vec![0.0; n]);
    }
    (0..n)
        .map(|i| {
            let t = TAU * i as f64 / (n - 1) as f64;
            (t.cos(), t.sin())
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bogon_field_values() {
        let (zz, ww) = bogon_fields(35, 46).unwrap();
        assert_eq!(zz.dims(), (35, 46));

        // i = 0, j = 23: x = -1, y = -1.
        let expected_z = -(-7.0f64).sin() * (-7.0f64).cos() + 1.0 - 1.0;
        let expected_w = -(-7.0f64).cos() * (-7.0f64).sin() + 2.0;
        assert_relative_eq!(zz.get(0, 23), expected_z, epsilon = 1e-12);
        assert_relative_eq!(ww.get(0, 23), expected_w, epsilon = 1e-12);
    }

    #[test]
    fn test_mesh1_endpoints() {
        let mesh = distorted_mesh1(35, 46, 0.4);
        assert_eq!(mesh.dims(), (35, 46));
        // cos(+-pi/2) = 0, so the ends are not displaced.
        assert_relative_eq!(mesh.xg[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.xg[34], 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.yg[45], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mesh2_centre_displacement() {
        let mesh = distorted_mesh2(5, 5, 0.4).unwrap();
        assert_relative_eq!(mesh.xg.get(2, 2), 0.4, epsilon = 1e-12);
        assert_relative_eq!(mesh.yg.get(2, 2), -0.4, epsilon = 1e-12);
        assert_relative_eq!(mesh.xg.get(0, 2), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polar_field_closes() {
        let (mesh, z) = polar_field(35, 46).unwrap();
        assert_eq!(z.dims(), mesh.dims());
        for i in 0..35 {
            assert_relative_eq!(mesh.xg.get(i, 0), mesh.xg.get(i, 45), epsilon = 1e-12);
            assert_relative_eq!(mesh.yg.get(i, 0), mesh.yg.get(i, 45), epsilon = 1e-12);
        }
        let expected = (5.0 * TAU * 7.0 / 45.0).cos();
        assert_relative_eq!(z.get(0, 7), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_perimeter_closed() {
        let (px, py) = perimeter(100);
        assert_eq!(px.len(), 100);
        assert_relative_eq!(px[0], px[99], epsilon = 1e-12);
        assert_relative_eq!(py[0], py[99], epsilon = 1e-12);
        for (x, y) in px.iter().zip(&py) {
            assert_relative_eq!(x.hypot(*y), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_small_grids_rejected() {
        assert!(bogon_fields(1, 10).is_err());
        assert!(polar_field(10, 1).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            /// The separable mesh never folds for distortions below 2/pi.
            #[test]
            fn prop_mesh1_strictly_monotonic(
                nx in 2usize..120,
                ny in 2usize..120,
                distort in 0.0f64..0.6
            ) {
                let mesh = distorted_mesh1(nx, ny, distort);
                for w in mesh.xg.windows(2) {
                    prop_assert!(w[1] > w[0]);
                }
                for w in mesh.yg.windows(2) {
                    prop_assert!(w[1] > w[0]);
                }
            }

            /// Every polar mesh point lies in the closed unit disc.
            #[test]
            fn prop_polar_mesh_in_unit_disc(nx in 2usize..60, ny in 2usize..60) {
                let (mesh, _) = polar_field(nx, ny).unwrap();
                for (x, y) in mesh.xg.as_slice().iter().zip(mesh.yg.as_slice()) {
                    prop_assert!(x * x + y * y <= 1.0 + 1e-12);
                }
            }
        }
    }
}
