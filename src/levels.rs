//! Contour bands and levels.
//!
//! `N` bands split `[zmin, zmax]` into equal intervals. Band `k` covers
//! `[zmin + dz*k/N, zmin + dz*(k+1)/N]` and is filled with the cmap1 colour
//! at `k/(N-1)`, so the first band takes the bottom of the map and the last
//! band takes the top. Contour levels sit at the band centres,
//! `zmin + dz*(k+1/2)/N`.

use crate::error::{Error, Result};
use crate::grid::Grid;

/// One contour band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Band index `k`.
    pub index: usize,
    /// Lower threshold (`shade_min`).
    pub min: f64,
    /// Upper threshold (`shade_max`).
    pub max: f64,
    /// cmap1 position (`sh_color`), in `[0, 1]`.
    pub color: f64,
}

impl Band {
    /// Whether `z` falls inside the band (both thresholds inclusive).
    #[must_use]
    pub fn contains(&self, z: f64) -> bool {
        z >= self.min && z <= self.max
    }
}

/// The ordered bands for one rendering pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSet {
    zmin: f64,
    zmax: f64,
    bands: Vec<Band>,
}

impl BandSet {
    /// Split `[zmin, zmax]` into `n` bands.
    ///
    /// A flat range (`zmin == zmax`) is accepted and yields degenerate bands.
    ///
    /// # Errors
    ///
    /// - [`Error::TooFewBands`] if `n < 2`: the colour position `k/(n-1)` is
    ///   undefined for a single band.
    /// - [`Error::InvalidRange`] if the range is inverted or not finite.
    pub fn new(zmin: f64, zmax: f64, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(Error::TooFewBands(n));
        }
        if !zmin.is_finite() || !zmax.is_finite() || zmax < zmin {
            return Err(Error::InvalidRange {
                min: zmin,
                max: zmax,
            });
        }

        let dz = zmax - zmin;
        let nf = n as f64;
        let bands = (0..n)
            .map(|k| {
                let kf = k as f64;
                Band {
                    index: k,
                    min: zmin + dz * kf / nf,
                    max: zmin + dz * (kf + 1.0) / nf,
                    color: kf / (nf - 1.0),
                }
            })
            .collect();

        Ok(Self { zmin, zmax, bands })
    }

    /// Bands spanning the finite range of a grid.
    ///
    /// # Errors
    ///
    /// As [`BandSet::new`], plus [`Error::EmptyData`] when the grid has no
    /// finite sample.
    pub fn from_grid(grid: &Grid, n: usize) -> Result<Self> {
        let (zmin, zmax) = grid.min_max().ok_or(Error::EmptyData)?;
        Self::new(zmin, zmax, n)
    }

    /// Lower end of the range.
    #[must_use]
    pub const fn zmin(&self) -> f64 {
        self.zmin
    }

    /// Upper end of the range.
    #[must_use]
    pub const fn zmax(&self) -> f64 {
        self.zmax
    }

    /// Number of bands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always false: a band set holds at least two bands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// The bands in increasing order.
    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Iterate over the bands.
    pub fn iter(&self) -> std::slice::Iter<'_, Band> {
        self.bands.iter()
    }

    /// Contour levels at the band centres.
    #[must_use]
    pub fn contour_levels(&self) -> Vec<f64> {
        let nf = self.bands.len() as f64;
        let dz = self.zmax - self.zmin;
        (0..self.bands.len()).map(|k| self.zmin + dz * (k as f64 + 0.5) / nf).collect()
    }

    /// The colour positions, in band order.
    #[must_use]
    pub fn colors(&self) -> Vec<f64> {
        self.bands.iter().map(|b| b.color).collect()
    }
}

impl<'a> IntoIterator for &'a BandSet {
    type Item = &'a Band;
    type IntoIter = std::slice::Iter<'a, Band>;

    fn into_iter(self) -> Self::IntoIter {
        self.bands.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_boundaries() {
        let set = BandSet::new(0.0, 10.0, 4).unwrap();
        assert_eq!(set.len(), 4);
        let b = set.bands();
        assert_relative_eq!(b[0].min, 0.0);
        assert_relative_eq!(b[0].max, 2.5);
        assert_relative_eq!(b[3].min, 7.5);
        assert_relative_eq!(b[3].max, 10.0);
        assert!(b[1].contains(2.5));
        assert!(!b[1].contains(5.1));
    }

    #[test]
    fn test_colors_span_unit_interval() {
        let set = BandSet::new(-1.0, 1.0, 20).unwrap();
        let colors = set.colors();
        assert_relative_eq!(colors[0], 0.0);
        assert_relative_eq!(colors[19], 1.0);
        for (k, c) in colors.iter().enumerate() {
            assert_relative_eq!(*c, k as f64 / 19.0);
        }
    }

    #[test]
    fn test_centred_levels() {
        let set = BandSet::new(0.0, 1.0, 2).unwrap();
        let levels = set.contour_levels();
        assert_relative_eq!(levels[0], 0.25);
        assert_relative_eq!(levels[1], 0.75);
    }

    #[test]
    fn test_single_band_rejected() {
        assert!(matches!(BandSet::new(0.0, 1.0, 1), Err(Error::TooFewBands(1))));
        assert!(matches!(BandSet::new(0.0, 1.0, 0), Err(Error::TooFewBands(0))));
    }

    #[test]
    fn test_bad_range_rejected() {
        assert!(matches!(BandSet::new(1.0, 0.0, 4), Err(Error::InvalidRange { .. })));
        assert!(BandSet::new(f64::NEG_INFINITY, 0.0, 4).is_err());
    }

    #[test]
    fn test_flat_range_accepted() {
        let set = BandSet::new(3.0, 3.0, 5).unwrap();
        assert!(set.iter().all(|b| b.min == 3.0 && b.max == 3.0));
    }

    #[test]
    fn test_from_grid_uses_extremes() {
        let grid = Grid::from_fn(3, 3, |i, j| i as f64 - j as f64).unwrap();
        let set = BandSet::from_grid(&grid, 2).unwrap();
        assert_relative_eq!(set.zmin(), -2.0);
        assert_relative_eq!(set.zmax(), 2.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            /// Boundaries and centred levels increase strictly and stay in range.
            #[test]
            fn prop_levels_strictly_increasing(
                zmin in -1.0e6f64..1.0e6,
                span in 1.0e-3f64..1.0e6,
                n in 2usize..200
            ) {
                let zmax = zmin + span;
                let set = BandSet::new(zmin, zmax, n).unwrap();
                let tol = span * 1e-12;

                for w in set.bands().windows(2) {
                    prop_assert!(w[1].min > w[0].min);
                    prop_assert!((w[1].min - w[0].max).abs() <= tol);
                }
                let levels = set.contour_levels();
                prop_assert_eq!(levels.len(), n);
                for w in levels.windows(2) {
                    prop_assert!(w[1] > w[0]);
                }
                for level in &levels {
                    prop_assert!(*level >= zmin && *level <= zmax);
                }
                for band in set.bands() {
                    prop_assert!(band.min >= zmin - tol && band.max <= zmax + tol);
                    prop_assert!((0.0..=1.0).contains(&band.color));
                }
            }
        }
    }
}
