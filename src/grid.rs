//! Two-dimensional sample grids.

use crate::error::{Error, Result};

/// An `nx x ny` array of samples indexed by `(i, j)`.
///
/// Stored with `j` varying fastest. A grid holds at least one cell, so both
/// dimensions are at least 2.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Build a grid by evaluating `f(i, j)` at every sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if either dimension is below 2.
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> f64) -> Result<Self> {
        Self::check_dims(nx, ny)?;
        let mut data = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                data.push(f(i, j));
            }
        }
        Ok(Self { nx, ny, data })
    }

    /// Wrap existing samples laid out with `j` varying fastest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] for dimensions below 2 and
    /// [`Error::DataLengthMismatch`] if `data.len() != nx * ny`.
    pub fn from_vec(nx: usize, ny: usize, data: Vec<f64>) -> Result<Self> {
        Self::check_dims(nx, ny)?;
        if data.len() != nx * ny {
            return Err(Error::DataLengthMismatch {
                x_len: nx * ny,
                y_len: data.len(),
            });
        }
        Ok(Self { nx, ny, data })
    }

    fn check_dims(nx: usize, ny: usize) -> Result<()> {
        if nx < 2 || ny < 2 {
            return Err(Error::InvalidGrid { nx, ny });
        }
        Ok(())
    }

    /// Samples along the first index.
    #[must_use]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// Samples along the second index.
    #[must_use]
    pub const fn ny(&self) -> usize {
        self.ny
    }

    /// `(nx, ny)`.
    #[must_use]
    pub const fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Sample at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.nx && j < self.ny,
            "grid index ({i}, {j}) out of bounds"
        );
        self.data[i * self.ny + j]
    }

    /// All samples, `j` varying fastest.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Minimum and maximum over all finite samples, or `None` if there are none.
    #[must_use]
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut finite = self.data.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;
        let (mut lo, mut hi) = (first, first);
        for v in finite {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        Some((lo, hi))
    }
}
