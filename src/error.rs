//! Error types for shadeplot operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating data or driving a plot stream.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for a page or framebuffer.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Data length mismatch between x and y arrays.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Scale domain error (e.g., a window with zero extent).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A sample grid too small to hold a single cell.
    #[error("Invalid grid: {nx}x{ny} (both dimensions must be at least 2)")]
    InvalidGrid {
        /// Samples along the first index.
        nx: usize,
        /// Samples along the second index.
        ny: usize,
    },

    /// Coordinate mesh dimensions differ from the field dimensions.
    #[error("Mesh is {mesh_nx}x{mesh_ny} but the field is {field_nx}x{field_ny}")]
    MeshMismatch {
        /// Field samples along the first index.
        field_nx: usize,
        /// Field samples along the second index.
        field_ny: usize,
        /// Mesh samples along the first index.
        mesh_nx: usize,
        /// Mesh samples along the second index.
        mesh_ny: usize,
    },

    /// The x and y coordinate grids of a 2-D mesh differ in shape.
    #[error("Mesh x coordinates are {xg_nx}x{xg_ny} but y coordinates are {yg_nx}x{yg_ny}")]
    CoordShapeMismatch {
        /// x grid samples along the first index.
        xg_nx: usize,
        /// x grid samples along the second index.
        xg_ny: usize,
        /// y grid samples along the first index.
        yg_nx: usize,
        /// y grid samples along the second index.
        yg_ny: usize,
    },

    /// Fewer than two contour bands were requested.
    #[error("At least 2 contour bands are required, got {0}")]
    TooFewBands(usize),

    /// A value range that is inverted or not finite.
    #[error("Invalid range: [{min}, {max}]")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Page geometry string could not be parsed.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Plot stream used out of order (drawing without a page, after end, ...).
    #[error("Plot stream error: {0}")]
    Stream(String),
}

impl From<serde_yaml_ng::Error> for Error {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions {
            width: 0,
            height: 100,
        };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch {
            x_len: 10,
            y_len: 20,
        };
        assert!(err.to_string().contains("10"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_mesh_mismatch_names_both_shapes() {
        let err = Error::MeshMismatch {
            field_nx: 35,
            field_ny: 46,
            mesh_nx: 35,
            mesh_ny: 45,
        };
        let msg = err.to_string();
        assert!(msg.contains("35x45"));
        assert!(msg.contains("35x46"));
    }

    #[test]
    fn test_too_few_bands() {
        assert!(Error::TooFewBands(1).to_string().contains("got 1"));
    }
}
