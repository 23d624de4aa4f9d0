//! Rasterization of plot primitives.
//!
//! # Algorithms
//!
//! - **Bresenham's Line**: integer line walking, with a square brush for wide pens
//! - **Scanline Fill**: even-odd polygon fill sampled at pixel centres
//! - **Bitmap Text**: a 5x7 font drawn as scaled, rotated cell quads
//!
//! # References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;
mod text;

pub use primitives::{draw_line, draw_polyline, draw_segment, fill_polygon};
pub use text::{draw_text, text_width};
