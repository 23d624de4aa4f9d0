//! SVG output encoder.

mod svg;

pub use svg::{SvgElement, SvgEncoder, TextAnchor};
