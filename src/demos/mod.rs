//! The two demo renderers and their synthetic data.
//!
//! - [`atlas`]: every glyph of the extended symbol set on 17 labelled pages.
//! - [`shaded`]: a scalar field as filled contour bands under identity,
//!   separable, non-separable and polar coordinate mappings.

pub mod atlas;
pub mod fields;
pub mod shaded;

pub use atlas::{render_atlas, AtlasPage, ATLAS_TITLE, SYMBOL_BASES};
pub use shaded::{PassSummary, ShadedFieldDemo};
