//! # shadeplot
//!
//! Scientific 2-D plotting demos on a small PLplot-style plot stream.
//!
//! Two renderers are provided:
//!
//! - **Symbol atlas**: every glyph of the extended symbol set, laid out on 17
//!   pages of labelled 10x10 grids.
//! - **Shaded field**: a scalar field drawn as colour-filled contour bands
//!   under identity, separable, non-separable and polar coordinate mappings.
//!
//! Both draw through [`stream::PlotStream`], which owns the page life cycle
//! and the world to device mapping, onto any [`device::Device`]: PNG files
//! rendered on a SIMD-aligned [`framebuffer::Framebuffer`], SVG documents,
//! a recording [`device::PlotBuffer`], or nothing at all.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shadeplot::prelude::*;
//!
//! let options = DeviceOptions { output: "field.png".into(), ..DeviceOptions::default() };
//! let mut pls = PlotStream::open(&options)?;
//! pls.init()?;
//! let passes = ShadedFieldDemo::default().render(&mut pls)?;
//! pls.end()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable parallel processing in trueno

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and colour maps.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives and clipping.
pub mod geometry;

/// Scale functions and axis ticks.
pub mod scale;

// ============================================================================
// Data Modules
// ============================================================================

/// Two-dimensional sample grids.
pub mod grid;

/// Coordinate meshes and grid-index transforms.
pub mod coords;

/// Contour bands and levels.
pub mod levels;

/// Band fill and contour geometry.
pub mod shade;

/// Plot symbols.
pub mod symbols;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of plot primitives.
pub mod render;

/// SVG output encoder.
pub mod output;

/// Output devices.
pub mod device;

/// The plot stream.
pub mod stream;

// ============================================================================
// Application Modules
// ============================================================================

/// Device options and YAML loading.
pub mod config;

/// Command-line options shared by the binaries.
pub mod cli;

/// Symbol atlas and shaded-field renderers.
pub mod demos;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for shadeplot operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use shadeplot::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::color::{Cmap0, Cmap1, Hsla, Rgba};
    pub use crate::config::DeviceOptions;
    pub use crate::coords::{CoordMode, CoordTransform, Mesh1, Mesh2};
    pub use crate::demos::{render_atlas, PassSummary, ShadedFieldDemo};
    pub use crate::device::{Device, DeviceKind, NullDevice, PlotBuffer, RasterDevice, SvgDevice};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::grid::Grid;
    pub use crate::levels::{Band, BandSet};
    pub use crate::shade::Wrap;
    pub use crate::stream::{PlotStream, StreamStats};
    pub use crate::symbols::FontSet;
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
