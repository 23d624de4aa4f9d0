//! Output devices.
//!
//! A [`Device`] receives fully resolved drawing commands in device pixel
//! coordinates (origin top-left, y down). The plot stream owns all world
//! coordinate handling, so a device only has to paint.

mod buffer;
mod null;
mod raster;
mod svg;

pub use buffer::{Command, PlotBuffer};
pub use null::NullDevice;
pub use raster::RasterDevice;
pub use svg::SvgDevice;

use crate::color::Rgba;
use crate::config::DeviceOptions;
use crate::error::Result;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stroke attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    /// Stroke colour.
    pub color: Rgba,
    /// Stroke width in pixels.
    pub width: u32,
}

impl Pen {
    /// A pen of the given colour and width.
    #[must_use]
    pub const fn new(color: Rgba, width: u32) -> Self {
        Self { color, width }
    }
}

/// A positioned run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Anchor point in device pixels.
    pub pos: Point,
    /// Text content.
    pub text: String,
    /// Character height in pixels.
    pub height: f64,
    /// Baseline angle in degrees, counter-clockwise.
    pub angle: f64,
    /// Position of the anchor along the text, `0` start to `1` end.
    pub just: f64,
    /// Text colour.
    pub color: Rgba,
}

/// An output driver.
pub trait Device {
    /// Start page `page` (1-based), cleared to `background`.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be allocated or a page is already
    /// open.
    fn begin_page(&mut self, page: usize, width: u32, height: u32, background: Rgba) -> Result<()>;

    /// Stroke connected segments.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn polyline(&mut self, points: &[Point], pen: Pen) -> Result<()>;

    /// Fill a polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn fill(&mut self, polygon: &[Point], color: Rgba) -> Result<()>;

    /// Draw a text run.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open.
    fn text(&mut self, run: &TextRun) -> Result<()>;

    /// Finish the current page and emit it.
    ///
    /// # Errors
    ///
    /// Returns an error if no page is open or the page cannot be written.
    fn end_page(&mut self) -> Result<()>;

    /// Flush anything still pending. Called once at stream end.
    ///
    /// # Errors
    ///
    /// Returns an error if output cannot be flushed.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn begin_page(&mut self, page: usize, width: u32, height: u32, background: Rgba) -> Result<()> {
        (**self).begin_page(page, width, height, background)
    }

    fn polyline(&mut self, points: &[Point], pen: Pen) -> Result<()> {
        (**self).polyline(points, pen)
    }

    fn fill(&mut self, polygon: &[Point], color: Rgba) -> Result<()> {
        (**self).fill(polygon, color)
    }

    fn text(&mut self, run: &TextRun) -> Result<()> {
        (**self).text(run)
    }

    fn end_page(&mut self) -> Result<()> {
        (**self).end_page()
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Available output drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// One PNG file per page.
    #[default]
    Png,
    /// One SVG file per page.
    Svg,
    /// Discard all output.
    Null,
}

impl DeviceKind {
    /// File extension written by this driver.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Null => "",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// Opens the device selected by `options`.
///
/// # Errors
///
/// Returns an error if the options fail validation.
pub fn open(options: &DeviceOptions) -> Result<Box<dyn Device>> {
    options.validate()?;
    Ok(match options.device {
        DeviceKind::Png => Box::new(RasterDevice::png(&options.output)),
        DeviceKind::Svg => Box::new(SvgDevice::files(&options.output)),
        DeviceKind::Null => Box::new(NullDevice::new()),
    })
}

/// Path of page `page` for output `base`: `dir/<stem>-NN.<ext>`.
#[must_use]
pub fn page_path(base: &Path, page: usize, ext: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .map_or_else(|| "plot".into(), |s| s.to_string_lossy().into_owned());
    base.with_file_name(format!("{stem}-{page:02}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path() {
        assert_eq!(
            page_path(Path::new("out/atlas.png"), 3, "png"),
            PathBuf::from("out/atlas-03.png")
        );
        assert_eq!(
            page_path(Path::new("field"), 12, "svg"),
            PathBuf::from("field-12.svg")
        );
    }

    #[test]
    fn test_open_rejects_invalid_options() {
        let opts = DeviceOptions {
            width: 0,
            ..DeviceOptions::default()
        };
        assert!(open(&opts).is_err());
    }

    #[test]
    fn test_open_null() {
        let opts = DeviceOptions {
            device: DeviceKind::Null,
            ..DeviceOptions::default()
        };
        let mut dev = open(&opts).unwrap();
        dev.begin_page(1, 10, 10, Rgba::BLACK).unwrap();
        dev.end_page().unwrap();
        dev.finish().unwrap();
    }

    #[test]
    fn test_kind_display_and_extension() {
        assert_eq!(DeviceKind::Svg.to_string(), "svg");
        assert_eq!(DeviceKind::Png.extension(), "png");
    }
}
