use super::{Device, Pen, TextRun};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Point;

/// Discards all output. Counts pages so callers can still check progress.
#[derive(Debug, Default)]
pub struct NullDevice {
    pages: usize,
}

impl NullDevice {
    /// Create a null device.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages completed.
    #[must_use]
    pub const fn pages(&self) -> usize {
        self.pages
    }
}

impl Device for NullDevice {
    fn begin_page(
        &mut self,
        _page: usize,
        _width: u32,
        _height: u32,
        _background: Rgba,
    ) -> Result<()> {
        Ok(())
    }

    fn polyline(&mut self, _points: &[Point], _pen: Pen) -> Result<()> {
        Ok(())
    }

    fn fill(&mut self, _polygon: &[Point], _color: Rgba) -> Result<()> {
        Ok(())
    }

    fn text(&mut self, _run: &TextRun) -> Result<()> {
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        self.pages += 1;
        Ok(())
    }
}
