use super::{Device, Pen, TextRun};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::Point;

/// A recorded device command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// [`Device::begin_page`].
    BeginPage {
        /// Page number.
        page: usize,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Background colour.
        background: Rgba,
    },
    /// [`Device::polyline`].
    Polyline {
        /// Vertices.
        points: Vec<Point>,
        /// Stroke.
        pen: Pen,
    },
    /// [`Device::fill`].
    Fill {
        /// Vertices.
        polygon: Vec<Point>,
        /// Fill colour.
        color: Rgba,
    },
    /// [`Device::text`].
    Text(TextRun),
    /// [`Device::end_page`].
    EndPage,
    /// [`Device::finish`].
    Finish,
}

/// Records device commands for later replay.
///
/// Recording never fails; ordering errors surface when the commands are
/// replayed onto a real device.
#[derive(Debug, Clone, Default)]
pub struct PlotBuffer {
    commands: Vec<Command>,
}

impl PlotBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded commands in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded fills.
    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Fill { .. }))
            .count()
    }

    /// Number of recorded pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::BeginPage { .. }))
            .count()
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Send every recorded command to `device`, in order.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `device`.
    pub fn replay(&self, device: &mut dyn Device) -> Result<()> {
        for command in &self.commands {
            match command {
                Command::BeginPage {
                    page,
                    width,
                    height,
                    background,
                } => {
                    device.begin_page(*page, *width, *height, *background)?;
                }
                Command::Polyline { points, pen } => device.polyline(points, *pen)?,
                Command::Fill { polygon, color } => device.fill(polygon, *color)?,
                Command::Text(run) => device.text(run)?,
                Command::EndPage => device.end_page()?,
                Command::Finish => device.finish()?,
            }
        }
        Ok(())
    }
}

impl Device for PlotBuffer {
    fn begin_page(&mut self, page: usize, width: u32, height: u32, background: Rgba) -> Result<()> {
        self.commands.push(Command::BeginPage {
            page,
            width,
            height,
            background,
        });
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], pen: Pen) -> Result<()> {
        self.commands.push(Command::Polyline {
            points: points.to_vec(),
            pen,
        });
        Ok(())
    }

    fn fill(&mut self, polygon: &[Point], color: Rgba) -> Result<()> {
        self.commands.push(Command::Fill {
            polygon: polygon.to_vec(),
            color,
        });
        Ok(())
    }

    fn text(&mut self, run: &TextRun) -> Result<()> {
        self.commands.push(Command::Text(run.clone()));
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        self.commands.push(Command::EndPage);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.commands.push(Command::Finish);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::RasterDevice;

    fn record() -> PlotBuffer {
        let mut buf = PlotBuffer::new();
        buf.begin_page(1, 16, 16, Rgba::BLACK).unwrap();
        let triangle = [
            Point::new(2.0, 2.0),
            Point::new(10.0, 2.0),
            Point::new(10.0, 10.0),
        ];
        buf.fill(&triangle, Rgba::RED).unwrap();
        let rule = [Point::new(0.5, 12.5), Point::new(15.5, 12.5)];
        buf.polyline(&rule, Pen::new(Rgba::WHITE, 1)).unwrap();
        buf.end_page().unwrap();
        buf
    }

    #[test]
    fn test_counts() {
        let buf = record();
        assert_eq!(buf.commands().len(), 4);
        assert_eq!(buf.fill_count(), 1);
        assert_eq!(buf.page_count(), 1);
    }

    #[test]
    fn test_replay_onto_raster() {
        let buf = record();
        let mut dev = RasterDevice::in_memory();
        buf.replay(&mut dev).unwrap();

        let page = &dev.pages()[0];
        assert!(page.count_color(Rgba::RED) > 0);
        assert_eq!(page.count_color(Rgba::WHITE), 16);
    }

    #[test]
    fn test_replay_surfaces_ordering_errors() {
        let mut buf = PlotBuffer::new();
        buf.end_page().unwrap();
        assert!(buf.replay(&mut RasterDevice::in_memory()).is_err());

        buf.clear();
        assert!(buf.commands().is_empty());
    }
}
