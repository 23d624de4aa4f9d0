use super::{page_path, Device, Pen, TextRun};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::render::{draw_polyline, draw_text, fill_polygon};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
enum Sink {
    Files(PathBuf),
    Memory,
}

/// Renders pages onto a [`Framebuffer`].
///
/// Finished pages are either written as `<stem>-NN.png` or kept in memory.
#[derive(Debug)]
pub struct RasterDevice {
    sink: Sink,
    current: Option<(usize, Framebuffer)>,
    pages: Vec<Framebuffer>,
    written: Vec<PathBuf>,
}

impl RasterDevice {
    /// Write each finished page next to `base`.
    #[must_use]
    pub fn png(base: impl AsRef<Path>) -> Self {
        Self::with_sink(Sink::Files(base.as_ref().to_path_buf()))
    }

    /// Keep finished pages in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_sink(Sink::Memory)
    }

    fn with_sink(sink: Sink) -> Self {
        Self {
            sink,
            current: None,
            pages: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Finished pages held in memory.
    #[must_use]
    pub fn pages(&self) -> &[Framebuffer] {
        &self.pages
    }

    /// Files written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn page(&mut self) -> Result<&mut Framebuffer> {
        self.current
            .as_mut()
            .map(|(_, fb)| fb)
            .ok_or_else(|| Error::Stream("no page open on raster device".into()))
    }
}

impl Device for RasterDevice {
    fn begin_page(&mut self, page: usize, width: u32, height: u32, background: Rgba) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::Stream("raster page already open".into()));
        }
        let mut fb = Framebuffer::new(width, height)?;
        fb.clear(background);
        self.current = Some((page, fb));
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], pen: Pen) -> Result<()> {
        draw_polyline(self.page()?, points, pen.width, pen.color);
        Ok(())
    }

    fn fill(&mut self, polygon: &[Point], color: Rgba) -> Result<()> {
        fill_polygon(self.page()?, polygon, color);
        Ok(())
    }

    fn text(&mut self, run: &TextRun) -> Result<()> {
        draw_text(
            self.page()?,
            run.pos,
            &run.text,
            run.height,
            run.angle,
            run.just,
            run.color,
        );
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let (page, fb) = self
            .current
            .take()
            .ok_or_else(|| Error::Stream("no page open on raster device".into()))?;

        match &self.sink {
            Sink::Files(base) => {
                let path = page_path(base, page, "png");
                write_png(&fb, &path)?;
                info!(
                    path = %path.display(),
                    width = fb.width(),
                    height = fb.height(),
                    "wrote page"
                );
                self.written.push(path);
            }
            Sink::Memory => self.pages.push(fb),
        }
        Ok(())
    }
}

/// Encode one page as 8-bit RGBA.
fn write_png(fb: &Framebuffer, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(writer, fb.width(), fb.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    // Rows are stored padded; the encoder wants them packed.
    encoder
        .write_header()?
        .write_image_data(&fb.to_compact_pixels())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_pages() {
        let mut dev = RasterDevice::in_memory();
        dev.begin_page(1, 20, 10, Rgba::BLACK).unwrap();
        let square = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(0.0, 5.0),
        ];
        dev.fill(&square, Rgba::RED).unwrap();
        dev.end_page().unwrap();

        assert_eq!(dev.pages().len(), 1);
        assert_eq!(dev.pages()[0].count_color(Rgba::RED), 25);
        assert!(dev.written().is_empty());
    }

    #[test]
    fn test_drawing_without_page_fails() {
        let mut dev = RasterDevice::in_memory();
        assert!(matches!(dev.fill(&[], Rgba::RED), Err(Error::Stream(_))));
        assert!(dev.end_page().is_err());
    }

    #[test]
    fn test_double_begin_fails() {
        let mut dev = RasterDevice::in_memory();
        dev.begin_page(1, 4, 4, Rgba::BLACK).unwrap();
        assert!(dev.begin_page(2, 4, 4, Rgba::BLACK).is_err());
    }

    #[test]
    fn test_png_files_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let mut dev = RasterDevice::png(dir.path().join("atlas.png"));
        for page in 1..=2 {
            dev.begin_page(page, 8, 8, Rgba::WHITE).unwrap();
            dev.end_page().unwrap();
        }
        assert_eq!(dev.written().len(), 2);
        assert!(dir.path().join("atlas-01.png").exists());
        assert!(dir.path().join("atlas-02.png").exists());
    }

    #[test]
    fn test_png_page_decodes_with_padded_rows() {
        // Width 13 forces stride padding.
        let dir = tempfile::tempdir().unwrap();
        let mut dev = RasterDevice::png(dir.path().join("page.png"));
        dev.begin_page(1, 13, 7, Rgba::BLACK).unwrap();
        let corner = [
            Point::new(12.0, 6.0),
            Point::new(13.0, 6.0),
            Point::new(13.0, 7.0),
            Point::new(12.0, 7.0),
        ];
        dev.fill(&corner, Rgba::YELLOW).unwrap();
        dev.end_page().unwrap();

        let file = File::open(dir.path().join("page-01.png")).unwrap();
        let mut reader = png::Decoder::new(file).read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (13, 7));

        let last = &buf[(13 * 7 - 1) * 4..13 * 7 * 4];
        assert_eq!(last, &Rgba::YELLOW.to_array());
    }

    #[test]
    fn test_unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut dev = RasterDevice::png(dir.path().join("missing").join("page.png"));
        dev.begin_page(1, 4, 4, Rgba::BLACK).unwrap();
        assert!(matches!(dev.end_page(), Err(Error::Io(_))));
    }
}
