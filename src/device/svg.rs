use super::{page_path, Device, Pen, TextRun};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::output::{SvgElement, SvgEncoder, TextAnchor};
use std::path::{Path, PathBuf};
use tracing::info;

/// Vector output, one SVG document per page.
///
/// Rendered documents are kept in memory; with a file base they are also
/// written as `<stem>-NN.svg`.
#[derive(Debug, Default)]
pub struct SvgDevice {
    base: Option<PathBuf>,
    current: Option<(usize, SvgEncoder)>,
    documents: Vec<String>,
    written: Vec<PathBuf>,
}

fn to_svg_points(points: &[Point]) -> Vec<(f32, f32)> {
    points.iter().map(|p| (p.x as f32, p.y as f32)).collect()
}

impl SvgDevice {
    /// Write each finished page next to `base`.
    #[must_use]
    pub fn files(base: impl AsRef<Path>) -> Self {
        Self {
            base: Some(base.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Keep documents in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Rendered documents, one per finished page.
    #[must_use]
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// Files written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn page(&mut self) -> Result<&mut SvgEncoder> {
        self.current
            .as_mut()
            .map(|(_, svg)| svg)
            .ok_or_else(|| Error::Stream("no page open on svg device".into()))
    }
}

impl Device for SvgDevice {
    fn begin_page(&mut self, page: usize, width: u32, height: u32, background: Rgba) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::Stream("svg page already open".into()));
        }
        let encoder = SvgEncoder::new(width, height).background(Some(background));
        self.current = Some((page, encoder));
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], pen: Pen) -> Result<()> {
        self.page()?.add_element(SvgElement::Polyline {
            points: to_svg_points(points),
            stroke: Some(pen.color),
            stroke_width: pen.width as f32,
            fill: None,
        });
        Ok(())
    }

    fn fill(&mut self, polygon: &[Point], color: Rgba) -> Result<()> {
        // A hairline in the fill colour hides anti-aliasing seams between bands.
        self.page()?.add_element(SvgElement::Polyline {
            points: to_svg_points(polygon),
            stroke: Some(color),
            stroke_width: 0.5,
            fill: Some(color),
        });
        Ok(())
    }

    fn text(&mut self, run: &TextRun) -> Result<()> {
        self.page()?.add_element(SvgElement::Text {
            x: run.pos.x as f32,
            y: run.pos.y as f32,
            text: run.text.clone(),
            font_size: run.height as f32,
            fill: run.color,
            anchor: TextAnchor::from_just(run.just),
            rotate: run.angle as f32,
        });
        Ok(())
    }

    fn end_page(&mut self) -> Result<()> {
        let (page, svg) = self
            .current
            .take()
            .ok_or_else(|| Error::Stream("no page open on svg device".into()))?;

        if let Some(base) = &self.base {
            let path = page_path(base, page, "svg");
            svg.write_to_file(&path)?;
            info!(path = %path.display(), "wrote page");
            self.written.push(path);
        }
        self.documents.push(svg.render());
        Ok(())
    }
}
