//! SVG output encoder.
//!
//! Vector output for plot pages: filled polygons, polylines and rotated text
//! in device pixel coordinates.

use crate::color::Rgba;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Polyline, or a polygon when `fill` is set
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        fill: Option<Rgba>,
    },
    /// Text, rotated `rotate` degrees counter-clockwise about `(x, y)`
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        rotate: f32,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl TextAnchor {
    /// Nearest anchor for a justification in `[0, 1]`.
    #[must_use]
    pub fn from_just(just: f64) -> Self {
        if just < 0.25 {
            Self::Start
        } else if just > 0.75 {
            Self::End
        } else {
            Self::Middle
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add a polyline.
    #[must_use]
    pub fn polyline(mut self, points: &[(f32, f32)], stroke: Rgba, stroke_width: f32) -> Self {
        self.add_element(SvgElement::Polyline {
            points: points.to_vec(),
            stroke: Some(stroke),
            stroke_width,
            fill: None,
        });
        self
    }

    /// Add a filled polygon.
    #[must_use]
    pub fn polygon(
        mut self,
        points: &[(f32, f32)],
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
    ) -> Self {
        self.add_element(SvgElement::Polyline {
            points: points.to_vec(),
            stroke,
            stroke_width,
            fill: Some(fill),
        });
        self
    }

    /// Add text.
    #[must_use]
    pub fn text(mut self, x: f32, y: f32, text: &str, font_size: f32, fill: Rgba) -> Self {
        self.add_element(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            fill,
            anchor: TextAnchor::Start,
            rotate: 0.0,
        });
        self
    }

    /// Add text with anchor and rotation.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn text_anchored(
        mut self,
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        rotate: f32,
    ) -> Self {
        self.add_element(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            fill,
            anchor,
            rotate,
        });
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Number of elements added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 96);

        // SVG header
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        // Background
        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                rgba_to_css(&bg)
            );
        }

        // Elements
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        // Close SVG
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: &Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            color.r,
            color.g,
            color.b,
            f32::from(color.a) / 255.0
        )
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Polyline {
            points,
            stroke,
            stroke_width,
            fill,
        } => {
            let points_str: String = points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            let fill_attr = fill
                .map(|f| rgba_to_css(&f))
                .unwrap_or_else(|| "none".to_string());
            let stroke_attr = stroke
                .map(|s| {
                    let css = rgba_to_css(&s);
                    format!(r#" stroke="{css}" stroke-width="{stroke_width}""#)
                })
                .unwrap_or_default();
            let tag = if fill.is_some() {
                "polygon"
            } else {
                "polyline"
            };
            format!(r#"<{tag} points="{points_str}" fill="{fill_attr}"{stroke_attr}/>"#)
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
            rotate,
        } => {
            let transform = if *rotate == 0.0 {
                String::new()
            } else {
                // SVG rotates clockwise with y pointing down.
                format!(r#" transform="rotate({} {x} {y})""#, -rotate)
            };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{}" dominant-baseline="central" font-family="monospace"{transform}>{}</text>"#,
                rgba_to_css(fill),
                anchor.as_str(),
                escape_xml(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_encoder_new() {
        let encoder = SvgEncoder::new(800, 600);
        let svg = encoder.render();

        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(encoder.is_empty());
    }

    #[test]
    fn test_svg_polyline() {
        let points = vec![(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)];
        let svg = SvgEncoder::new(100, 100)
            .polyline(&points, Rgba::GREEN, 1.5)
            .render();

        assert!(svg.contains("<polyline"));
        assert!(svg.contains("points=\"0,0 50,100 100,0\""));
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke-width=\"1.5\""));
    }

    #[test]
    fn test_svg_polygon_no_stroke() {
        let points = vec![(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)];
        let svg = SvgEncoder::new(100, 100)
            .polygon(&points, Rgba::RED, None, 1.0)
            .render();

        assert!(svg.contains("<polygon"));
        assert!(svg.contains("fill=\"rgb(255,0,0)\""));
        assert!(!svg.contains("stroke="));
    }

    #[test]
    fn test_svg_text() {
        let svg = SvgEncoder::new(100, 100)
            .text(10.0, 50.0, "Hello", 12.0, Rgba::BLACK)
            .render();

        assert!(svg.contains("<text"));
        assert!(svg.contains("Hello"));
        assert!(svg.contains("font-size=\"12\""));
        assert!(!svg.contains("transform"));
    }

    #[test]
    fn test_svg_rotated_text() {
        let anchor = TextAnchor::Middle;
        let svg = SvgEncoder::new(100, 100)
            .text_anchored(20.0, 50.0, "y", 12.0, Rgba::BLACK, anchor, 90.0)
            .render();

        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("transform=\"rotate(-90 20 50)\""));
    }

    #[test]
    fn test_svg_text_escaping() {
        let svg = SvgEncoder::new(100, 100)
            .text(10.0, 50.0, "<b> & \"q\"", 12.0, Rgba::BLACK)
            .render();

        assert!(!svg.contains("<b>"));
        assert!(svg.contains("&lt;b&gt;"));
        assert!(svg.contains("&amp;"));
        assert!(svg.contains("&quot;"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100, 100).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let css = rgba_to_css(&Rgba::new(255, 0, 0, 128));
        assert!(css.contains("rgba"));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_anchor_from_just() {
        assert_eq!(TextAnchor::from_just(0.0), TextAnchor::Start);
        assert_eq!(TextAnchor::from_just(0.5), TextAnchor::Middle);
        assert_eq!(TextAnchor::from_just(1.0), TextAnchor::End);
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.svg");
        let triangle = [(10.0, 10.0), (80.0, 10.0), (50.0, 80.0)];
        SvgEncoder::new(100, 100)
            .polygon(&triangle, Rgba::BLUE, None, 0.0)
            .write_to_file(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("</svg>"));
    }
}
