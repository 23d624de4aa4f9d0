//! The plot stream.
//!
//! A [`PlotStream`] owns the drawing state of one output: the page life
//! cycle, the viewport and window, pen and colour maps, character and symbol
//! sizes. World coordinates are mapped through the window onto the viewport
//! (normalised page coordinates, y up) and from there onto device pixels
//! (y down) before anything reaches the [`Device`].
//!
//! ```text
//! Created --init--> Ready --adv--> PageOpen --eop--> Ready --end--> Finished
//!                              ^------adv------'
//! ```

use crate::color::{Cmap0, Cmap1, Rgba};
use crate::config::DeviceOptions;
use crate::coords::CoordTransform;
use crate::device::{self, Device, Pen, TextRun};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};
use crate::grid::Grid;
use crate::scale::{LinearScale, Scale, Ticks};
use crate::shade::{band_polygons, contour_segments, Wrap};
use crate::symbols::{glyph, FontSet};
use tracing::{debug, info, trace};

/// Default character height as a fraction of the page height.
const CHAR_HEIGHT: f64 = 0.02;
/// Default symbol height as a fraction of the page height.
const SYMBOL_HEIGHT: f64 = 0.03;

/// Life-cycle state of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Constructed, not yet initialised.
    Created,
    /// Initialised, between pages.
    Ready,
    /// A page is open for drawing.
    PageOpen,
    /// Ended; no further commands are accepted.
    Finished,
}

/// Counters accumulated over the life of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Pages started.
    pub pages: usize,
    /// Calls to [`PlotStream::shade`].
    pub shade_calls: usize,
    /// Polygons sent to the device by `shade`.
    pub polygons_filled: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Bottom,
    Top,
    Left,
    Right,
}

/// Parsed `box_axes` option letters for one axis.
#[derive(Debug, Clone, Copy, Default)]
struct AxisOptions {
    low_edge: bool,
    high_edge: bool,
    grid: bool,
    major: bool,
    minor: bool,
    label_low: bool,
    label_high: bool,
    horizontal: bool,
}

impl AxisOptions {
    fn parse(opt: &str) -> Self {
        let mut out = Self::default();
        for ch in opt.chars() {
            match ch.to_ascii_lowercase() {
                'b' => out.low_edge = true,
                'c' => out.high_edge = true,
                'g' => out.grid = true,
                't' => out.major = true,
                's' => out.minor = true,
                'n' => out.label_low = true,
                'm' => out.label_high = true,
                'v' => out.horizontal = true,
                other => debug!(option = %other, "ignoring unknown axis option"),
            }
        }
        out
    }
}

/// Drawing state of one plot output.
#[derive(Debug)]
pub struct PlotStream<D: Device = Box<dyn Device>> {
    device: D,
    state: StreamState,
    width: u32,
    height: u32,
    page: usize,
    cmap0: Cmap0,
    cmap1: Cmap1,
    color: Rgba,
    pen_width: u32,
    char_height: f64,
    symbol_height: f64,
    base_char_height: f64,
    base_symbol_height: f64,
    font_set: FontSet,
    edge_width: u32,
    viewport: Rect,
    window: Rect,
    x_map: LinearScale,
    y_map: LinearScale,
    stats: StreamStats,
}

impl PlotStream<Box<dyn Device>> {
    /// Open the device selected by `options` and wrap it in a stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the options fail validation.
    pub fn open(options: &DeviceOptions) -> Result<Self> {
        let device = device::open(options)?;
        Self::new(device, options)
    }
}

impl<D: Device> PlotStream<D> {
    /// Create a stream drawing onto `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if `options` fail validation.
    pub fn new(device: D, options: &DeviceOptions) -> Result<Self> {
        options.validate()?;
        let mut cmap0 = Cmap0::default();
        cmap0.set_background(options.background_color()?);

        let base_char_height = f64::from(options.height) * CHAR_HEIGHT * options.char_scale;
        let base_symbol_height = f64::from(options.height) * SYMBOL_HEIGHT;
        let unit = (0.0, 1.0);
        let mut stream = Self {
            device,
            state: StreamState::Created,
            width: options.width,
            height: options.height,
            page: 0,
            color: cmap0.get(1),
            cmap0,
            cmap1: Cmap1::default(),
            pen_width: 1,
            char_height: base_char_height,
            symbol_height: base_symbol_height,
            base_char_height,
            base_symbol_height,
            font_set: FontSet::Standard,
            edge_width: 0,
            viewport: Rect::unit(),
            window: Rect::unit(),
            x_map: LinearScale::new(unit, unit)?,
            y_map: LinearScale::new(unit, unit)?,
            stats: StreamStats::default(),
        };
        stream.vpor(0.0, 1.0, 0.0, 1.0)?;
        Ok(stream)
    }

    // ------------------------------------------------------------------
    // Life cycle
    // ------------------------------------------------------------------

    /// Initialise the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if the stream was already initialised.
    pub fn init(&mut self) -> Result<()> {
        if self.state != StreamState::Created {
            return Err(Error::Stream("init called twice".into()));
        }
        self.state = StreamState::Ready;
        info!(
            width = self.width,
            height = self.height,
            "plot stream initialised"
        );
        Ok(())
    }

    /// Select the symbol set used by [`PlotStream::sym`].
    pub fn font_load(&mut self, set: FontSet) {
        debug!(?set, "loading symbol set");
        self.font_set = set;
    }

    /// Advance to a new page, closing the current one first.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not initialised or the device fails.
    pub fn adv(&mut self) -> Result<()> {
        match self.state {
            StreamState::PageOpen => self.eop()?,
            StreamState::Ready => {}
            StreamState::Created | StreamState::Finished => {
                return Err(Error::Stream(format!("adv in state {:?}", self.state)));
            }
        }
        self.page += 1;
        let background = self.cmap0.background();
        self.device
            .begin_page(self.page, self.width, self.height, background)?;
        self.state = StreamState::PageOpen;
        self.stats.pages += 1;
        debug!(page = self.page, "page advanced");
        Ok(())
    }

    /// End the current page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if no page is open.
    pub fn eop(&mut self) -> Result<()> {
        self.require_page("eop")?;
        // The device gives up the page even when writing it fails.
        self.state = StreamState::Ready;
        self.device.end_page()
    }

    /// Close any open page and finish the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream was never initialised or already ended.
    pub fn end(&mut self) -> Result<()> {
        match self.state {
            StreamState::PageOpen => self.eop()?,
            StreamState::Ready => {}
            StreamState::Created | StreamState::Finished => {
                return Err(Error::Stream(format!("end in state {:?}", self.state)));
            }
        }
        self.device.finish()?;
        self.state = StreamState::Finished;
        info!(
            pages = self.stats.pages,
            shade_calls = self.stats.shade_calls,
            "plot stream ended"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Viewport and window
    // ------------------------------------------------------------------

    /// Set the viewport in normalised page coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] unless `0 <= min < max <= 1` on both axes.
    pub fn vpor(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<()> {
        let in_page = |lo: f64, hi: f64| lo >= 0.0 && hi <= 1.0 && lo < hi;
        if !(in_page(xmin, xmax) && in_page(ymin, ymax)) {
            return Err(Error::ScaleDomain(format!(
                "viewport ({xmin}, {xmax}, {ymin}, {ymax}) is outside the page"
            )));
        }
        self.viewport = Rect::new(xmin, xmax, ymin, ymax);
        self.update_maps()
    }

    /// Set a standard viewport leaving room for axis labels and a title.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] if the characters are too large to
    /// leave any plot area.
    pub fn vsta(&mut self) -> Result<()> {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let (cw, ch) = (self.char_height / w, self.char_height / h);
        self.vpor(9.0 * cw, 1.0 - 4.0 * cw, 5.0 * ch, 1.0 - 4.0 * ch)
    }

    /// Set the world window mapped onto the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] for a window with zero extent or
    /// non-finite bounds.
    pub fn wind(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<()> {
        let x = LinearScale::new((xmin, xmax), (0.0, 1.0))?;
        let y = LinearScale::new((ymin, ymax), (0.0, 1.0))?;
        self.window = Rect::new(xmin, xmax, ymin, ymax);
        self.x_map = x;
        self.y_map = y;
        self.update_maps()
    }

    /// Start a page with a standard viewport, the given window and a boxed
    /// frame with numeric labels.
    ///
    /// # Errors
    ///
    /// As [`PlotStream::adv`], [`PlotStream::wind`] and [`PlotStream::box_axes`].
    pub fn env(&mut self, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<()> {
        self.adv()?;
        self.vsta()?;
        self.wind(xmin, xmax, ymin, ymax)?;
        self.box_axes("bcnst", 0.0, 0, "bcnstv", 0.0, 0)
    }

    fn update_maps(&mut self) -> Result<()> {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let (wx0, wx1) = self.x_map.domain();
        let (wy0, wy1) = self.y_map.domain();
        let vp = self.viewport;
        self.x_map = LinearScale::new((wx0, wx1), (vp.xmin * w, vp.xmax * w))?;
        self.y_map = LinearScale::new((wy0, wy1), ((1.0 - vp.ymin) * h, (1.0 - vp.ymax) * h))?;
        Ok(())
    }

    /// Device position of a world point.
    #[must_use]
    pub fn to_device(&self, p: Point) -> Point {
        Point::new(self.x_map.scale(p.x), self.y_map.scale(p.y))
    }

    /// Viewport bounds in device pixels as `(left, right, top, bottom)`.
    fn viewport_px(&self) -> (f64, f64, f64, f64) {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let vp = self.viewport;
        (vp.xmin * w, vp.xmax * w, (1.0 - vp.ymax) * h, (1.0 - vp.ymin) * h)
    }

    // ------------------------------------------------------------------
    // Pen, colour and sizes
    // ------------------------------------------------------------------

    /// Select a cmap0 colour.
    pub fn col0(&mut self, index: usize) {
        self.color = self.cmap0.get(index);
    }

    /// Select a cmap1 colour by position in `[0, 1]`.
    pub fn col1(&mut self, pos: f64) {
        self.color = self.cmap1.color(pos);
    }

    /// Replace the continuous colour map.
    pub fn set_cmap1(&mut self, cmap: Cmap1) {
        self.cmap1 = cmap;
    }

    /// Set the pen width in pixels. Zero is treated as one.
    pub fn width(&mut self, width: u32) {
        self.pen_width = width.max(1);
    }

    /// Scale the character height relative to its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] for a non-positive scale.
    pub fn schr(&mut self, scale: f64) -> Result<()> {
        self.char_height = self.base_char_height * positive_scale(scale)?;
        Ok(())
    }

    /// Scale the symbol height relative to its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] for a non-positive scale.
    pub fn ssym(&mut self, scale: f64) -> Result<()> {
        self.symbol_height = self.base_symbol_height * positive_scale(scale)?;
        Ok(())
    }

    /// Draw band boundaries in `shade` with the given width; zero disables.
    pub fn shade_edges(&mut self, width: u32) {
        self.edge_width = width;
    }

    fn pen(&self) -> Pen {
        Pen::new(self.color, self.pen_width)
    }

    // ------------------------------------------------------------------
    // Axes and text
    // ------------------------------------------------------------------

    /// Draw a frame, ticks, grid and numeric labels around the viewport.
    ///
    /// A tick spacing of zero picks a 1/2/5 step; a subdivision count of zero
    /// picks an automatic count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if no page is open.
    pub fn box_axes(
        &mut self,
        xopt: &str,
        xtick: f64,
        nxsub: u32,
        yopt: &str,
        ytick: f64,
        nysub: u32,
    ) -> Result<()> {
        self.require_page("box_axes")?;
        let x = AxisOptions::parse(xopt);
        let y = AxisOptions::parse(yopt);
        let (left, right, top, bottom) = self.viewport_px();
        let major_len = 0.5 * self.char_height;
        let minor_len = 0.25 * self.char_height;
        let pen = self.pen();

        let edges = [
            (x.low_edge, [Point::new(left, bottom), Point::new(right, bottom)]),
            (x.high_edge, [Point::new(left, top), Point::new(right, top)]),
            (y.low_edge, [Point::new(left, top), Point::new(left, bottom)]),
            (y.high_edge, [Point::new(right, top), Point::new(right, bottom)]),
        ];
        for (on, edge) in edges {
            if on {
                self.device.polyline(&edge, pen)?;
            }
        }

        let win = self.window;
        let x_ticks = Ticks::compute(win.xmin, win.xmax, xtick, nxsub);
        for (ticks, minor) in [(&x_ticks.major, false), (&x_ticks.minor, true)] {
            if (minor && !x.minor) || (!minor && !x.major && !x.grid) {
                continue;
            }
            let len = if minor { minor_len } else { major_len };
            for &v in ticks {
                let px = self.x_map.scale(v);
                if !minor && x.grid {
                    let rule = [Point::new(px, top), Point::new(px, bottom)];
                    self.device.polyline(&rule, pen)?;
                }
                if minor || x.major {
                    if x.low_edge {
                        let tick = [Point::new(px, bottom), Point::new(px, bottom - len)];
                        self.device.polyline(&tick, pen)?;
                    }
                    if x.high_edge {
                        let tick = [Point::new(px, top), Point::new(px, top + len)];
                        self.device.polyline(&tick, pen)?;
                    }
                }
            }
        }

        let y_ticks = Ticks::compute(win.ymin, win.ymax, ytick, nysub);
        for (ticks, minor) in [(&y_ticks.major, false), (&y_ticks.minor, true)] {
            if (minor && !y.minor) || (!minor && !y.major && !y.grid) {
                continue;
            }
            let len = if minor { minor_len } else { major_len };
            for &v in ticks {
                let py = self.y_map.scale(v);
                if !minor && y.grid {
                    let rule = [Point::new(left, py), Point::new(right, py)];
                    self.device.polyline(&rule, pen)?;
                }
                if minor || y.major {
                    if y.low_edge {
                        let tick = [Point::new(left, py), Point::new(left + len, py)];
                        self.device.polyline(&tick, pen)?;
                    }
                    if y.high_edge {
                        let tick = [Point::new(right, py), Point::new(right - len, py)];
                        self.device.polyline(&tick, pen)?;
                    }
                }
            }
        }

        let x_frac = |v: f64| (v - win.xmin) / win.width();
        let y_frac = |v: f64| (v - win.ymin) / win.height();
        for &v in &x_ticks.major {
            let label = x_ticks.label(v);
            if x.label_low {
                self.place_text(Side::Bottom, false, 1.5, x_frac(v), 0.5, &label)?;
            }
            if x.label_high {
                self.place_text(Side::Top, false, 1.5, x_frac(v), 0.5, &label)?;
            }
        }
        for &v in &y_ticks.major {
            let label = y_ticks.label(v);
            let pos = y_frac(v);
            let (disp, low_just, high_just) = if y.horizontal {
                (1.0, 1.0, 0.0)
            } else {
                (1.5, 0.5, 0.5)
            };
            if y.label_low {
                self.place_text(Side::Left, y.horizontal, disp, pos, low_just, &label)?;
            }
            if y.label_high {
                self.place_text(Side::Right, y.horizontal, disp, pos, high_just, &label)?;
            }
        }
        Ok(())
    }

    /// Write text relative to a viewport edge.
    ///
    /// `side` starts with `b`, `t`, `l` or `r`; a `v` makes left/right text
    /// horizontal. `disp` is the outward distance in character heights, `pos`
    /// the fraction along the edge and `just` the justification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if no page is open or `side` is not
    /// recognised.
    pub fn mtex(&mut self, side: &str, disp: f64, pos: f64, just: f64, text: &str) -> Result<()> {
        self.require_page("mtex")?;
        let lower = side.to_ascii_lowercase();
        let edge = match lower.chars().next() {
            Some('b') => Side::Bottom,
            Some('t') => Side::Top,
            Some('l') => Side::Left,
            Some('r') => Side::Right,
            _ => return Err(Error::Stream(format!("unknown mtex side {side:?}"))),
        };
        self.place_text(edge, lower.contains('v'), disp, pos, just, text)
    }

    fn place_text(
        &mut self,
        side: Side,
        horizontal: bool,
        disp: f64,
        pos: f64,
        just: f64,
        text: &str,
    ) -> Result<()> {
        let (left, right, top, bottom) = self.viewport_px();
        let offset = disp * self.char_height;
        let along_x = left + pos * (right - left);
        let along_y = bottom - pos * (bottom - top);
        let side_angle = if horizontal { 0.0 } else { 90.0 };

        let (anchor, angle) = match side {
            Side::Bottom => (Point::new(along_x, bottom + offset), 0.0),
            Side::Top => (Point::new(along_x, top - offset), 0.0),
            Side::Left => (Point::new(left - offset, along_y), side_angle),
            Side::Right => (Point::new(right + offset, along_y), side_angle),
        };

        self.device.text(&TextRun {
            pos: anchor,
            text: text.to_string(),
            height: self.char_height,
            angle,
            just,
            color: self.color,
        })
    }

    /// Label the x axis, the y axis and the plot title.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if no page is open.
    pub fn lab(&mut self, xlabel: &str, ylabel: &str, title: &str) -> Result<()> {
        self.mtex("b", 3.2, 0.5, 0.5, xlabel)?;
        self.mtex("l", 5.0, 0.5, 0.5, ylabel)?;
        self.mtex("t", 2.0, 0.5, 0.5, title)
    }

    // ------------------------------------------------------------------
    // Data primitives
    // ------------------------------------------------------------------

    /// Draw glyph `code` at every `(xs[k], ys[k])`.
    ///
    /// Codes outside the loaded symbol set draw nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::DataLengthMismatch`] if `xs` and `ys` differ in length.
    /// - [`Error::Stream`] if no page is open.
    pub fn sym(&mut self, xs: &[f64], ys: &[f64], code: u32) -> Result<()> {
        check_lengths(xs, ys)?;
        self.require_page("sym")?;
        let Some(g) = glyph(code, self.font_set) else {
            debug!(code, set = ?self.font_set, "glyph code outside loaded set");
            return Ok(());
        };

        let r = self.symbol_height / 2.0;
        let pen = self.pen();
        for (&x, &y) in xs.iter().zip(ys) {
            let c = self.to_device(Point::new(x, y));
            for stroke in &g.strokes {
                let points: Vec<Point> = stroke
                    .iter()
                    .map(|&(gx, gy)| Point::new(c.x + gx * r, c.y - gy * r))
                    .collect();
                self.device.polyline(&points, pen)?;
            }
        }
        Ok(())
    }

    /// Draw a polyline through `(xs[k], ys[k])`, clipped to the window.
    ///
    /// # Errors
    ///
    /// - [`Error::DataLengthMismatch`] if `xs` and `ys` differ in length.
    /// - [`Error::Stream`] if no page is open.
    pub fn line(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        check_lengths(xs, ys)?;
        self.require_page("line")?;
        let points: Vec<Point> = xs.iter().zip(ys).map(|(&x, &y)| Point::new(x, y)).collect();
        let pen = self.pen();
        for run in clipped_runs(&points, &self.window) {
            let device: Vec<Point> = run.iter().map(|&p| self.to_device(p)).collect();
            self.device.polyline(&device, pen)?;
        }
        Ok(())
    }

    /// Fill the region `lo <= z <= hi` with the cmap1 colour at `color`.
    ///
    /// Returns the number of polygons sent to the device.
    ///
    /// # Errors
    ///
    /// - [`Error::Stream`] if no page is open.
    /// - [`Error::MeshMismatch`] if the transform does not fit the field.
    pub fn shade(
        &mut self,
        z: &Grid,
        lo: f64,
        hi: f64,
        color: f64,
        transform: &CoordTransform<'_>,
        wrap: Wrap,
    ) -> Result<usize> {
        self.require_page("shade")?;
        let polygons = band_polygons(z, lo, hi, transform, wrap)?;
        let fill = self.cmap1.color(color);

        let mut filled = 0;
        for polygon in &polygons {
            let clipped = self.window.clip_polygon(polygon);
            if clipped.len() < 3 {
                continue;
            }
            let device: Vec<Point> = clipped.iter().map(|&p| self.to_device(p)).collect();
            self.device.fill(&device, fill)?;
            filled += 1;
        }

        if self.edge_width > 0 {
            let pen = Pen::new(self.color, self.edge_width);
            for level in [lo, hi] {
                let segments = contour_segments(z, level, transform, wrap)?;
                self.draw_segments(&segments, pen)?;
            }
        }

        self.stats.shade_calls += 1;
        self.stats.polygons_filled += filled;
        trace!(lo, hi, color, filled, "shaded band");
        Ok(filled)
    }

    /// Draw contour lines of `z` at each level with the current pen.
    ///
    /// Returns the number of segments drawn.
    ///
    /// # Errors
    ///
    /// - [`Error::Stream`] if no page is open.
    /// - [`Error::MeshMismatch`] if the transform does not fit the field.
    pub fn cont(
        &mut self,
        z: &Grid,
        levels: &[f64],
        transform: &CoordTransform<'_>,
        wrap: Wrap,
    ) -> Result<usize> {
        self.require_page("cont")?;
        let pen = self.pen();
        let mut drawn = 0;
        for &level in levels {
            let segments = contour_segments(z, level, transform, wrap)?;
            drawn += self.draw_segments(&segments, pen)?;
        }
        trace!(levels = levels.len(), drawn, "contoured field");
        Ok(drawn)
    }

    fn draw_segments(&mut self, segments: &[(Point, Point)], pen: Pen) -> Result<usize> {
        let mut drawn = 0;
        for &(a, b) in segments {
            if let Some((a, b)) = self.window.clip_segment(a, b) {
                let pair = [self.to_device(a), self.to_device(b)];
                self.device.polyline(&pair, pen)?;
                drawn += 1;
            }
        }
        Ok(drawn)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Current life-cycle state.
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Number of the current (or last) page, starting at 1.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Character height in pixels.
    #[must_use]
    pub const fn char_height(&self) -> f64 {
        self.char_height
    }

    /// Symbol height in pixels.
    #[must_use]
    pub const fn symbol_height(&self) -> f64 {
        self.symbol_height
    }

    /// Current pen colour.
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// The underlying device.
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Consume the stream and return its device.
    #[must_use]
    pub fn into_device(self) -> D {
        self.device
    }

    fn require_page(&self, op: &str) -> Result<()> {
        if self.state == StreamState::PageOpen {
            Ok(())
        } else {
            Err(Error::Stream(format!("{op} requires an open page (state {:?})", self.state)))
        }
    }
}

fn positive_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(Error::ScaleDomain(format!("size scale must be positive, got {scale}")))
    }
}

fn check_lengths(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() == ys.len() {
        Ok(())
    } else {
        Err(Error::DataLengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        })
    }
}

/// Split a polyline into the connected runs that survive clipping.
fn clipped_runs(points: &[Point], rect: &Rect) -> Vec<Vec<Point>> {
    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for pair in points.windows(2) {
        match rect.clip_segment(pair[0], pair[1]) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(a);
                }
                current.push(b);
            }
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Command, PlotBuffer, RasterDevice};
    use approx::assert_relative_eq;

    fn options(width: u32, height: u32) -> DeviceOptions {
        DeviceOptions {
            width,
            height,
            ..DeviceOptions::default()
        }
    }

    fn recording() -> PlotStream<PlotBuffer> {
        let mut pls = PlotStream::new(PlotBuffer::new(), &options(200, 100)).unwrap();
        pls.init().unwrap();
        pls
    }

    #[test]
    fn test_life_cycle() {
        let mut pls = PlotStream::new(PlotBuffer::new(), &options(100, 100)).unwrap();
        assert_eq!(pls.state(), StreamState::Created);
        assert!(pls.adv().is_err());

        pls.init().unwrap();
        assert!(pls.init().is_err());
        pls.adv().unwrap();
        pls.adv().unwrap();
        assert_eq!(pls.page(), 2);
        pls.end().unwrap();
        assert_eq!(pls.state(), StreamState::Finished);
        assert!(pls.adv().is_err());
        assert!(pls.end().is_err());

        let buf = pls.into_device();
        let ends = buf
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::EndPage))
            .count();
        assert_eq!(ends, 2);
        assert_eq!(buf.commands().last(), Some(&Command::Finish));
    }

    #[test]
    fn test_failed_page_write_closes_page() {
        let dir = tempfile::tempdir().unwrap();
        let device = RasterDevice::png(dir.path().join("missing").join("page.png"));
        let mut pls = PlotStream::new(device, &options(16, 16)).unwrap();
        pls.init().unwrap();
        pls.adv().unwrap();

        assert!(matches!(pls.eop(), Err(Error::Io(_))));
        assert_eq!(pls.state(), StreamState::Ready);
        pls.end().unwrap();
        assert_eq!(pls.state(), StreamState::Finished);
    }

    #[test]
    fn test_drawing_requires_page() {
        let mut pls = recording();
        assert!(matches!(pls.line(&[0.0, 1.0], &[0.0, 1.0]), Err(Error::Stream(_))));
        assert!(matches!(pls.mtex("t", 1.0, 0.5, 0.5, "x"), Err(Error::Stream(_))));
        assert!(pls.eop().is_err());
    }

    #[test]
    fn test_world_to_device_mapping() {
        let mut pls = recording();
        pls.vpor(0.1, 0.9, 0.2, 0.8).unwrap();
        pls.wind(-1.0, 1.0, 0.0, 10.0).unwrap();

        let lo = pls.to_device(Point::new(-1.0, 0.0));
        let hi = pls.to_device(Point::new(1.0, 10.0));
        assert_relative_eq!(lo.x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(lo.y, 80.0, epsilon = 1e-9);
        assert_relative_eq!(hi.x, 180.0, epsilon = 1e-9);
        assert_relative_eq!(hi.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_viewport_and_window() {
        let mut pls = recording();
        assert!(pls.vpor(0.5, 0.5, 0.0, 1.0).is_err());
        assert!(pls.vpor(-0.1, 0.5, 0.0, 1.0).is_err());
        assert!(pls.wind(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(pls.schr(0.0).is_err());
        assert!(pls.ssym(-1.0).is_err());
    }

    #[test]
    fn test_pen_from_cmap1_and_width() {
        use crate::color::{ControlPoint, Hsla};

        let ramp = Cmap1::new(vec![
            ControlPoint {
                pos: 0.0,
                color: Hsla::hsl(120.0, 1.0, 0.2),
            },
            ControlPoint {
                pos: 1.0,
                color: Hsla::hsl(120.0, 1.0, 0.8),
            },
        ])
        .unwrap();
        let expected = ramp.color(0.3);

        let mut pls = recording();
        pls.set_cmap1(ramp);
        pls.col1(0.3);
        pls.width(0);
        pls.adv().unwrap();
        pls.line(&[0.2, 0.8], &[0.5, 0.5]).unwrap();
        pls.width(3);
        pls.line(&[0.2, 0.8], &[0.4, 0.4]).unwrap();

        let pens: Vec<Pen> = pls
            .device()
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::Polyline { pen, .. } => Some(*pen),
                _ => None,
            })
            .collect();
        assert_eq!(pens, [Pen::new(expected, 1), Pen::new(expected, 3)]);
    }

    #[test]
    fn test_sym_length_mismatch() {
        let mut pls = recording();
        pls.adv().unwrap();
        let err = pls.sym(&[0.0, 1.0], &[0.0], 1).unwrap_err();
        assert!(matches!(err, Error::DataLengthMismatch { x_len: 2, y_len: 1 }));
    }

    #[test]
    fn test_sym_respects_loaded_set() {
        let mut pls = recording();
        pls.adv().unwrap();
        pls.sym(&[0.5], &[0.5], 2100).unwrap();
        assert_eq!(pls.device().commands().len(), 1);

        pls.font_load(FontSet::Extended);
        pls.sym(&[0.5], &[0.5], 2100).unwrap();
        assert!(pls.device().commands().len() > 1);
    }

    #[test]
    fn test_line_clipped_to_window() {
        let mut pls = recording();
        pls.adv().unwrap();
        pls.wind(0.0, 1.0, 0.0, 1.0).unwrap();
        pls.line(&[-1.0, 0.5, 2.0], &[0.5, 0.5, 0.5]).unwrap();

        let Some(Command::Polyline { points, .. }) = pls.device().commands().last() else {
            panic!("expected a polyline");
        };
        assert_eq!(points.len(), 3);
        assert_relative_eq!(points[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(points[2].x, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clipped_runs_split_on_gaps() {
        let rect = Rect::unit();
        let pts = [
            Point::new(0.2, 0.2),
            Point::new(0.8, 0.2),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
            Point::new(0.8, 0.8),
            Point::new(0.2, 0.8),
        ];
        let runs = clipped_runs(&pts, &rect);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].last(), Some(&Point::new(0.2, 0.8)));
    }

    #[test]
    fn test_shade_counts_and_colour() {
        let mut pls = recording();
        pls.adv().unwrap();
        pls.wind(0.0, 1.0, 0.0, 1.0).unwrap();
        let z = Grid::from_fn(5, 5, |i, _| i as f64).unwrap();
        let unit = CoordTransform::Identity(Rect::unit());
        let filled = pls.shade(&z, 0.0, 2.0, 0.0, &unit, Wrap::None).unwrap();

        assert_eq!(filled, 8);
        let stats = pls.stats();
        assert_eq!(stats.shade_calls, 1);
        assert_eq!(stats.polygons_filled, 8);
        assert_eq!(pls.device().fill_count(), 8);
    }

    #[test]
    fn test_shade_edges_draw_boundaries() {
        let mut pls = recording();
        pls.adv().unwrap();
        pls.shade_edges(2);
        let z = Grid::from_fn(3, 3, |i, _| i as f64).unwrap();
        let unit = CoordTransform::Identity(Rect::unit());
        pls.shade(&z, 0.5, 1.5, 0.5, &unit, Wrap::None).unwrap();

        let lines = pls
            .device()
            .commands()
            .iter()
            .filter(|c| match c {
                Command::Polyline { pen, .. } => pen.width == 2,
                _ => false,
            })
            .count();
        assert!(lines > 0);
    }

    #[test]
    fn test_raster_axes_render() {
        let opts = options(120, 100);
        let mut pls = PlotStream::new(RasterDevice::in_memory(), &opts).unwrap();
        pls.init().unwrap();
        pls.env(0.0, 1.0, 0.0, 1.0).unwrap();
        pls.lab("x", "y", "t").unwrap();
        pls.end().unwrap();

        let dev = pls.into_device();
        let page = &dev.pages()[0];
        assert!(page.count_color(Rgba::RED) > 0);
    }

    #[test]
    fn test_char_scale_from_options() {
        let opts = DeviceOptions {
            char_scale: 2.0,
            ..options(100, 100)
        };
        let mut pls = PlotStream::new(PlotBuffer::new(), &opts).unwrap();
        assert_relative_eq!(pls.char_height(), 4.0);
        pls.schr(0.5).unwrap();
        assert_relative_eq!(pls.char_height(), 2.0);
        assert_relative_eq!(pls.symbol_height(), 3.0);
    }
}
