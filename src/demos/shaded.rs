//! Shaded field: colour-filled contour bands under four coordinate mappings.

use crate::coords::{CoordMode, CoordTransform};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::grid::Grid;
use crate::levels::BandSet;
use crate::shade::Wrap;
use crate::stream::PlotStream;
use tracing::debug;

use super::fields::{bogon_fields, distorted_mesh1, distorted_mesh2, perimeter, polar_field};

/// Points on the polar pass perimeter.
const PERIMETER_POINTS: usize = 100;

/// What one pass drew.
#[derive(Debug, Clone, PartialEq)]
pub struct PassSummary {
    /// Coordinate mapping used.
    pub mode: CoordMode,
    /// Plot title.
    pub title: &'static str,
    /// Lower end of the shaded range.
    pub zmin: f64,
    /// Upper end of the shaded range.
    pub zmax: f64,
    /// Number of band fills issued.
    pub fill_calls: usize,
    /// cmap1 position of each band fill, in call order.
    pub sh_colors: Vec<f64>,
}

/// Parameters of the shaded-field demo.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedFieldDemo {
    /// Samples along the first index.
    pub nx: usize,
    /// Samples along the second index.
    pub ny: usize,
    /// Number of contour bands.
    pub ns: usize,
    /// Mesh distortion amplitude.
    pub distort: f64,
    /// Overlay contour lines of the stream field on the Cartesian passes.
    pub contours: bool,
}

impl Default for ShadedFieldDemo {
    fn default() -> Self {
        Self {
            nx: 35,
            ny: 46,
            ns: 20,
            distort: 0.4,
            contours: false,
        }
    }
}

impl ShadedFieldDemo {
    /// Checked constructor.
    ///
    /// # Errors
    ///
    /// - [`Error::TooFewBands`] if `ns < 2`.
    /// - [`Error::InvalidGrid`] if `nx` or `ny` is below 2.
    pub fn new(nx: usize, ny: usize, ns: usize) -> Result<Self> {
        let demo = Self {
            nx,
            ny,
            ns,
            ..Self::default()
        };
        demo.validate()?;
        Ok(demo)
    }

    /// Enable or disable the contour overlay.
    #[must_use]
    pub fn with_contours(mut self, contours: bool) -> Self {
        self.contours = contours;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.ns < 2 {
            return Err(Error::TooFewBands(self.ns));
        }
        if self.nx < 2 || self.ny < 2 {
            return Err(Error::InvalidGrid {
                nx: self.nx,
                ny: self.ny,
            });
        }
        Ok(())
    }

    /// Draw the four passes onto an initialised stream, one page each.
    ///
    /// # Errors
    ///
    /// Returns a parameter error before anything is drawn, or propagates any
    /// stream or device error.
    pub fn render<D: Device>(&self, pls: &mut PlotStream<D>) -> Result<Vec<PassSummary>> {
        self.validate()?;
        let (nx, ny) = (self.nx, self.ny);

        let (zz, ww) = bogon_fields(nx, ny)?;
        let bands = BandSet::from_grid(&zz, self.ns)?;
        let levels = bands.contour_levels();
        let mesh1 = distorted_mesh1(nx, ny, self.distort);
        let mesh2 = distorted_mesh2(nx, ny, self.distort)?;

        let cartesian = [
            (CoordTransform::Identity(Rect::new(-1.0, 1.0, -1.0, 1.0)), "Bogon density"),
            (CoordTransform::Grid1(&mesh1), "Bogon density"),
            (CoordTransform::Grid2(&mesh2), "Bogon density, with streamlines"),
        ];

        let mut passes = Vec::with_capacity(4);
        for (transform, title) in &cartesian {
            begin_pass(pls)?;
            let summary = shade_bands(pls, &zz, &bands, transform, Wrap::None, *title)?;

            pls.col0(1);
            pls.box_axes("bcnst", 0.0, 0, "bcnstv", 0.0, 0)?;
            pls.col0(2);
            if self.contours {
                pls.cont(&ww, &levels, transform, Wrap::None)?;
            }
            pls.lab("distance", "altitude", title)?;
            pls.eop()?;
            passes.push(summary);
        }

        // Polar pass: new field, new bands, periodic in the angle.
        begin_pass(pls)?;
        let (px, py) = perimeter(PERIMETER_POINTS);
        let (polar_mesh, z) = polar_field(nx, ny)?;
        let polar_bands = BandSet::from_grid(&z, self.ns)?;
        let polar = CoordTransform::Grid2(&polar_mesh);
        let title = "Tokamak Bogon Instability";
        let summary = shade_bands(pls, &z, &polar_bands, &polar, Wrap::J, title)?;

        // The perimeter goes over the fill.
        pls.col0(1);
        pls.line(&px, &py)?;
        pls.col0(2);
        pls.lab("", "", title)?;
        pls.eop()?;
        passes.push(summary);

        Ok(passes)
    }
}

fn begin_pass<D: Device>(pls: &mut PlotStream<D>) -> Result<()> {
    pls.adv()?;
    pls.vpor(0.1, 0.9, 0.1, 0.9)?;
    pls.wind(-1.0, 1.0, -1.0, 1.0)
}

fn shade_bands<D: Device>(
    pls: &mut PlotStream<D>,
    z: &Grid,
    bands: &BandSet,
    transform: &CoordTransform<'_>,
    wrap: Wrap,
    title: &'static str,
) -> Result<PassSummary> {
    debug!(
        mode = %transform.mode(),
        zmin = bands.zmin(),
        zmax = bands.zmax(),
        bands = bands.len(),
        "shading pass"
    );

    let before = pls.stats().shade_calls;
    let mut sh_colors = Vec::with_capacity(bands.len());
    for band in bands {
        pls.shade(z, band.min, band.max, band.color, transform, wrap)?;
        sh_colors.push(band.color);
    }

    Ok(PassSummary {
        mode: transform.mode(),
        title,
        zmin: bands.zmin(),
        zmax: bands.zmax(),
        fill_calls: pls.stats().shade_calls - before,
        sh_colors,
    })
}
