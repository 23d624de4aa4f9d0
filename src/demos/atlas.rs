//! Symbol atlas: every glyph of the extended set, 100 per page.

use crate::device::Device;
use crate::error::Result;
use crate::stream::PlotStream;
use crate::symbols::FontSet;
use tracing::debug;

/// First glyph code of each atlas page.
pub const SYMBOL_BASES: [u32; 17] = [
    0, 200, 500, 600, 700, 800, 900, 2000, 2100, 2200, 2300, 2400, 2500, 2600, 2700, 2800, 2900,
];

/// Page title.
pub const ATLAS_TITLE: &str = "Symbol atlas - plsym symbols";

/// Summary of one rendered atlas page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasPage {
    /// Page number, starting at 1.
    pub page: usize,
    /// First code on the page.
    pub base: u32,
    /// Codes drawn, in row-major order.
    pub codes: Vec<u32>,
}

/// The 100 codes of the page starting at `base`, row-major.
#[must_use]
pub fn glyph_codes(base: u32) -> Vec<u32> {
    (0..100).map(|k| base + k).collect()
}

/// World position of the cell at `row`, `col` in the unit window.
#[must_use]
pub fn cell_position(row: usize, col: usize) -> (f64, f64) {
    (0.1 * col as f64 + 0.05, 0.95 - 0.1 * row as f64)
}

/// Draw one atlas page: a 10x10 grid with row and column labels.
///
/// # Errors
///
/// Propagates any stream or device error.
pub fn render_page<D: Device>(pls: &mut PlotStream<D>, base: u32) -> Result<AtlasPage> {
    pls.adv()?;

    pls.col0(2);
    pls.vpor(0.15, 0.95, 0.1, 0.9)?;
    pls.wind(0.0, 1.0, 0.0, 1.0)?;
    pls.box_axes("bcgt", 0.1, 0, "bcgt", 0.1, 0)?;

    pls.col0(15);
    for col in 0..10 {
        pls.mtex("b", 1.5, 0.1 * col as f64 + 0.05, 0.5, &col.to_string())?;
    }

    let mut codes = Vec::with_capacity(100);
    let mut k = 0;
    for row in 0..10 {
        let (_, y) = cell_position(row, 0);
        pls.mtex("lv", 1.0, y, 1.0, &(base + 10 * row as u32).to_string())?;

        for col in 0..10 {
            let (x, y) = cell_position(row, col);
            let code = base + k;
            pls.sym(&[x], &[y], code)?;
            codes.push(code);
            k += 1;
        }
    }

    pls.mtex("t", 1.5, 0.5, 0.5, ATLAS_TITLE)?;
    pls.eop()?;

    debug!(base, page = pls.page(), "atlas page drawn");
    Ok(AtlasPage {
        page: pls.page(),
        base,
        codes,
    })
}

/// Draw all atlas pages onto an initialised stream.
///
/// # Errors
///
/// Propagates any stream or device error.
pub fn render_atlas<D: Device>(pls: &mut PlotStream<D>) -> Result<Vec<AtlasPage>> {
    pls.font_load(FontSet::Extended);
    SYMBOL_BASES
        .iter()
        .map(|&base| render_page(pls, base))
        .collect()
}
