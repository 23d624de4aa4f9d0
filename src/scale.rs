//! Scale functions and axis ticks.
//!
//! Linear scales carry the window→viewport→page mapping of the plot stream;
//! [`Ticks`] places the major/minor marks drawn by `box_axes`.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or either extent is not finite.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        let extents = [domain.0, domain.1, range.0, range.1];
        if !extents.iter().all(|v| v.is_finite()) {
            return Err(Error::ScaleDomain("Scale extents must be finite".to_string()));
        }
        let magnitude = domain.0.abs().max(domain.1.abs()).max(1.0);
        if (domain.0 - domain.1).abs() <= f64::EPSILON * magnitude {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

// ============================================================================
// Axis ticks
// ============================================================================

/// Pick a 1/2/5 x 10^k step giving roughly 3-8 intervals over `span`.
#[must_use]
pub fn nice_step(span: f64) -> f64 {
    let span = span.abs();
    if span == 0.0 || !span.is_finite() {
        return 1.0;
    }
    let raw = span / 5.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let mantissa = raw / magnitude;
    let nice = if mantissa < 1.5 {
        1.0
    } else if mantissa < 3.5 {
        2.0
    } else if mantissa < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Default number of minor intervals per major interval for a step.
#[must_use]
pub fn default_subdivisions(step: f64) -> u32 {
    let magnitude = 10f64.powf(step.abs().log10().floor());
    let mantissa = (step.abs() / magnitude).round() as u32;
    match mantissa {
        2 => 4,
        _ => 5,
    }
}

/// Major and minor tick positions over an axis range.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    /// Spacing between major ticks.
    pub step: f64,
    /// Major tick positions in increasing order.
    pub major: Vec<f64>,
    /// Minor tick positions in increasing order (majors excluded).
    pub minor: Vec<f64>,
}

/// Upper bound on major ticks along one axis.
pub const MAX_MAJOR_TICKS: usize = 1000;

/// Upper bound on minor intervals per major interval.
pub const MAX_SUBDIVISIONS: u32 = 100;

impl Ticks {
    /// Compute ticks over `[min, max]` (either order).
    ///
    /// A `spacing` of zero selects [`nice_step`]; an `nsub` of zero selects
    /// [`default_subdivisions`]. A spacing that would give more than
    /// [`MAX_MAJOR_TICKS`] ticks also falls back to [`nice_step`], and `nsub`
    /// is capped at [`MAX_SUBDIVISIONS`].
    #[must_use]
    pub fn compute(min: f64, max: f64, spacing: f64, nsub: u32) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let usable = spacing.is_finite()
            && spacing > 0.0
            && (hi - lo) / spacing <= MAX_MAJOR_TICKS as f64;
        let step = if usable { spacing } else { nice_step(hi - lo) };
        let nsub = if nsub == 0 {
            default_subdivisions(step)
        } else {
            nsub.min(MAX_SUBDIVISIONS)
        };
        let eps = step * 1e-9;

        let first = ((lo - eps) / step).ceil() as i64;
        let last = ((hi + eps) / step).floor() as i64;
        let major: Vec<f64> = (first..=last).map(|k| snap(k as f64 * step, step)).collect();

        let minor_step = step / f64::from(nsub);
        let mut minor = Vec::new();
        for k in (first - 1)..=last {
            let base = k as f64 * step;
            for s in 1..nsub {
                let v = base + f64::from(s) * minor_step;
                if v >= lo - eps && v <= hi + eps {
                    minor.push(v);
                }
            }
        }

        Self { step, major, minor }
    }

    /// Number of decimals needed to label ticks of this spacing.
    #[must_use]
    pub fn decimals(&self) -> usize {
        let exp = self.step.abs().log10();
        if exp >= 0.0 {
            0
        } else {
            (-exp.floor()) as usize
        }
    }

    /// Label text for a major tick value.
    #[must_use]
    pub fn label(&self, value: f64) -> String {
        let value = snap(value, self.step);
        format!("{value:.*}", self.decimals())
    }
}

/// Collapse tiny residues (e.g. `-0.0`, `2.7e-17`) to zero.
fn snap(value: f64, step: f64) -> f64 {
    if value.abs() < step.abs() * 1e-9 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0)).expect("operation should succeed");
        assert_relative_eq!(scale.scale(0.0), 0.0);
        assert_relative_eq!(scale.scale(50.0), 0.5);
        assert_relative_eq!(scale.scale(100.0), 1.0);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        let scale = LinearScale::new((0.0, 1.0), (600.0, 0.0)).unwrap();
        assert_relative_eq!(scale.scale(0.0), 600.0);
        assert_relative_eq!(scale.scale(1.0), 0.0);
    }

    #[test]
    fn test_linear_scale_rejects_empty_domain() {
        assert!(LinearScale::new((1.0, 1.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((0.0, f64::NAN), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_nice_step() {
        assert_relative_eq!(nice_step(2.0), 0.5);
        assert_relative_eq!(nice_step(1.0), 0.2);
        assert_relative_eq!(nice_step(100.0), 20.0);
        assert_relative_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_ticks_fixed_spacing() {
        let ticks = Ticks::compute(0.0, 1.0, 0.1, 0);
        assert_eq!(ticks.major.len(), 11);
        assert_relative_eq!(ticks.major[0], 0.0);
        assert_relative_eq!(ticks.major[10], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ticks_auto_spacing_symmetric() {
        let ticks = Ticks::compute(-1.0, 1.0, 0.0, 0);
        assert_relative_eq!(ticks.step, 0.5);
        assert_eq!(ticks.major.len(), 5);
        assert_eq!(ticks.label(ticks.major[2]), "0.0");
        assert_eq!(ticks.label(-1.0), "-1.0");
        // 5 minor intervals per major: 4 minors inside each of 4 intervals.
        assert_eq!(ticks.minor.len(), 16);
    }

    #[test]
    fn test_ticks_tiny_spacing_falls_back() {
        let ticks = Ticks::compute(0.0, 1.0, 1e-12, 0);
        assert_relative_eq!(ticks.step, nice_step(1.0));
        assert!(ticks.major.len() <= MAX_MAJOR_TICKS);

        let ticks = Ticks::compute(0.0, 1.0, f64::NAN, 0);
        assert_relative_eq!(ticks.step, nice_step(1.0));
    }

    #[test]
    fn test_ticks_subdivisions_capped() {
        let ticks = Ticks::compute(0.0, 1.0, 0.5, u32::MAX);
        assert_eq!(ticks.minor.len(), 2 * (MAX_SUBDIVISIONS as usize - 1));
    }

    #[test]
    fn test_ticks_reversed_range() {
        let a = Ticks::compute(1.0, -1.0, 0.0, 2);
        let b = Ticks::compute(-1.0, 1.0, 0.0, 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_decimals() {
        assert_eq!(Ticks::compute(0.0, 100.0, 20.0, 1).decimals(), 0);
        assert_eq!(Ticks::compute(0.0, 1.0, 0.25, 1).decimals(), 1);
        assert_eq!(Ticks::compute(0.0, 0.1, 0.02, 1).decimals(), 2);
    }
}
