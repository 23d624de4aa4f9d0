//! Color types and the two plot colour maps.
//!
//! - [`Rgba`]: 8-bit device colour.
//! - [`Hsla`]: hue/saturation/lightness, used to interpolate the continuous map.
//! - [`Cmap0`]: the indexed 16-entry palette addressed by `col0`.
//! - [`Cmap1`]: the continuous map addressed by a position in `[0, 1]`, used
//!   for shade fills.

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::new(255, 255, 0, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for any other shape or non-hex digits.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(Error::InvalidColor(s.to_string()));
        }

        let invalid = || Error::InvalidColor(s.to_string());
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());

        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }
}

/// HSLA color with floating-point components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsla {
    /// Hue (0.0-360.0 degrees).
    pub h: f32,
    /// Saturation (0.0-1.0).
    pub s: f32,
    /// Lightness (0.0-1.0).
    pub l: f32,
    /// Alpha (0.0-1.0).
    pub a: f32,
}

impl Hsla {
    /// Create a new HSLA color.
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    /// Create an opaque HSL color (alpha = 1.0).
    #[must_use]
    pub const fn hsl(h: f32, s: f32, l: f32) -> Self {
        Self::new(h, s, l, 1.0)
    }

    /// Component-wise interpolation. Hue is interpolated linearly, not around
    /// the colour wheel.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.h + (other.h - self.h) * t,
            self.s + (other.s - self.s) * t,
            self.l + (other.l - self.l) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Convert to RGBA.
    #[must_use]
    pub fn to_rgba(self) -> Rgba {
        let h = self.h / 360.0;
        let s = self.s;
        let l = self.l;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 {
                l * (1.0 + s)
            } else {
                l + s - l * s
            };
            let p = 2.0 * l - q;

            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        Rgba::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            (self.a * 255.0).round() as u8,
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        hsla.to_rgba()
    }
}

// ============================================================================
// Colour map 0: indexed palette
// ============================================================================

/// The indexed palette. Entry 0 is the page background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmap0 {
    colors: Vec<Rgba>,
}

impl Default for Cmap0 {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgba::BLACK,
                Rgba::RED,
                Rgba::YELLOW,
                Rgba::GREEN,
                Rgba::rgb(127, 255, 212), // aquamarine
                Rgba::rgb(255, 192, 203), // pink
                Rgba::rgb(245, 222, 179), // wheat
                Rgba::rgb(190, 190, 190), // grey
                Rgba::rgb(165, 42, 42),   // brown
                Rgba::BLUE,
                Rgba::rgb(138, 43, 226),  // blue violet
                Rgba::rgb(0, 255, 255),   // cyan
                Rgba::rgb(64, 224, 208),  // turquoise
                Rgba::rgb(255, 0, 255),   // magenta
                Rgba::rgb(250, 128, 114), // salmon
                Rgba::WHITE,
            ],
        }
    }
}

impl Cmap0 {
    /// Number of palette entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette is empty (never true for the default palette).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Look up an entry. Out-of-range indices wrap around the palette.
    #[must_use]
    pub fn get(&self, index: usize) -> Rgba {
        if self.colors.is_empty() {
            return Rgba::WHITE;
        }
        self.colors[index % self.colors.len()]
    }

    /// Replace the background entry.
    pub fn set_background(&mut self, color: Rgba) {
        if let Some(bg) = self.colors.first_mut() {
            *bg = color;
        }
    }

    /// The background entry.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.get(0)
    }
}

// ============================================================================
// Colour map 1: continuous map
// ============================================================================

/// A control point of [`Cmap1`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    /// Position in `[0, 1]`.
    pub pos: f64,
    /// Colour at this position.
    pub color: Hsla,
}

/// Continuous colour map interpolated in HLS space between control points.
///
/// Two control points may share a position to create a hard step. The
/// default map uses this to go from blue through white to red without
/// sweeping the hue through green.
#[derive(Debug, Clone, PartialEq)]
pub struct Cmap1 {
    points: Vec<ControlPoint>,
}

impl Default for Cmap1 {
    fn default() -> Self {
        Self {
            points: vec![
                ControlPoint {
                    pos: 0.0,
                    color: Hsla::hsl(240.0, 0.9, 0.35),
                },
                ControlPoint {
                    pos: 0.5,
                    color: Hsla::hsl(240.0, 0.0, 0.92),
                },
                ControlPoint {
                    pos: 0.5,
                    color: Hsla::hsl(0.0, 0.0, 0.92),
                },
                ControlPoint {
                    pos: 1.0,
                    color: Hsla::hsl(0.0, 0.9, 0.4),
                },
            ],
        }
    }
}

impl Cmap1 {
    /// Create a map from control points.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScaleDomain`] unless there are at least two points,
    /// positions are non-decreasing, the first is 0 and the last is 1.
    pub fn new(points: Vec<ControlPoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::ScaleDomain("cmap1 needs at least two control points".to_string()));
        }
        let first = points[0].pos;
        let last = points[points.len() - 1].pos;
        if first.abs() > f64::EPSILON || (last - 1.0).abs() > f64::EPSILON {
            return Err(Error::ScaleDomain("cmap1 control points must span [0, 1]".to_string()));
        }
        if points.windows(2).any(|w| w[1].pos < w[0].pos) {
            return Err(Error::ScaleDomain("cmap1 positions must be non-decreasing".to_string()));
        }
        Ok(Self { points })
    }

    /// Greyscale ramp from black to white.
    #[must_use]
    pub fn grey() -> Self {
        Self {
            points: vec![
                ControlPoint {
                    pos: 0.0,
                    color: Hsla::hsl(0.0, 0.0, 0.0),
                },
                ControlPoint {
                    pos: 1.0,
                    color: Hsla::hsl(0.0, 0.0, 1.0),
                },
            ],
        }
    }

    /// Colour at `pos`, clamped to `[0, 1]`.
    #[must_use]
    pub fn color(&self, pos: f64) -> Rgba {
        let pos = if pos.is_nan() {
            0.0
        } else {
            pos.clamp(0.0, 1.0)
        };

        let Some(upper) = self.points.iter().position(|p| p.pos > pos) else {
            let last = self.points.last();
            return last.map_or(Rgba::WHITE, |p| p.color.to_rgba());
        };
        if upper == 0 {
            return self.points[0].color.to_rgba();
        }

        let lo = self.points[upper - 1];
        let hi = self.points[upper];
        let span = hi.pos - lo.pos;
        let t = if span > 0.0 {
            (pos - lo.pos) / span
        } else {
            0.0
        };
        lo.color.lerp(hi.color, t as f32).to_rgba()
    }
}
