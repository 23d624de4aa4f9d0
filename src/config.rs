//! Output device options.
//!
//! Options load from YAML with precedence: CLI > file > defaults.

use crate::color::Rgba;
use crate::device::DeviceKind;
use crate::error::{Error, Result};
use crate::framebuffer::MAX_DIMENSION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Device selection and page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceOptions {
    /// Output driver.
    pub device: DeviceKind,
    /// Output path. Pages are written next to it as `<stem>-NN.<ext>`.
    pub output: PathBuf,
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Page background as `#rrggbb`.
    pub background: String,
    /// Multiplier applied to the default character height.
    pub char_scale: f64,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            device: DeviceKind::Png,
            output: PathBuf::from("plot.png"),
            width: 800,
            height: 600,
            background: "#000000".to_string(),
            char_scale: 1.0,
        }
    }
}

impl DeviceOptions {
    /// Loads options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(OptionsFile::from_yaml_file(path)?.over_defaults())
    }

    /// Parses options from a YAML string. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(OptionsFile::from_yaml(yaml)?.over_defaults())
    }

    /// Checks geometry, background and character scale.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for a zero or oversized page.
    /// - [`Error::InvalidColor`] for an unparsable background.
    /// - [`Error::Config`] for a non-positive character scale.
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: u32| v > 0 && v <= MAX_DIMENSION;
        if !(in_range(self.width) && in_range(self.height)) {
            return Err(Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.background_color()?;
        if !(self.char_scale.is_finite() && self.char_scale > 0.0) {
            return Err(Error::Config(format!(
                "char_scale must be positive, got {}",
                self.char_scale
            )));
        }
        Ok(())
    }

    /// The parsed background colour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] if `background` is not a hex colour.
    pub fn background_color(&self) -> Result<Rgba> {
        Rgba::from_hex(&self.background)
    }
}

/// The keys actually present in an options file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OptionsFile {
    /// Output driver.
    pub device: Option<DeviceKind>,
    /// Output path.
    pub output: Option<PathBuf>,
    /// Page width in pixels.
    pub width: Option<u32>,
    /// Page height in pixels.
    pub height: Option<u32>,
    /// Page background as `#rrggbb`.
    pub background: Option<String>,
    /// Character height multiplier.
    pub char_scale: Option<f64>,
}

impl OptionsFile {
    /// Reads an options file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    /// Parses an options file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Overwrite the fields of `options` that this file sets.
    pub fn apply(self, options: &mut DeviceOptions) {
        if let Some(device) = self.device {
            options.device = device;
        }
        if let Some(output) = self.output {
            options.output = output;
        }
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(background) = self.background {
            options.background = background;
        }
        if let Some(char_scale) = self.char_scale {
            options.char_scale = char_scale;
        }
    }

    fn over_defaults(self) -> DeviceOptions {
        let mut options = DeviceOptions::default();
        self.apply(&mut options);
        options
    }
}

impl batuta_common::display::WithDimensions for DeviceOptions {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Parses a `WxH` geometry string such as `1024x768`.
///
/// # Errors
///
/// Returns [`Error::InvalidGeometry`] if the string is not two positive
/// integers separated by `x`.
pub fn parse_geometry(s: &str) -> Result<(u32, u32)> {
    let invalid = || Error::InvalidGeometry(s.to_string());
    let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = w.trim().parse().map_err(|_| invalid())?;
    let height: u32 = h.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}
