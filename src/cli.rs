//! Command-line options shared by the demo binaries.

use crate::config::{parse_geometry, DeviceOptions, OptionsFile};
use crate::device::DeviceKind;
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;

/// Output options, flattened into each binary's parser.
#[derive(Args, Debug, Clone, Default)]
pub struct PlotArgs {
    /// Output device
    #[arg(long = "dev", value_enum)]
    pub device: Option<DeviceKind>,

    /// Output path; pages are written as <stem>-NN.<ext>
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page size in pixels, e.g. 800x600
    #[arg(long)]
    pub geometry: Option<String>,

    /// Page background colour as #rrggbb
    #[arg(long = "bg")]
    pub background: Option<String>,

    /// Character height multiplier
    #[arg(long)]
    pub char_scale: Option<f64>,

    /// YAML options file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl PlotArgs {
    /// Merge defaults, the optional config file and the flags, in that
    /// order, then validate.
    ///
    /// Without an explicit output path the file is named after
    /// `default_stem` with the device's extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, the geometry is
    /// malformed, or the merged options fail validation.
    pub fn resolve(&self, default_stem: &str) -> Result<DeviceOptions> {
        let mut options = DeviceOptions::default();
        let mut output_from_file = false;
        if let Some(path) = &self.config {
            let file = OptionsFile::from_yaml_file(path)?;
            output_from_file = file.output.is_some();
            file.apply(&mut options);
        }

        if let Some(device) = self.device {
            options.device = device;
        }
        if let Some(geometry) = &self.geometry {
            let (width, height) = parse_geometry(geometry)?;
            options.width = width;
            options.height = height;
        }
        if let Some(background) = &self.background {
            options.background.clone_from(background);
        }
        if let Some(scale) = self.char_scale {
            options.char_scale = scale;
        }
        match &self.output {
            Some(output) => options.output.clone_from(output),
            None if !output_from_file => {
                let name = format!("{default_stem}.{}", options.device.extension());
                options.output = PathBuf::from(name);
            }
            None => {}
        }

        options.validate()?;
        Ok(options)
    }
}
