//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use relief_heightfield::InterpolationMode;

use crate::Config;

/// Relief command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "relief", about = "Elevation grid sampling and geometry")]
pub struct CliArgs {
    /// Samples per row of the demo tile.
    #[arg(long)]
    pub columns: Option<usize>,

    /// Rows of the demo tile.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Interpolation mode.
    #[arg(long, value_enum, ignore_case = true)]
    pub interpolation: Option<InterpolationArg>,

    /// Height multiplier for the culling cone.
    #[arg(long)]
    pub vertical_scale: Option<f32>,

    /// Directory that receives generated images.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Interpolation modes accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InterpolationArg {
    /// Value of the closest sample.
    Nearest,
    /// Plane through the enclosing triangle.
    Triangulated,
    /// Bilinear blend of the cell's corners.
    Bilinear,
    /// Box-filter blend.
    Average,
}

impl From<InterpolationArg> for InterpolationMode {
    fn from(arg: InterpolationArg) -> Self {
        match arg {
            InterpolationArg::Nearest => Self::Nearest,
            InterpolationArg::Triangulated => Self::Triangulated,
            InterpolationArg::Bilinear => Self::Bilinear,
            InterpolationArg::Average => Self::Average,
        }
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(columns) = args.columns {
            self.demo.columns = columns;
        }
        if let Some(rows) = args.rows {
            self.demo.rows = rows;
        }
        if let Some(mode) = args.interpolation {
            self.sampling.interpolation = mode.into();
        }
        if let Some(scale) = args.vertical_scale {
            self.geometry.vertical_scale = scale;
        }
        if let Some(ref output) = args.output {
            self.demo.output_dir = output.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
