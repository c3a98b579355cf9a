//! Configuration for the relief tools.
//!
//! Settings persist to disk as RON, tolerate missing and unknown fields, and
//! can be overridden from the command line.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, InterpolationArg};
pub use config::{
    Config, DebugConfig, DemoConfig, EllipsoidPreset, GeometryConfig, RepairConfig,
    SamplingConfig, default_config_dir,
};
pub use error::ConfigError;
