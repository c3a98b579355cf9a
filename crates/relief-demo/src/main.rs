//! Runs the elevation pipeline on a synthetic tile and writes its normal map.

mod pipeline;
mod synthetic;

use clap::Parser;
use relief_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    relief_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match pipeline::run(&config) {
        Ok(report) => info!(
            holes = report.holes,
            filled = report.filled,
            replaced = report.replaced,
            resolved = report.resolved,
            resampled = ?report.resampled,
            sub_region = ?report.sub_region,
            cone = report.culling_cone.is_some(),
            normal_map = %report.normal_map.display(),
            "pipeline finished"
        ),
        Err(e) => {
            error!("pipeline failed: {e}");
            std::process::exit(1);
        }
    }
}
