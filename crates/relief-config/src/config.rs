//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use relief_geo::Ellipsoid;
use relief_heightfield::{InterpolationMode, NO_DATA_VALUE, ValidRange};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Point sampling settings.
    pub sampling: SamplingConfig,
    /// Invalid-sample repair settings.
    pub repair: RepairConfig,
    /// Planet and vertical exaggeration.
    pub geometry: GeometryConfig,
    /// Synthetic tile used by the demo pipeline.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Sampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Interpolation used when resampling and extracting sub-regions.
    pub interpolation: InterpolationMode,
    /// Sentinel marking missing samples.
    pub no_data_value: f32,
}

/// Repair configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepairConfig {
    /// Lowest plausible height in meters.
    pub valid_min: f32,
    /// Highest plausible height in meters.
    pub valid_max: f32,
    /// Value written over out-of-range samples.
    pub replace_with: f32,
    /// Last-resort value when no neighbor can fill a gap.
    pub fill_default: f32,
}

/// Reference body for geocentric conversions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum EllipsoidPreset {
    /// The WGS 84 ellipsoid.
    #[default]
    Wgs84,
    /// A sphere with the given radius in meters.
    Sphere(f64),
}

/// Geometry configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryConfig {
    /// Height multiplier applied when deriving the culling cone.
    pub vertical_scale: f32,
    /// Planet shape.
    pub ellipsoid: EllipsoidPreset,
}

/// Demo tile configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Samples per row of the synthetic tile.
    pub columns: usize,
    /// Rows of the synthetic tile.
    pub rows: usize,
    /// Western edge in degrees.
    pub lon_min: f64,
    /// Southern edge in degrees.
    pub lat_min: f64,
    /// Eastern edge in degrees.
    pub lon_max: f64,
    /// Northern edge in degrees.
    pub lat_max: f64,
    /// Height of the synthetic peak in meters.
    pub peak_height: f32,
    /// Column count of the resampled tile.
    pub resample_columns: usize,
    /// Row count of the resampled tile.
    pub resample_rows: usize,
    /// Directory that receives generated images.
    pub output_dir: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::Bilinear,
            no_data_value: NO_DATA_VALUE,
        }
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            valid_min: -500.0,
            valid_max: 9000.0,
            replace_with: 0.0,
            fill_default: 0.0,
        }
    }
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            vertical_scale: 1.0,
            ellipsoid: EllipsoidPreset::Wgs84,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            columns: 65,
            rows: 65,
            lon_min: 6.0,
            lat_min: 45.5,
            lon_max: 7.0,
            lat_max: 46.5,
            peak_height: 4500.0,
            resample_columns: 33,
            resample_rows: 33,
            output_dir: PathBuf::from("relief-output"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl EllipsoidPreset {
    /// The ellipsoid this preset names.
    pub fn ellipsoid(self) -> Ellipsoid {
        match self {
            Self::Wgs84 => Ellipsoid::WGS84,
            Self::Sphere(radius) => Ellipsoid::sphere(radius),
        }
    }
}

impl RepairConfig {
    /// The configured plausible-height range.
    pub fn valid_range(&self) -> Result<ValidRange, ConfigError> {
        if self.valid_min > self.valid_max {
            return Err(ConfigError::InvalidRange {
                min: self.valid_min,
                max: self.valid_max,
            });
        }
        Ok(ValidRange::new(self.valid_min, self.valid_max))
    }
}

/// Platform config directory for the relief tools, falling back to the
/// working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("relief")
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("interpolation: Bilinear"));
        assert!(ron_str.contains("ellipsoid: Wgs84"));
        assert!(ron_str.contains("columns: 65"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.geometry.ellipsoid = EllipsoidPreset::Sphere(6_371_000.0);
        config.sampling.interpolation = InterpolationMode::Triangulated;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(sampling: (interpolation: Nearest), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.sampling.interpolation, InterpolationMode::Nearest);
        assert_eq!(config.sampling.no_data_value, NO_DATA_VALUE);
        assert_eq!(config.repair, RepairConfig::default());
        assert_eq!(config.geometry, GeometryConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true, geometry: (vertical_scale: 2.0))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.geometry.vertical_scale, 2.0);
    }

    #[test]
    fn test_ellipsoid_presets() {
        assert_eq!(EllipsoidPreset::Wgs84.ellipsoid(), Ellipsoid::WGS84);
        let sphere = EllipsoidPreset::Sphere(1000.0).ellipsoid();
        assert_eq!(sphere.equatorial_radius, 1000.0);
        assert_eq!(sphere.polar_radius, 1000.0);
    }

    #[test]
    fn test_valid_range_rejects_inverted_bounds() {
        let repair = RepairConfig {
            valid_min: 10.0,
            valid_max: -10.0,
            ..RepairConfig::default()
        };
        assert!(matches!(
            repair.valid_range(),
            Err(ConfigError::InvalidRange { .. })
        ));
        assert_eq!(
            RepairConfig::default().valid_range().unwrap(),
            ValidRange::new(-500.0, 9000.0)
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.demo.columns = 129;
        config.repair.fill_default = -1.0;
        config.debug.log_level = "trace".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.geometry.vertical_scale = 3.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().geometry.vertical_scale, 3.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_default_config_dir_ends_with_relief() {
        assert!(default_config_dir().ends_with("relief"));
    }
}
