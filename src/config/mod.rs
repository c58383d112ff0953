use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub detector: DetectorConfig,
    pub image: ImageConfig,
}

/// Tunable sensitivity parameters consumed by the detection pipeline.
///
/// The squareness thresholds (corner-angle window, side-length ratio) are
/// deliberately *not* here: they are fixed constants of the quad validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Lower Canny hysteresis threshold.
    pub edge_low: f64,
    /// Upper Canny hysteresis threshold. Must be >= `edge_low`.
    pub edge_high: f64,
    /// Polygon simplification accuracy, as a fraction of contour perimeter.
    /// Larger values produce coarser polygons.
    pub poly_accuracy: f64,
    /// Hough accumulator threshold for circle detection, in (0, 1].
    pub circle_accuracy: f64,
    /// Run edge extraction on grayscale only instead of per color channel.
    pub grayscale_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub min_size: u32,
    pub max_size: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            edge_low: 1.0,
            edge_high: 5.0,
            poly_accuracy: 0.02,
            circle_accuracy: 0.87,
            grayscale_only: false,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_size: 32,
            max_size: 10000,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;

        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(
        &self,
        path: P,
        format: ConfigFormat,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.detector.edge_low < 0.0 {
            errors.push("edge_low must be non-negative".to_string());
        }

        if self.detector.edge_high < self.detector.edge_low {
            errors.push("edge_high must be at least edge_low".to_string());
        }

        if self.detector.poly_accuracy <= 0.0 {
            errors.push("poly_accuracy must be positive".to_string());
        }

        if self.detector.circle_accuracy <= 0.0 || self.detector.circle_accuracy > 1.0 {
            errors.push("circle_accuracy must be in (0, 1]".to_string());
        }

        if self.image.min_size >= self.image.max_size {
            errors.push("Image min_size must be less than max_size".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfigFormat {
    Json,
    Toml,
}

pub fn load_config_or_default(config_path: Option<&str>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    eprintln!("Configuration validation errors:");
                    for error in errors {
                        eprintln!("  - {}", error);
                    }
                    eprintln!("Using default configuration instead.");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                eprintln!("Failed to load config from '{}': {}", path, e);
                eprintln!("Using default configuration.");
                Config::default()
            }
        },
        None => Config::default(),
    }
}
