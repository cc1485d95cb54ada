use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::detection::{DEFAULT_MAX_RESULTS, RegionDetectorConfig};
use crate::models::Size;

/// Names a config file when none is passed on the command line
pub const CONFIG_ENV: &str = "DETECTLENS_CONFIG";

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    max_results: Option<usize>,
    detector: Option<DetectorConfigFile>,
    display: Option<DisplayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DetectorConfigFile {
    inference_width: Option<u32>,
    inference_height: Option<u32>,
    blur_sigma: Option<f32>,
    low_threshold: Option<f32>,
    high_threshold: Option<f32>,
    min_region_pixels: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DisplayConfigFile {
    viewport_width: Option<u32>,
    viewport_height: Option<u32>,
}

/// Resolved settings: defaults, then the config file, then command-line overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub max_results: usize,
    pub detector: RegionDetectorConfig,
    /// Area images are fitted into. `None` shows them at natural size.
    pub viewport: Option<Size>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            detector: RegionDetectorConfig::default(),
            viewport: None,
        }
    }
}

impl Settings {
    /// Load from `path`, or from `$DETECTLENS_CONFIG` if no path is given.
    /// With neither, the defaults are returned.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));
        let file = match path {
            Some(path) => read_settings_file(&path)?,
            None => SettingsFile::default(),
        };
        let settings = Self::from_file(file)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(text)?;
        let settings = Self::from_file(file)?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(file: SettingsFile) -> Result<Self> {
        let defaults = RegionDetectorConfig::default();
        let detector_file = file.detector.unwrap_or_default();
        let detector = RegionDetectorConfig {
            inference_size: Size::new(
                detector_file
                    .inference_width
                    .unwrap_or(defaults.inference_size.width),
                detector_file
                    .inference_height
                    .unwrap_or(defaults.inference_size.height),
            ),
            blur_sigma: detector_file.blur_sigma.unwrap_or(defaults.blur_sigma),
            low_threshold: detector_file
                .low_threshold
                .unwrap_or(defaults.low_threshold),
            high_threshold: detector_file
                .high_threshold
                .unwrap_or(defaults.high_threshold),
            min_region_pixels: detector_file
                .min_region_pixels
                .unwrap_or(defaults.min_region_pixels),
        };

        let viewport = match file.display {
            Some(DisplayConfigFile {
                viewport_width: Some(width),
                viewport_height: Some(height),
            }) => Some(Size::new(width, height)),
            Some(DisplayConfigFile {
                viewport_width: None,
                viewport_height: None,
            })
            | None => None,
            Some(_) => {
                return Err(anyhow!(
                    "display.viewport_width and display.viewport_height must be set together"
                ));
            }
        };

        Ok(Self {
            max_results: file.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            detector,
            viewport,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.detector.inference_size.is_degenerate() {
            return Err(anyhow!(
                "inference size must be non-zero, got {}",
                self.detector.inference_size
            ));
        }
        if let Some(viewport) = self.viewport {
            if viewport.is_degenerate() {
                return Err(anyhow!("viewport must be non-zero, got {}", viewport));
            }
        }
        Ok(())
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("read config {}: {}", path.display(), e))?;
    toml::from_str(&raw).map_err(|e| anyhow!("parse config {}: {}", path.display(), e))
}

/// Parse `WIDTHxHEIGHT`, e.g. `1024x768`
pub fn parse_size(value: &str) -> Result<Size> {
    let (width, height) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got {:?}", value))?;
    let size = Size::new(width.trim().parse()?, height.trim().parse()?);
    if size.is_degenerate() {
        return Err(anyhow!("size must be non-zero, got {}", size));
    }
    Ok(size)
}
