use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpectraError};
use crate::frames::FrameLayout;
use crate::signal::PadPosition;
use crate::window::WindowType;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnalysisConfig {
    /// Samples per frame, also the FFT length.
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
    /// Expected sample rate of decoded audio.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_overlap_percent")]
    pub overlap_percent: u32,
    #[serde(default)]
    pub window: WindowType,
    #[serde(default)]
    pub pad: PadPosition,
    /// Fixed number of zeros to pad with instead of rounding up to a frame.
    #[serde(default)]
    pub pad_count: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: default_frame_size(),
            sample_rate: default_sample_rate(),
            overlap_percent: default_overlap_percent(),
            window: WindowType::default(),
            pad: PadPosition::default(),
            pad_count: None,
        }
    }
}

impl AnalysisConfig {
    /// Check every parameter up front; returns the derived frame layout.
    pub fn validate(&self) -> Result<FrameLayout> {
        if self.sample_rate == 0 {
            return Err(SpectraError::config("sample rate must be positive"));
        }
        FrameLayout::new(self.frame_size, self.overlap_percent)
    }
}

pub fn default_frame_size() -> usize { 2048 }
pub fn default_sample_rate() -> u32 { 44100 }
pub fn default_overlap_percent() -> u32 { 50 }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SpectraError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content)
        .map_err(|e| SpectraError::config(format!("invalid {}: {}", path.display(), e)))
}

/// Explicit path first, then `./specframe.toml`, then the user config dirs.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("specframe.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("specframe").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("specframe").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
