use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "prevalence-viewer.json";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Tunables for timing and layout. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Delay between years while playing.
    pub playback_interval_ms: u64,
    /// Length of arc/bar transitions after a selection change.
    pub transition_ms: u64,
    /// Inner and outer padding of the bar chart bands, as a fraction of a step.
    pub band_padding: f64,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Start with the colour-blind friendly palette.
    pub colorblind_palette: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            playback_interval_ms: 750,
            transition_ms: 250,
            band_padding: 0.25,
            window_size: [1000.0, 640.0],
            colorblind_palette: false,
        }
    }
}

impl ViewerConfig {
    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid viewer config")
    }

    /// Config from `path` if present; defaults when it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded viewer config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring viewer config: {e:#}");
                Self::default()
            }
        }
    }
}
