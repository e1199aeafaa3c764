//! Viewer configuration

use std::path::Path;

use anyhow::Context;
use landmap_viewport::{RenderStyle, DEFAULT_ZOOM};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Zoom of a fresh camera
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,

    /// Maximum profiles and claims fetched per refresh
    #[serde(default = "default_discovery_limit")]
    pub discovery_limit: usize,

    #[serde(default)]
    pub style: RenderStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            initial_zoom: default_initial_zoom(),
            discovery_limit: default_discovery_limit(),
            style: RenderStyle::default(),
        }
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_initial_zoom() -> f64 { DEFAULT_ZOOM }
fn default_discovery_limit() -> usize { 500 }
fn default_width() -> f64 { 1280.0 }
fn default_height() -> f64 { 720.0 }

impl ViewerConfig {
    /// Load from `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.initial_zoom, 0.15);
        assert_eq!(config.discovery_limit, 500);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml(
            r##"
initial_zoom = 0.5

[viewport]
width = 1920.0

[style]
claimed_color = "#ff8800"
"##,
        )
        .unwrap();

        assert_eq!(config.initial_zoom, 0.5);
        assert_eq!(config.viewport.width, 1920.0);
        assert_eq!(config.viewport.height, 720.0);
        assert_eq!(config.style.claimed_color, "#ff8800");
        assert_eq!(config.style.unclaimed_color, "#666666");
        assert_eq!(config.discovery_limit, 500);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(ViewerConfig::from_toml("initial_zoom = \"wide\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("landmap-config-does-not-exist.toml");
        assert_eq!(ViewerConfig::load(&path).unwrap(), ViewerConfig::default());
    }
}
