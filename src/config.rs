use serde::Deserialize;
use thiserror::Error;

use crate::positioning::WatchOptions;
use crate::tracker::PermissionDeniedPolicy;
use crate::viewport::{FIT_PADDING_PX, STREET_ZOOM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchOptions,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub permission_denied: PermissionDeniedPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_zoom")]
    pub single_point_zoom: u8,
    #[serde(default = "default_padding")]
    pub padding_px: [u32; 2],
}

fn default_zoom() -> u8 {
    STREET_ZOOM
}

fn default_padding() -> [u32; 2] {
    FIT_PADDING_PX
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            single_point_zoom: default_zoom(),
            padding_px: default_padding(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}
