//! Compiler YAML config — load overrides from ~/.argbex/config.yaml.

use std::path::Path;

use serde::Deserialize;

use crate::schedule::DEFAULT_MAX_APS;

/// Intermediate YAML representation — all fields optional.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    max_aps: Option<u32>,
}

/// Effective compiler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowConfig {
    /// Maximum actions per second; drives the quantization step.
    pub max_aps: u32,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            max_aps: DEFAULT_MAX_APS,
        }
    }
}

/// Load config from ~/.argbex/config.yaml.
/// Returns the default if the file doesn't exist or can't be parsed.
pub fn load_default() -> ShowConfig {
    let Some(home) = dirs::home_dir() else {
        return ShowConfig::default();
    };
    load_from_file(&home.join(".argbex").join("config.yaml")).unwrap_or_default()
}

/// Load config from an explicit path. Returns None if the file can't be
/// read or parsed.
pub fn load_from_file(path: &Path) -> Option<ShowConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_config_yaml(&content)
}

/// Parse a YAML string into a ShowConfig, filling missing fields from
/// the default. An empty document counts as all-absent; zero `max_aps`
/// is treated as absent.
fn parse_config_yaml(yaml: &str) -> Option<ShowConfig> {
    let file: Option<ConfigFile> = serde_yaml::from_str(yaml).ok()?;
    let default = ShowConfig::default();
    let max_aps = file.and_then(|f| f.max_aps).filter(|&aps| aps > 0);
    Some(ShowConfig {
        max_aps: max_aps.unwrap_or(default.max_aps),
    })
}
