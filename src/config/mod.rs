use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    /// Seconds between automatic feed refreshes.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Sources that escalate an advisory to an alert regardless of score.
    #[serde(default = "default_trusted_sources")]
    pub trusted_sources: Vec<String>,

    /// Minimum numeric severity that raises an alert.
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            refresh_secs: default_refresh_secs(),
            trusted_sources: default_trusted_sources(),
            alert_threshold: default_alert_threshold(),
        }
    }
}

fn default_refresh_secs() -> u64 {
    300
}

fn default_trusted_sources() -> Vec<String> {
    vec!["CISA KEV".to_string(), "US-CERT".to_string()]
}

fn default_alert_threshold() -> f64 {
    7.0
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("VIGIL_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("vigil").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("vigil").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "vigil", "vigil")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("vigil"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("vigil"));
    }
    directories::ProjectDirs::from("io", "vigil", "vigil").map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("vigil.log"))
}
