use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::path::Path;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Render the effective configuration as YAML.
    pub fn render(cfg: &Config) -> AppResult<String> {
        serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load `path` without falling back to defaults.
    pub fn check(path: &Path) -> AppResult<Config> {
        Config::load_strict(path)
    }
}
