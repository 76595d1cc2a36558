use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::fixer::DEFAULT_MAX_ATTEMPTS;
use crate::builders::storage::{ParsePolicy, RenderOptions};

/// Name of the settings file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".git-ignore-rules.toml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AutofixSettings {
    pub max_attempts: usize,
}

impl Default for AutofixSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Ignore file used when a command is not given `--path`.
    pub ignore_file: PathBuf,
    pub parse_policy: ParsePolicy,
    pub render: RenderOptions,
    pub autofix: AutofixSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_file: PathBuf::from(".gitignore"),
            parse_policy: ParsePolicy::Strict,
            render: RenderOptions::default(),
            autofix: AutofixSettings::default(),
        }
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<Settings>;
    fn save_config(&self, settings: &Settings) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `path` when given, otherwise `.git-ignore-rules.toml` in the
    /// current directory.
    pub fn new(path: Option<PathBuf>) -> Self {
        let config_path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self { config_path }
    }

    /// Writes the default settings unless a settings file already exists.
    /// Returns whether a file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }
        self.save_config(&Settings::default())?;
        Ok(true)
    }
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    fn save_config(&self, settings: &Settings) -> Result<()> {
        let content = toml::to_string_pretty(settings).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(Some(dir.path().join("absent.toml")));
        let settings = manager.load_config().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.autofix.max_attempts, 20);
        assert_eq!(settings.ignore_file, PathBuf::from(".gitignore"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "parse_policy = \"skip\"\n\n[render]\ntrailing_newline = false\n\n[autofix]\nmax_attempts = 3\n",
        )
        .unwrap();

        let settings = ConfigManager::new(Some(path)).load_config().unwrap();
        assert_eq!(settings.parse_policy, ParsePolicy::Skip);
        assert!(!settings.render.trailing_newline);
        assert!(settings.render.header_comment.is_some());
        assert_eq!(settings.autofix.max_attempts, 3);
    }

    #[test]
    fn test_initialize_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let manager = ConfigManager::new(Some(path.clone()));

        assert!(manager.initialize().unwrap());
        assert!(!manager.initialize().unwrap());
        assert_eq!(manager.load_config().unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "parse_policy = \"lenient\"\n").unwrap();
        assert!(ConfigManager::new(Some(path)).load_config().is_err());
    }
}
