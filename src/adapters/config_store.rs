//! Configuration persistence
//!
//! Saves, loads, lists and deletes configuration profiles as `<name>.json`
//! files in one directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Configuration, OqpskError, OqpskResult};

/// Profile that always exists and cannot be deleted
const DEFAULT_PROFILE: &str = "Default";

pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Open (and create if needed) a profile directory
    pub fn open(dir: impl Into<PathBuf>) -> OqpskResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> OqpskResult<PathBuf> {
        let name = sanitize_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Validate and write `config` under its own name
    pub fn save(&self, config: &Configuration) -> OqpskResult<()> {
        config.validate()?;
        let path = self.path_for(&config.name)?;
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&path, json)?;
        log::info!("Saved configuration '{}' to {}", config.name, path.display());
        Ok(())
    }

    /// Load a profile. A missing `Default` profile yields the built-in defaults.
    pub fn load(&self, name: &str) -> OqpskResult<Configuration> {
        let path = self.path_for(name)?;
        if !path.exists() {
            if name.trim() == DEFAULT_PROFILE {
                return Ok(Configuration::default());
            }
            return Err(OqpskError::Config(format!("Configuration '{name}' not found")));
        }
        let json = fs::read_to_string(&path)?;
        let config: Configuration = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Names of all saved profiles, sorted
    pub fn list(&self) -> OqpskResult<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()?.to_str()? == "json" {
                    path.file_stem()?.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> OqpskResult<()> {
        let path = self.path_for(name)?;
        if name.trim() == DEFAULT_PROFILE {
            return Err(OqpskError::Config(
                "Cannot delete the Default configuration".into(),
            ));
        }
        if !path.exists() {
            return Err(OqpskError::Config(format!("Configuration '{name}' not found")));
        }
        fs::remove_file(&path)?;
        Ok(())
    }
}

/// Reject names that could escape the profile directory
fn sanitize_name(name: &str) -> OqpskResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OqpskError::Config("Configuration name cannot be empty".into()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(OqpskError::Config("Invalid configuration name".into()));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(OqpskError::Config(
            "Configuration name contains invalid characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}
