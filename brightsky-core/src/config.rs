use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::UnitSystem;

/// A saved default coordinate, so the CLI can be run without arguments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HomeLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk. Bright Sky needs no API key,
/// so this only carries user preferences.
///
/// Example TOML:
/// ```toml
/// units = "imperial"
///
/// [home]
/// latitude = 47.873
/// longitude = 8.004
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Preferred unit system; metric when unset.
    pub units: Option<UnitSystem>,

    /// Default coordinate for queries without an explicit one.
    pub home: Option<HomeLocation>,
}

impl Config {
    /// The unit system to use when the command line does not name one.
    pub fn units(&self) -> UnitSystem {
        self.units.unwrap_or_default()
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = Some(units);
    }

    pub fn set_home(&mut self, latitude: f64, longitude: f64) {
        self.home = Some(HomeLocation {
            latitude,
            longitude,
        });
    }

    /// The saved home coordinate, or an error with a hint how to set one.
    pub fn home(&self) -> Result<HomeLocation> {
        self.home.ok_or_else(|| {
            anyhow!(
                "No location given and no home location configured.\n\
                 Hint: pass --lat/--lon, or run `brightsky configure` first."
            )
        })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "brightsky", "brightsky-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
