//! Configuration handling for the TUI

use crate::state::Role;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Administrator email used when none is configured
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@gmail.com";

const DATA_DIR_ENV: &str = "AGRILINK_DATA_DIR";
const REGIONS_ENV: &str = "AGRILINK_REGIONS";
const ADMIN_EMAIL_ENV: &str = "AGRILINK_ADMIN_EMAIL";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TuiConfig {
    /// Directory holding the document store and the log file
    pub data_dir: Option<PathBuf>,
    /// State/district JSON file replacing the bundled one
    pub regions_path: Option<PathBuf>,
    /// Email that signs in to the admin panel
    pub admin_email: Option<String>,
    /// Role preselected on the login screen
    pub default_role: Option<String>,
    /// Email prefilled on the login screen
    pub last_email: Option<String>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "agrilink", "agrilink-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Apply `AGRILINK_*` overrides from the given lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup(REGIONS_ENV).filter(|v| !v.is_empty()) {
            self.regions_path = Some(PathBuf::from(path));
        }
        if let Some(email) = lookup(ADMIN_EMAIL_ENV).filter(|v| !v.is_empty()) {
            self.admin_email = Some(email);
        }
    }

    /// Resolved data directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".agrilink"))
    }

    /// Path of the JSON document store
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join("store.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("agrilink-tui.log")
    }

    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }

    pub fn default_role(&self) -> Role {
        self.default_role
            .as_deref()
            .and_then(Role::parse)
            .unwrap_or_default()
    }

    /// Remember the last successful login
    pub fn remember_login(&mut self, email: &str, role: Option<Role>) {
        self.last_email = Some(email.to_string());
        if let Some(role) = role {
            self.default_role = Some(role.as_str().to_string());
        }
    }
}
