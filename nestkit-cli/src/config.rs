//! Configuration management for nestkit
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `NESTKIT_` prefix, `__` for nesting)
//! 2. `./nestkit.toml` (project)
//! 3. `~/.config/nestkit/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # nestkit.toml
//! [project]
//! source_dir = "src"
//! registration_file = "app.module.ts"
//!
//! [commands]
//! package_manager = "pnpm"
//! install_timeout_secs = 600
//!
//! [drivers]
//! postgres = "pg"
//! sqlite = "better-sqlite3"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::answers::DatabaseKind;
use crate::error::{NestkitError, Result};

/// Project layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Project root, relative paths resolve against the working directory
    pub root: PathBuf,

    /// Source directory under the root
    pub source_dir: PathBuf,

    /// Root module file under the source directory
    pub registration_file: PathBuf,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            source_dir: PathBuf::from("src"),
            registration_file: PathBuf::from("app.module.ts"),
        }
    }
}

impl ProjectSettings {
    /// Absolute-or-relative path of the source directory
    #[must_use]
    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.source_dir)
    }

    /// Path of the registration file
    #[must_use]
    pub fn registration_path(&self) -> PathBuf {
        self.source_path().join(&self.registration_file)
    }
}

/// External command settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// Package manager executable
    pub package_manager: String,

    /// Framework generator executable
    pub generator: String,

    /// Time limit for one install attempt
    pub install_timeout_secs: u64,

    /// Time limit for one `generate` subcommand
    pub scaffold_timeout_secs: u64,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            package_manager: "npm".to_string(),
            generator: "nest".to_string(),
            install_timeout_secs: 300,
            scaffold_timeout_secs: 120,
        }
    }
}

impl CommandSettings {
    /// Install time limit as a [`Duration`]
    #[must_use]
    pub const fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs)
    }

    /// Scaffold time limit as a [`Duration`]
    #[must_use]
    pub const fn scaffold_timeout(&self) -> Duration {
        Duration::from_secs(self.scaffold_timeout_secs)
    }
}

/// Driver package per database kind; empty means "install nothing"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    /// `MySQL` driver
    pub mysql: String,
    /// `PostgreSQL` driver
    pub postgres: String,
    /// `SQLite` driver
    pub sqlite: String,
    /// `MongoDB` driver
    pub mongodb: String,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            mysql: "mysql2".to_string(),
            postgres: "pg".to_string(),
            sqlite: "sqlite3".to_string(),
            mongodb: "mongodb".to_string(),
        }
    }
}

impl DriverSettings {
    /// Package to install for `kind`, if any
    #[must_use]
    pub fn package_for(&self, kind: DatabaseKind) -> Option<&str> {
        let package = match kind {
            DatabaseKind::Mysql => &self.mysql,
            DatabaseKind::Postgres => &self.postgres,
            DatabaseKind::Sqlite => &self.sqlite,
            DatabaseKind::Mongodb => &self.mongodb,
        };
        let package = package.trim();
        (!package.is_empty()).then_some(package)
    }
}

/// Complete nestkit configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NestkitConfig {
    /// Project layout
    #[serde(default)]
    pub project: ProjectSettings,

    /// External commands
    #[serde(default)]
    pub commands: CommandSettings,

    /// Driver packages
    #[serde(default)]
    pub drivers: DriverSettings,
}

impl NestkitConfig {
    /// Load configuration from the standard locations
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file contains invalid TOML or a value
    /// cannot be converted to its field type.
    pub fn load() -> Result<Self> {
        let mut figment = Self::defaults()?;

        let user_config = Self::user_config_path();
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./nestkit.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed("NESTKIT_").split("__").lowercase(true));

        Ok(figment.extract()?)
    }

    /// Load configuration from a specific file on top of the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file contains invalid TOML or values of the
    /// wrong type.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::defaults()?
            .merge(Toml::file(path))
            .merge(Env::prefixed("NESTKIT_").split("__").lowercase(true))
            .extract()?;

        Ok(config)
    }

    /// User-level config path, `~/.config/nestkit/config.toml` on Linux
    #[must_use]
    pub fn user_config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./nestkit.toml"),
            |config_dir| config_dir.join("nestkit").join("config.toml"),
        )
    }

    fn defaults() -> Result<Figment> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| NestkitError::from(figment::Error::from(e.to_string())))?;
        Ok(Figment::new().merge(Toml::string(&defaults)))
    }
}
