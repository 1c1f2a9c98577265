//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: explicit `--config` path, else `$XDG_CONFIG_HOME/oopatterns/oopatterns.toml`
//! 3. Environment variables: `OOPATTERNS__*` (e.g. `OOPATTERNS__TIMER__TICKS=3`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DecoratorKind;

/// Timer demo settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    /// Sleep between ticks in milliseconds
    pub interval_ms: u64,
    /// Ticks to let pass before stopping
    pub ticks: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            ticks: 5,
        }
    }
}

/// Logger settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerSettings {
    /// Decorators applied in order
    pub decorators: Vec<DecoratorKind>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            decorators: vec![DecoratorKind::Emphasis, DecoratorKind::Timestamp],
        }
    }
}

/// Shape settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ShapeSettings {
    /// Scene used when no `--scene` is given (demo scene if unset)
    pub scene: Option<PathBuf>,
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub timer: RawTimerSettings,
    pub logger: RawLoggerSettings,
    pub shapes: ShapeSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTimerSettings {
    pub interval_ms: Option<u64>,
    pub ticks: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLoggerSettings {
    pub decorators: Option<Vec<DecoratorKind>>,
}

/// Unified configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    pub timer: TimerSettings,
    pub logger: LoggerSettings,
    pub shapes: ShapeSettings,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "oopatterns").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("oopatterns.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand shell variables and tilde in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            timer: TimerSettings {
                interval_ms: overlay
                    .timer
                    .interval_ms
                    .unwrap_or(self.timer.interval_ms),
                ticks: overlay.timer.ticks.unwrap_or(self.timer.ticks),
            },
            logger: LoggerSettings {
                decorators: overlay
                    .logger
                    .decorators
                    .clone()
                    .unwrap_or_else(|| self.logger.decorators.clone()),
            },
            shapes: ShapeSettings {
                scene: overlay
                    .shapes
                    .scene
                    .clone()
                    .or_else(|| self.shapes.scene.clone()),
            },
        }
    }

    /// Expand `~` and `$VAR` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(scene) = &self.shapes.scene {
            let expanded = expand_env_vars(scene.to_string_lossy().as_ref());
            self.shapes.scene = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist. When `None`, the
    ///   global XDG file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file
        match config_file {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        // 3. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply OOPATTERNS__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("OOPATTERNS")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("logger.decorators"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Some(val) = env_value(config.get::<u64>("timer.interval_ms"))? {
            settings.timer.interval_ms = val;
        }
        if let Some(val) = env_value(config.get::<u64>("timer.ticks"))? {
            settings.timer.ticks = val;
        }
        if let Some(val) = env_value(config.get::<Vec<String>>("logger.decorators"))? {
            settings.logger.decorators = val
                .iter()
                .map(|name| parse_decorator(name))
                .collect::<Result<_, _>>()?;
        }
        if let Some(val) = env_value(config.get_string("shapes.scene"))? {
            settings.shapes.scene = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Render as TOML (for `config show`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

/// An unset variable is `None`; a value that fails to parse is an error.
fn env_value<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ApplicationError> {
    match result {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn parse_decorator(name: &str) -> Result<DecoratorKind, ApplicationError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "emphasis" => Ok(DecoratorKind::Emphasis),
        "timestamp" => Ok(DecoratorKind::Timestamp),
        other => Err(ApplicationError::Config {
            message: format!("unknown decorator: {}", other),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
