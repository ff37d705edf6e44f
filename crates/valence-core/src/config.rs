//! Configuration for stores, atoms and logging.
//!
//! Every field has a serde default, so a `valence.toml` only needs the
//! values it changes.

use crate::error::{Result, ValenceError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name searched for by [`ValenceConfig::find_and_load`].
pub const CONFIG_FILE_NAME: &str = "valence.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValenceConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub atom: AtomConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sizing of slot stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Slots allocated up front.
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Capacity multiplier applied when no free slot is left.
    #[serde(default = "default_growth_factor")]
    pub growth_factor: usize,
    /// Hard limit on slot count. Growing past it is fatal.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomConfig {
    /// Initial capacity of each atom's bond arrangement.
    #[serde(default = "default_bond_capacity")]
    pub bond_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Maximum tracing level: error, warn, info, debug or trace.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_initial_capacity() -> usize { 2 }
fn default_growth_factor() -> usize { 2 }
fn default_max_capacity() -> usize { u32::MAX as usize }
fn default_bond_capacity() -> usize { 4 }
fn default_level() -> String { "info".to_string() }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_initial_capacity(),
            growth_factor: default_growth_factor(),
            max_capacity: default_max_capacity(),
        }
    }
}

impl StoreConfig {
    /// Default sizing with a different initial capacity.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth_factor == 0 {
            return Err(ValenceError::config(format!(
                "store.growth_factor must be at least 1, got {}",
                self.growth_factor
            )));
        }
        if self.max_capacity < self.initial_capacity {
            return Err(ValenceError::config(format!(
                "store.max_capacity ({}) is below store.initial_capacity ({})",
                self.max_capacity, self.initial_capacity
            )));
        }
        Ok(())
    }
}

impl Default for AtomConfig {
    fn default() -> Self {
        Self {
            bond_capacity: default_bond_capacity(),
        }
    }
}

impl AtomConfig {
    /// Store sizing for an atom's bonds, inheriting growth limits from `store`.
    pub fn bond_store(&self, store: &StoreConfig) -> StoreConfig {
        StoreConfig {
            initial_capacity: self.bond_capacity,
            ..store.clone()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> Result<tracing::Level> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|_| ValenceError::config(format!("unknown log level: {}", self.level)))
    }
}

impl ValenceConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ValenceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValenceError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `valence.toml` from the current or a parent directory, or defaults.
    pub fn find_and_load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.atom.bond_store(&self.store).validate()?;
        self.logging.level()?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default config as TOML.
    pub fn default_toml() -> Result<String> {
        Self::default().to_toml()
    }
}

fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
