// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cache settings, read from RON.

use cairn_agents::TypeCheck;
use cairn_core::asset::{Lifetime, DEFAULT_LIFETIME_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading a [`CacheConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read cache config '{path}': {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The text is not a valid RON cache configuration.
    #[error("invalid cache config: {0}")]
    Parse(String),
    /// A value is outside its allowed range.
    #[error("invalid cache config: {0}")]
    Invalid(String),
}

/// Settings of a [`ResourceCache`](crate::ResourceCache).
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```ron
/// (
///     default_lifetime_secs: 60,
///     type_check: strict,
///     asset_root: Some("assets"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of loaded entries, in the signed encoding: a positive number
    /// of sweeps, `-1` for session or `-2` for permanent.
    pub default_lifetime_secs: i32,
    /// Time between two sweeps, in milliseconds.
    pub sweep_interval_ms: u64,
    /// Whether declared payload types are enforced.
    pub type_check: TypeCheck,
    /// Directory served by the file system backend. Without one, the cache
    /// starts with an empty in-memory backend.
    pub asset_root: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_lifetime_secs: DEFAULT_LIFETIME_SECS as i32,
            sweep_interval_ms: 1000,
            type_check: TypeCheck::default(),
            asset_root: None,
        }
    }
}

impl CacheConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            ron::de::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded cache config from {}", path.display());
        Self::from_ron_str(&text)
    }

    /// Serializes the config back to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_lifetime()?;
        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The decoded default lifetime.
    pub fn default_lifetime(&self) -> Result<Lifetime, ConfigError> {
        Lifetime::from_raw(self.default_lifetime_secs).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "default_lifetime_secs must be positive, -1 or -2 (got {})",
                self.default_lifetime_secs
            ))
        })
    }

    /// The sweep interval.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}
