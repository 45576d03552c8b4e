//! # Network Configuration
//!
//! Settings read once at startup from the server's TOML file.
//!
//! ```toml
//! [network]
//! compression_level = 1
//! ```
//!
//! Wire sizes are not configurable, they live in `meridian_shared`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Network settings consumed by the update pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// zlib level for update packets, 1 (fastest) to 9 (smallest).
    pub compression_level: u32,
}

impl NetworkConfig {
    /// Fastest level, the shipped default.
    pub const MIN_COMPRESSION_LEVEL: u32 = 1;
    /// Smallest output.
    pub const MAX_COMPRESSION_LEVEL: u32 = 9;

    /// Parses the `[network]` table of a server config file.
    ///
    /// A missing table yields the defaults. Other tables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::InvalidCompressionLevel`] for a level outside 1..=9.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct ServerFile {
            #[serde(default)]
            network: NetworkConfig,
        }

        let file: ServerFile =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        file.network.validate()?;
        Ok(file.network)
    }

    /// Reads and parses a server config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// the errors of [`NetworkConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = Self::from_toml_str(&source)?;
        tracing::info!(
            "Loaded network config from {}: compression_level={}",
            path.display(),
            config.compression_level
        );
        Ok(config)
    }

    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCompressionLevel`] for a level outside
    /// 1..=9.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_COMPRESSION_LEVEL..=Self::MAX_COMPRESSION_LEVEL)
            .contains(&self.compression_level)
        {
            return Err(ConfigError::InvalidCompressionLevel(self.compression_level));
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            compression_level: Self::MIN_COMPRESSION_LEVEL,
        }
    }
}
