//! # Configuration Management
//!
//! Centralized configuration for building codec stacks.
//!
//! This module describes which container format, base codec and compression
//! level to use, and how the host application wants logs emitted.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variable overrides via `from_env()`
//!
//! ## Security Considerations
//! - The password is never part of the configuration; pass it to
//!   [`CodecConfig::build`] from a secret store
//! - `max_payload_size` bounds decompression output to block decompression bombs

use crate::container::{AnyContainer, ContainerFormat, Encrypted, PortableSigned, Signed};
use crate::core::serialization::{BaseCodec, BaseCodecKind, Compact};
use crate::error::{PersistError, Result};
use crate::utils::compression::{Compression, DEFAULT_COMPRESSION_LEVEL, MAX_COMPRESSION_LEVEL};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, Level};

/// Max allowed decoded payload size (e.g. 256 MB)
pub const MAX_PAYLOAD_SIZE: usize = 256 * 1024 * 1024;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PersistConfig {
    /// Codec stack configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PersistConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns `PersistError::Io` if the file cannot be read and
    /// `PersistError::Config` if it is not valid configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| PersistError::Config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Start with defaults
        let mut config = Self::default();

        if let Ok(format) = std::env::var("PERSIST_CODEC_FORMAT") {
            config.codec.format = format.parse()?;
        }

        if let Ok(base) = std::env::var("PERSIST_CODEC_BASE") {
            config.codec.base = base.parse()?;
        }

        if let Ok(level) = std::env::var("PERSIST_CODEC_COMPRESSION_LEVEL") {
            config.codec.compression_level = level.parse::<u32>().map_err(|e| {
                PersistError::Config(format!("Invalid compression level '{level}': {e}"))
            })?;
        }

        if let Ok(size) = std::env::var("PERSIST_CODEC_MAX_PAYLOAD_SIZE") {
            config.codec.max_payload_size = size.parse::<usize>().map_err(|e| {
                PersistError::Config(format!("Invalid max payload size '{size}': {e}"))
            })?;
        }

        if let Ok(level) = std::env::var("PERSIST_CODEC_LOG_LEVEL") {
            config.logging.log_level = level
                .parse::<Level>()
                .map_err(|_| PersistError::Config(format!("Invalid log level: {level}")))?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PersistError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.codec.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PersistError::Config(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Codec stack configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Container format wrapping the payload
    pub format: ContainerFormat,

    /// Base object-graph codec
    pub base: BaseCodecKind,

    /// Compression level applied to the base codec output (0-9, 0 = none)
    pub compression_level: u32,

    /// Maximum decompressed payload size in bytes
    pub max_payload_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            format: ContainerFormat::default(),
            base: BaseCodecKind::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.compression_level > MAX_COMPRESSION_LEVEL {
            errors.push(format!(
                "Invalid compression level: {} (valid range: 0-{MAX_COMPRESSION_LEVEL})",
                self.compression_level
            ));
        }

        if self.max_payload_size == 0 {
            errors.push("Max payload size cannot be 0".to_string());
        } else if self.max_payload_size as u64 > 4 * 1024 * 1024 * 1024 {
            errors.push(format!(
                "Max payload size too large: {} bytes (maximum recommended: 4 GB)",
                self.max_payload_size
            ));
        }

        if self.base == BaseCodecKind::Compact && !Compact::is_available() {
            errors.push("Compact base codec requires the `compact` feature".to_string());
        }

        errors
    }

    /// Build the configured codec stack keyed by `password`
    ///
    /// # Errors
    /// Returns `PersistError::Config` for invalid settings,
    /// `PersistError::Unavailable` if the base codec is not compiled in, and
    /// `PersistError::Crypto` if key derivation fails
    pub fn build(&self, password: impl AsRef<[u8]>) -> Result<AnyContainer> {
        let base = BaseCodec::from_kind(self.base)?;
        let stack =
            Compression::new(base, self.compression_level)?.with_limit(self.max_payload_size);

        debug!(
            format = self.format.name(),
            base = self.base.name(),
            level = self.compression_level,
            "Building codec stack"
        );

        Ok(match self.format {
            ContainerFormat::Signed => AnyContainer::Signed(Signed::with_base(password, stack)?),
            ContainerFormat::PortableSigned => {
                AnyContainer::PortableSigned(PortableSigned::with_base(password, stack))
            }
            ContainerFormat::Encrypted => {
                AnyContainer::Encrypted(Encrypted::with_base(password, stack))
            }
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("persist-codec"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
