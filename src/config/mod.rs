use std::collections::BTreeSet;
use std::env;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

pub const DEFAULT_MAX_BYTE_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_ACCEPTED_FILE_TYPES: &[&str] = &[".pdf", "pdf"];
pub const DEFAULT_SUCCESS_DISPLAY_MS: u64 = 2000;

/// Immutable rules applied by the validation pipeline.
///
/// Extensions are stored lowercased exactly as supplied, so both `"pdf"` and
/// `".pdf"` entries are kept and matched by the extension gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    max_byte_size: u64,
    allowed_extensions: BTreeSet<String>,
}

impl ValidationConfig {
    pub fn new<I, S>(max_byte_size: u64, allowed_extensions: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if max_byte_size == 0 {
            return Err(AppError::config("maximum file size must be greater than 0"));
        }

        let allowed_extensions: BTreeSet<String> = allowed_extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        if allowed_extensions.is_empty() {
            return Err(AppError::config("at least one accepted file type is required"));
        }

        Ok(Self {
            max_byte_size,
            allowed_extensions,
        })
    }

    pub fn max_byte_size(&self) -> u64 {
        self.max_byte_size
    }

    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    /// True when `extension` (without a dot) matches an entry in either form.
    pub fn allows_extension(&self, extension: &str) -> bool {
        let bare = extension.to_lowercase();
        let dotted = format!(".{}", bare);
        self.allowed_extensions.contains(&bare) || self.allowed_extensions.contains(&dotted)
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_byte_size: DEFAULT_MAX_BYTE_SIZE,
            allowed_extensions: DEFAULT_ACCEPTED_FILE_TYPES
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_bytes: u64,
    pub accepted_file_types: Vec<String>,
    pub show_preview: bool,
    pub success_display_ms: u64,
    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| {
                info!("SERVER_HOST not set, using default: 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            server_port: Self::parse_env_var("SERVER_PORT", 8080)
                .context("Failed to parse SERVER_PORT")?,
            max_file_size_bytes: Self::parse_env_var("MAX_FILE_SIZE_BYTES", DEFAULT_MAX_BYTE_SIZE)
                .context("Failed to parse MAX_FILE_SIZE_BYTES")?,
            accepted_file_types: Self::parse_list_var("ACCEPTED_FILE_TYPES", DEFAULT_ACCEPTED_FILE_TYPES),
            show_preview: Self::parse_env_var("SHOW_PREVIEW", true)
                .context("Failed to parse SHOW_PREVIEW")?,
            success_display_ms: Self::parse_env_var("SUCCESS_DISPLAY_MS", DEFAULT_SUCCESS_DISPLAY_MS)
                .context("Failed to parse SUCCESS_DISPLAY_MS")?,
            request_timeout_seconds: Self::parse_env_var("REQUEST_TIMEOUT_SECONDS", 30)
                .context("Failed to parse REQUEST_TIMEOUT_SECONDS")?,
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn parse_list_var(var_name: &str, default: &[&str]) -> Vec<String> {
        let parsed: Vec<String> = env::var(var_name)
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if parsed.is_empty() {
            info!("{} not set, using default: {:?}", var_name, default);
            default.iter().map(|s| s.to_string()).collect()
        } else {
            parsed
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        Ok(())
    }

    pub fn validation_config(&self) -> AppResult<ValidationConfig> {
        ValidationConfig::new(self.max_file_size_bytes, &self.accepted_file_types)
    }

    pub fn success_display_delay(&self) -> Duration {
        Duration::from_millis(self.success_display_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
