//! Configuration Loader
//!
//! Loads and validates the optional TOML configuration. Every section has
//! defaults, so an empty file (or no file at all) is a valid configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::adapters::cw721::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::adapters::fcd::DEFAULT_FCD_URL;
use crate::application::{PipelineContext, DEFAULT_CHECKPOINT_INTERVAL};
use crate::domain::{RarityConfig, TieBreak, TraitSchema, DEFAULT_IPFS_GATEWAY};

/// Environment variable overriding `endpoint.base_url`
pub const FCD_URL_ENV: &str = "NFT_RARITY_FCD_URL";

/// Largest page CW721 contracts accept for `all_tokens`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointSection,
    pub pagination: PaginationSection,
    pub rarity: RaritySection,
    pub output: OutputSection,
    pub logging: LoggingSection,
}

/// FCD endpoint section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointSection {
    /// FCD base URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EndpointSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FCD_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl EndpointSection {
    /// Get base URL with environment variable override
    /// Checks NFT_RARITY_FCD_URL first, falls back to config value
    pub fn get_base_url(&self) -> String {
        std::env::var(FCD_URL_ENV).unwrap_or_else(|_| self.base_url.clone())
    }
}

/// Token index pagination section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationSection {
    /// `all_tokens` page size
    pub page_size: u32,
    /// Ceiling on non-empty pages before the index is considered broken
    pub max_pages: usize,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Rarity scoring section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaritySection {
    /// "first", "union" or "token:<id>"
    pub trait_schema: String,
    /// "token_id" or "input_order"
    pub tie_break: String,
    /// Gateway prefix for ipfs:// images
    pub ipfs_gateway: String,
}

impl Default for RaritySection {
    fn default() -> Self {
        Self {
            trait_schema: "first".to_string(),
            tie_break: "token_id".to_string(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
        }
    }
}

/// Output section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory for the CSV (and checkpoint) files; `~` is expanded
    pub directory: String,
    /// Newly fetched tokens between checkpoint saves
    pub checkpoint_interval: usize,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

impl OutputSection {
    pub fn directory_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.directory).to_string())
    }
}

/// Logging section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if self.endpoint.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        if self.pagination.page_size == 0 || self.pagination.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "page_size must be 1-{}, got {}",
                MAX_PAGE_SIZE, self.pagination.page_size
            )));
        }

        if self.pagination.max_pages == 0 {
            return Err(ConfigError::ValidationError(
                "max_pages must be > 0".to_string(),
            ));
        }

        if self.output.checkpoint_interval == 0 {
            return Err(ConfigError::ValidationError(
                "checkpoint_interval must be > 0".to_string(),
            ));
        }

        self.rarity_config()?;
        Ok(())
    }

    /// Parsed scoring settings
    pub fn rarity_config(&self) -> Result<RarityConfig, ConfigError> {
        let invalid = |e: crate::domain::RarityError| ConfigError::ValidationError(e.to_string());
        Ok(RarityConfig {
            trait_schema: self.rarity.trait_schema.parse::<TraitSchema>().map_err(invalid)?,
            tie_break: self.rarity.tie_break.parse::<TieBreak>().map_err(invalid)?,
            ipfs_gateway: self.rarity.ipfs_gateway.clone(),
        })
    }

    /// Build the run context for a contract
    pub fn pipeline_context(
        &self,
        contract_address: &str,
        resume: bool,
        trait_summary: bool,
    ) -> Result<PipelineContext, ConfigError> {
        let mut ctx = PipelineContext::new(contract_address)
            .with_output_dir(self.output.directory_path());
        ctx.page_size = self.pagination.page_size;
        ctx.max_pages = self.pagination.max_pages;
        ctx.rarity = self.rarity_config()?;
        ctx.trait_summary = trait_summary;
        if resume {
            ctx = ctx.with_checkpoint(self.output.checkpoint_interval);
        }
        Ok(ctx)
    }
}
