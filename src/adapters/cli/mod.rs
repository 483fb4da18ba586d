//! CLI Adapter
//!
//! Command-line interface for nft-rarity.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::CliApp;

use crate::config::Config;

impl CliApp {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.fcd_url {
            config.endpoint.base_url = url.clone();
        }
        if let Some(page_size) = self.page_size {
            config.pagination.page_size = page_size;
        }
        if let Some(schema) = &self.trait_schema {
            config.rarity.trait_schema = schema.clone();
        }
        if let Some(rule) = &self.tie_break {
            config.rarity.tie_break = rule.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
    }

    /// Log filter directive from the verbosity flags, falling back to `default`
    pub fn log_level<'a>(&self, default: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            default
        }
    }
}
