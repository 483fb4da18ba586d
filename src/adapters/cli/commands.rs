//! CLI Arguments
//!
//! Flags for a single rarity run. Only `--contract` is required; everything
//! else overrides the configuration file.

use clap::Parser;
use std::path::PathBuf;

/// nft-rarity - rank a CW721 collection by trait rarity
#[derive(Parser, Debug)]
#[command(
    name = "nft-rarity",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Rank a CW721 NFT collection by trait rarity",
    long_about = "Fetches every token of a CW721 contract through the Terra FCD API, \
                  scores each token by the sum of inverse trait-value probabilities \
                  and writes the ranked table to {contract}_nft.csv."
)]
pub struct CliApp {
    /// NFT contract address
    #[arg(short, long, value_name = "ADDRESS")]
    pub contract: String,

    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override FCD base URL
    #[arg(long, value_name = "URL")]
    pub fcd_url: Option<String>,

    /// Override `all_tokens` page size
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Trait universe: first, union or token:<id>
    #[arg(long, value_name = "SCHEMA")]
    pub trait_schema: Option<String>,

    /// Tie break for equal scores: token_id or input_order
    #[arg(long, value_name = "RULE")]
    pub tie_break: Option<String>,

    /// Directory to write the CSV files to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Save collection progress and resume from a previous checkpoint
    #[arg(long)]
    pub resume: bool,

    /// Also write {contract}_traits.csv with per-value frequencies
    #[arg(long)]
    pub trait_summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
