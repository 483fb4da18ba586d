//! FCD Adapter
//!
//! `ContractQueryPort` over Terra's FCD REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use nft_rarity::adapters::fcd::FcdClient;
//! use nft_rarity::ports::ContractQueryPort;
//!
//! let client = FcdClient::new()?;
//! let page = client
//!     .query_contract("terra1...", &serde_json::json!({"all_tokens": {"limit": 30}}))
//!     .await?;
//! ```

mod client;

pub use client::{FcdClient, FcdConfig, DEFAULT_FCD_URL};
