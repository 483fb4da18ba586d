//! nft-rarity - CW721 collection rarity ranking library
//!
//! Enumerates every token of a CW721 NFT contract, fetches each token's
//! on-chain metadata and ranks the collection by trait rarity.
//!
//! # Modules
//!
//! - `domain`: Token records, trait frequencies, rarity scoring
//! - `ports`: Trait abstraction over contract queries
//! - `adapters`: External implementations (FCD, CW721 fetchers, CSV, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Collection pipeline and run context

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
