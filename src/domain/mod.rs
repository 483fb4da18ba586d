//! Domain Layer - Core logic for NFT rarity ranking
//!
//! Pure types and computation with no network access. Everything that
//! touches the chain goes through the ports layer.
//!
//! - `token`: token ids, trait values and flattened token records
//! - `image`: `ipfs://` to gateway URL rewriting
//! - `frequency`: per-trait value distributions
//! - `rarity`: scoring and ranking
//! - `checkpoint`: resumable collection progress

pub mod token;
pub mod image;
pub mod frequency;
pub mod rarity;
pub mod checkpoint;

pub use token::{AttributeEntry, TokenId, TokenRecord, TraitValue};
pub use image::{resolve_ipfs_url, DEFAULT_IPFS_GATEWAY};
pub use frequency::{TraitFrequencyTable, ValueFrequency, ValueKey};
pub use rarity::{
    CollectionTable, RankedToken, RarityConfig, RarityEngine, RarityError, TieBreak, TraitSchema,
    TraitScore,
};
pub use checkpoint::{CheckpointError, CollectionCheckpoint, RecoveryStatus};
