//! CW721 Adapter
//!
//! Reads a CW721 NFT collection through any `ContractQueryPort`:
//! - `TokenIndexFetcher`: pages through `all_tokens`
//! - `MetadataFetcher`: resolves `nft_info` into a `TokenRecord`

mod error;
mod messages;
mod metadata;
mod query;
mod token_index;

pub use error::FetchError;
pub use messages::{Cw721QueryMsg, MetadataExtension, NftInfoResponse, TokensResponse};
pub use metadata::{parse_extension, MetadataFetcher};
pub use token_index::{TokenIndexFetcher, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
