//! Adapters Layer - External System Implementations
//!
//! - FCD: HTTP implementation of `ContractQueryPort`
//! - CW721: token index and metadata fetchers built on the port
//! - CSV Export: ranked table output
//! - CLI: command-line interface

pub mod fcd;
pub mod cw721;
pub mod csv_export;
pub mod cli;

pub use fcd::FcdClient;
pub use cw721::{FetchError, MetadataFetcher, TokenIndexFetcher};
pub use csv_export::CsvExporter;
pub use cli::CliApp;
