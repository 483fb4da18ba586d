//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, the collection pipeline only talks to
//! the chain through `ContractQueryPort`. The FCD HTTP client implements it
//! for real runs; `mocks::InMemoryCw721` implements it for tests.

pub mod contract_query;
pub mod mocks;

pub use contract_query::{ContractQueryPort, QueryError};

#[cfg(test)]
pub use contract_query::MockContractQueryPort;
