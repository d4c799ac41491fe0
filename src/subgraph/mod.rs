//! GraphQL access to the DEX subgraph.

pub mod client;
pub mod queries;
#[cfg(test)]
pub(crate) mod test_server;

pub use client::{SubgraphClient, decode_response};
