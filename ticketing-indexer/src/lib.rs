//! Ticketing Read Model Library
//!
//! Fetches the ticketing program's accounts from a Solana RPC node, decodes
//! them into typed records, projects them into display views, and aggregates
//! platform totals behind a time-boxed cache.

pub mod config;
pub mod core;
pub mod fetcher;
pub mod records;
pub mod rpc_client;
pub mod services;
pub mod views;

// Re-export commonly used types
pub use crate::config::IndexerConfig;
pub use crate::core::{AccountSource, Clock, DecodeError, FetchError, IndexerError, IndexerResult};
pub use fetcher::{DecodedBatch, RecordFetcher};
pub use records::{EventRecord, ListingRecord, Schema, TicketRecord};
pub use rpc_client::LightRpcClient;
pub use services::{PlatformStats, ReadModel, StatsResponse};
