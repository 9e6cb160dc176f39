//! Core domain abstractions and types
//!
//! Errors, ports and the raw account types shared by the fetcher, the decoder
//! and the services. Nothing in here depends on a concrete transport.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{DecodeError, DecodeFailure, FetchError, IndexerError, IndexerResult};
pub use traits::{AccountSource, Clock, SystemClock};
pub use types::{AccountFilter, AccountMeta, RawAccount};
