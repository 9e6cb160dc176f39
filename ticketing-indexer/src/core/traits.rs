//! Core trait abstractions (ports)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;

use super::error::FetchError;
use super::types::{AccountFilter, RawAccount};

/// Ledger port - read access to program-owned accounts
///
/// Every call is a single network round trip. Implementations surface one
/// `FetchError` for the whole call instead of partial results.
#[async_trait]
pub trait AccountSource: Send + Sync {
    /// All accounts owned by `program_id` matching every filter
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, FetchError>;

    /// A single account, `None` when it does not exist
    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, FetchError>;
}

/// Time source, injectable for deterministic expiry tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[async_trait]
impl<T: AccountSource + ?Sized> AccountSource for std::sync::Arc<T> {
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, FetchError> {
        (**self).get_program_accounts(program_id, filters).await
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, FetchError> {
        (**self).get_account(address).await
    }
}
