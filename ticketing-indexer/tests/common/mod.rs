//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use ticketing_indexer::core::{AccountFilter, AccountSource, Clock, FetchError, RawAccount};
use ticketing_indexer::records::{encode, AccountRecord, TicketTier, TierType};
use ticketing_indexer::{EventRecord, ListingRecord, TicketRecord};

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += chrono::Duration::from_std(by).unwrap();
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// In-memory ledger node with call counting and failure injection
pub struct MockSource {
    accounts: Mutex<Vec<RawAccount>>,
    honor_filters: bool,
    failing: AtomicBool,
    pub program_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
}

impl MockSource {
    pub fn new(accounts: Vec<RawAccount>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            honor_filters: true,
            failing: AtomicBool::new(false),
            program_calls: AtomicUsize::new(0),
            account_calls: AtomicUsize::new(0),
        }
    }

    /// Return every stored account regardless of the requested filters
    pub fn ignoring_filters(mut self) -> Self {
        self.honor_filters = false;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn push(&self, account: RawAccount) {
        self.accounts.lock().unwrap().push(account);
    }

    pub fn program_calls(&self) -> usize {
        self.program_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountSource for MockSource {
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, FetchError> {
        self.program_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::RateLimited);
        }
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .filter(|account| &account.owner == program_id)
            .filter(|account| {
                !self.honor_filters || filters.iter().all(|filter| filter.matches(&account.data))
            })
            .cloned()
            .collect())
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, FetchError> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Timeout(std::time::Duration::from_secs(30)));
        }
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|account| &account.address == address).cloned())
    }
}

pub fn account<T: AccountRecord>(program_id: Pubkey, address: Pubkey, record: &T) -> RawAccount {
    RawAccount::new(address, program_id, 2_000_000, encode(record).unwrap())
}

pub fn tier(tier_type: TierType, price: u64, supply: u32, minted: u32) -> TicketTier {
    TicketTier {
        tier_type,
        price,
        supply,
        minted,
        is_on_sale: true,
    }
}

pub fn event_record(name: &str, start: i64, end: i64) -> EventRecord {
    EventRecord {
        authority: [7; 32],
        name: name.to_string(),
        description: format!("{} description", name),
        venue: "Main Hall".to_string(),
        symbol: "EVT".to_string(),
        metadata_uri: format!("https://meta.example/{}.json", name),
        event_start: start,
        event_end: end,
        is_active: true,
        is_cancelled: false,
        ticket_tiers: vec![
            tier(TierType::GeneralAdmission, 100_000_000, 100, 5),
            tier(TierType::Vip, 1_000_000_000, 10, 0),
        ],
        total_minted: 5,
        total_checked_in: 0,
        total_revenue: 500_000_000,
        resale_allowed: true,
        max_resale_price: Some(150_000_000),
        whitelist_gated: false,
        poa_enabled: true,
        royalty_bps: 500,
        bump: 255,
    }
}

pub fn ticket_record(event: &Pubkey, owner: &Pubkey, number: u64, minted_at: i64) -> TicketRecord {
    TicketRecord {
        event: event.to_bytes(),
        owner: owner.to_bytes(),
        ticket_number: number,
        tier_index: 0,
        tier_type: TierType::GeneralAdmission,
        price_paid: 100_000_000,
        metadata_uri: format!("ipfs://ticket/{}", number),
        is_checked_in: false,
        is_listed: false,
        listed_price: None,
        minted_at,
        bump: 254,
    }
}

pub fn listing_record(ticket: &Pubkey, event: &Pubkey, seller: &Pubkey, price: u64, listed_at: i64) -> ListingRecord {
    ListingRecord {
        ticket: ticket.to_bytes(),
        event: event.to_bytes(),
        seller: seller.to_bytes(),
        price,
        listed_at,
        bump: 253,
    }
}
