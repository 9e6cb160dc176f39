//! Resale listing account layout

use borsh::{BorshDeserialize, BorshSerialize};

use super::{AccountRecord, Schema};

pub const TICKET_OFFSET: usize = 8;
pub const EVENT_OFFSET: usize = 40;
pub const SELLER_OFFSET: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ListingRecord {
    pub ticket: [u8; 32],
    pub event: [u8; 32],
    pub seller: [u8; 32],
    /// Asking price in lamports
    pub price: u64,
    /// Unix seconds
    pub listed_at: i64,
    pub bump: u8,
}

impl AccountRecord for ListingRecord {
    const SCHEMA: Schema = Schema::Listing;
}
