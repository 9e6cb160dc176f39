//! Ticket account layout

use borsh::{BorshDeserialize, BorshSerialize};

use super::event::TierType;
use super::{AccountRecord, Schema};

/// Offset of `TicketRecord::event` in raw account data
pub const EVENT_OFFSET: usize = 8;
/// Offset of `TicketRecord::owner` in raw account data
pub const OWNER_OFFSET: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TicketRecord {
    pub event: [u8; 32],
    pub owner: [u8; 32],
    pub ticket_number: u64,
    pub tier_index: u8,
    pub tier_type: TierType,
    /// Lamports
    pub price_paid: u64,
    pub metadata_uri: String,
    pub is_checked_in: bool,
    pub is_listed: bool,
    pub listed_price: Option<u64>,
    /// Unix seconds
    pub minted_at: i64,
    pub bump: u8,
}

impl AccountRecord for TicketRecord {
    const SCHEMA: Schema = Schema::Ticket;
}
