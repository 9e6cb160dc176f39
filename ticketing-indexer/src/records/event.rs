//! Event account layout

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::{AccountRecord, Schema};

/// Offset of `EventRecord::authority` in raw account data
pub const AUTHORITY_OFFSET: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierType {
    GeneralAdmission,
    EarlyBird,
    Vip,
    Backstage,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TicketTier {
    pub tier_type: TierType,
    /// Price in lamports
    pub price: u64,
    pub supply: u32,
    pub minted: u32,
    pub is_on_sale: bool,
}

impl TicketTier {
    /// Remaining supply, clamped at zero
    pub fn available(&self) -> u32 {
        self.supply.saturating_sub(self.minted)
    }

    pub fn is_sold_out(&self) -> bool {
        self.available() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct EventRecord {
    pub authority: [u8; 32],
    pub name: String,
    pub description: String,
    pub venue: String,
    pub symbol: String,
    pub metadata_uri: String,
    /// Unix seconds
    pub event_start: i64,
    /// Unix seconds
    pub event_end: i64,
    pub is_active: bool,
    pub is_cancelled: bool,
    pub ticket_tiers: Vec<TicketTier>,
    pub total_minted: u64,
    pub total_checked_in: u64,
    /// Lamports
    pub total_revenue: u64,
    pub resale_allowed: bool,
    pub max_resale_price: Option<u64>,
    pub whitelist_gated: bool,
    pub poa_enabled: bool,
    pub royalty_bps: u16,
    pub bump: u8,
}

impl AccountRecord for EventRecord {
    const SCHEMA: Schema = Schema::Event;
}

impl EventRecord {
    /// Active, not cancelled, and `event_start <= now < event_end`
    pub fn is_live_at(&self, now: i64) -> bool {
        self.is_active && !self.is_cancelled && self.event_start <= now && now < self.event_end
    }

    pub fn total_supply(&self) -> u64 {
        self.ticket_tiers.iter().map(|tier| tier.supply as u64).sum()
    }

    /// Whether a resale at `price` would respect the event's resale policy
    pub fn allows_resale_at(&self, price: u64) -> bool {
        self.resale_allowed && self.max_resale_price.map_or(true, |max| price <= max)
    }
}
