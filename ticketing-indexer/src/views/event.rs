//! Event listing projection

use serde::{Deserialize, Serialize};

use super::{format_timestamp, key, lamports_to_sol};
use crate::core::types::AccountMeta;
use crate::records::{EventRecord, TicketTier, TierType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTierView {
    pub index: usize,
    pub tier_type: TierType,
    pub price_lamports: u64,
    pub price_sol: f64,
    pub supply: u32,
    pub minted: u32,
    pub available: u32,
    pub sold_out: bool,
    pub on_sale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub address: String,
    pub authority: String,
    pub name: String,
    pub description: String,
    pub venue: String,
    pub symbol: String,
    pub metadata_uri: String,
    pub event_start: i64,
    pub event_end: i64,
    pub event_start_iso: Option<String>,
    pub event_end_iso: Option<String>,
    pub is_active: bool,
    pub is_cancelled: bool,
    pub tiers: Vec<TicketTierView>,
    pub total_supply: u64,
    pub total_minted: u64,
    pub total_checked_in: u64,
    pub total_revenue_lamports: u64,
    pub total_revenue_sol: f64,
    pub resale_allowed: bool,
    pub max_resale_price_sol: Option<f64>,
    pub whitelist_gated: bool,
    pub poa_enabled: bool,
    pub royalty_bps: u16,
    pub lamports: u64,
    pub data_len: usize,
}

fn to_tier_view(index: usize, tier: &TicketTier) -> TicketTierView {
    TicketTierView {
        index,
        tier_type: tier.tier_type,
        price_lamports: tier.price,
        price_sol: lamports_to_sol(tier.price as u128),
        supply: tier.supply,
        minted: tier.minted,
        available: tier.available(),
        sold_out: tier.is_sold_out(),
        on_sale: tier.is_on_sale,
    }
}

pub fn to_event_view(record: &EventRecord, meta: &AccountMeta) -> EventView {
    EventView {
        address: meta.address.to_string(),
        authority: key(&record.authority),
        name: record.name.clone(),
        description: record.description.clone(),
        venue: record.venue.clone(),
        symbol: record.symbol.clone(),
        metadata_uri: record.metadata_uri.clone(),
        event_start: record.event_start,
        event_end: record.event_end,
        event_start_iso: format_timestamp(record.event_start),
        event_end_iso: format_timestamp(record.event_end),
        is_active: record.is_active,
        is_cancelled: record.is_cancelled,
        tiers: record
            .ticket_tiers
            .iter()
            .enumerate()
            .map(|(index, tier)| to_tier_view(index, tier))
            .collect(),
        total_supply: record.total_supply(),
        total_minted: record.total_minted,
        total_checked_in: record.total_checked_in,
        total_revenue_lamports: record.total_revenue,
        total_revenue_sol: lamports_to_sol(record.total_revenue as u128),
        resale_allowed: record.resale_allowed,
        max_resale_price_sol: record.max_resale_price.map(|p| lamports_to_sol(p as u128)),
        whitelist_gated: record.whitelist_gated,
        poa_enabled: record.poa_enabled,
        royalty_bps: record.royalty_bps,
        lamports: meta.lamports,
        data_len: meta.data_len,
    }
}

/// Re-evaluated on every call; `now` is unix seconds
pub fn is_event_active(record: &EventRecord, now: i64) -> bool {
    record.is_live_at(now)
}

/// Views of the events live at `now`, soonest-ending first
pub fn filter_active_events<'a, I>(records: I, now: i64) -> Vec<EventView>
where
    I: IntoIterator<Item = &'a (AccountMeta, EventRecord)>,
{
    let mut views: Vec<EventView> = records
        .into_iter()
        .filter(|(_, record)| is_event_active(record, now))
        .map(|(meta, record)| to_event_view(record, meta))
        .collect();
    views.sort_by_key(|view| view.event_end);
    views
}
