//! Marketplace listing projection

use serde::{Deserialize, Serialize};

use super::{format_timestamp, key, lamports_to_sol};
use crate::core::types::AccountMeta;
use crate::records::ListingRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub address: String,
    pub ticket: String,
    pub event: String,
    pub seller: String,
    pub price_lamports: u64,
    pub price_sol: f64,
    pub listed_at: i64,
    pub listed_at_iso: Option<String>,
    /// Filled in when the owning event is known to the caller
    pub event_name: Option<String>,
}

impl ListingView {
    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = Some(name.into());
        self
    }
}

pub fn to_listing_view(record: &ListingRecord, meta: &AccountMeta) -> ListingView {
    ListingView {
        address: meta.address.to_string(),
        ticket: key(&record.ticket),
        event: key(&record.event),
        seller: key(&record.seller),
        price_lamports: record.price,
        price_sol: lamports_to_sol(record.price as u128),
        listed_at: record.listed_at,
        listed_at_iso: format_timestamp(record.listed_at),
        event_name: None,
    }
}
