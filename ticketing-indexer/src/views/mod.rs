//! Display-ready projections of decoded records
//!
//! Lamport amounts stay integers everywhere else; the conversion to SOL
//! happens only here.

pub mod event;
pub mod listing;
pub mod ticket;

use chrono::{DateTime, SecondsFormat};
use solana_sdk::pubkey::Pubkey;

pub use event::{filter_active_events, is_event_active, to_event_view, EventView, TicketTierView};
pub use listing::{to_listing_view, ListingView};
pub use ticket::{to_ticket_view, TicketStatus, TicketView};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Lamports to SOL for display
pub fn lamports_to_sol(lamports: u128) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Unix seconds as an RFC 3339 UTC string, `None` when out of range
pub fn format_timestamp(unix_seconds: i64) -> Option<String> {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Base58 form of a raw 32-byte key
pub(crate) fn key(bytes: &[u8; 32]) -> String {
    Pubkey::new_from_array(*bytes).to_string()
}
