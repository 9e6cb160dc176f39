//! Owned-ticket projection

use serde::{Deserialize, Serialize};

use super::{format_timestamp, key, lamports_to_sol};
use crate::core::types::AccountMeta;
use crate::records::{TicketRecord, TierType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Valid,
    CheckedIn,
    Listed,
    /// Never derived from the record itself; see [`TicketView::with_expiry`]
    Expired,
}

impl TicketStatus {
    /// Status from the record's flags; a checked-in ticket stays checked in
    pub fn from_flags(is_checked_in: bool, is_listed: bool) -> Self {
        if is_checked_in {
            TicketStatus::CheckedIn
        } else if is_listed {
            TicketStatus::Listed
        } else {
            TicketStatus::Valid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketView {
    pub address: String,
    pub event: String,
    pub owner: String,
    pub ticket_number: u64,
    pub tier_index: u8,
    pub tier_type: TierType,
    pub price_paid_lamports: u64,
    pub price_paid_sol: f64,
    pub metadata_uri: String,
    pub is_checked_in: bool,
    pub is_listed: bool,
    pub listed_price_sol: Option<f64>,
    pub minted_at: i64,
    pub minted_at_iso: Option<String>,
    pub status: TicketStatus,
}

impl TicketView {
    /// Apply a caller-decided expiry. Checked-in tickets keep their status.
    pub fn with_expiry(mut self, expired: bool) -> Self {
        if expired && self.status != TicketStatus::CheckedIn {
            self.status = TicketStatus::Expired;
        }
        self
    }
}

pub fn to_ticket_view(record: &TicketRecord, meta: &AccountMeta) -> TicketView {
    TicketView {
        address: meta.address.to_string(),
        event: key(&record.event),
        owner: key(&record.owner),
        ticket_number: record.ticket_number,
        tier_index: record.tier_index,
        tier_type: record.tier_type,
        price_paid_lamports: record.price_paid,
        price_paid_sol: lamports_to_sol(record.price_paid as u128),
        metadata_uri: record.metadata_uri.clone(),
        is_checked_in: record.is_checked_in,
        is_listed: record.is_listed,
        listed_price_sol: record.listed_price.map(|p| lamports_to_sol(p as u128)),
        minted_at: record.minted_at,
        minted_at_iso: format_timestamp(record.minted_at),
        status: TicketStatus::from_flags(record.is_checked_in, record.is_listed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn ticket(is_checked_in: bool, is_listed: bool) -> TicketRecord {
        TicketRecord {
            event: [1; 32],
            owner: [2; 32],
            ticket_number: 3,
            tier_index: 0,
            tier_type: TierType::GeneralAdmission,
            price_paid: 2_000_000_000,
            metadata_uri: "ipfs://t3".to_string(),
            is_checked_in,
            is_listed,
            listed_price: is_listed.then_some(2_500_000_000),
            minted_at: 0,
            bump: 250,
        }
    }

    fn meta() -> AccountMeta {
        AccountMeta {
            address: Pubkey::new_unique(),
            lamports: 1,
            data_len: 200,
        }
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(to_ticket_view(&ticket(false, false), &meta()).status, TicketStatus::Valid);
        assert_eq!(to_ticket_view(&ticket(false, true), &meta()).status, TicketStatus::Listed);
        assert_eq!(to_ticket_view(&ticket(true, false), &meta()).status, TicketStatus::CheckedIn);
        assert_eq!(to_ticket_view(&ticket(true, true), &meta()).status, TicketStatus::CheckedIn);
    }

    #[test]
    fn test_expiry_is_caller_supplied() {
        let valid = to_ticket_view(&ticket(false, false), &meta());
        assert_eq!(valid.clone().with_expiry(false).status, TicketStatus::Valid);
        assert_eq!(valid.with_expiry(true).status, TicketStatus::Expired);

        let checked_in = to_ticket_view(&ticket(true, false), &meta());
        assert_eq!(checked_in.with_expiry(true).status, TicketStatus::CheckedIn);
    }

    #[test]
    fn test_ticket_view_display_fields() {
        let view = to_ticket_view(&ticket(false, true), &meta());
        assert_eq!(view.price_paid_sol, 2.0);
        assert_eq!(view.listed_price_sol, Some(2.5));
        assert_eq!(view.owner, Pubkey::new_from_array([2; 32]).to_string());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "listed");
        assert_eq!(json["tierType"], "general_admission");
    }
}
