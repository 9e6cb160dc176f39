//! Platform-wide totals over every event account

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::DecodeError;
use crate::core::types::RawAccount;
use crate::records::{self, EventRecord};
use crate::views::lamports_to_sol;

/// Aggregate over all non-cancelled events. Not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformStats {
    pub total_events: u64,
    pub total_tickets_sold: u128,
    pub total_revenue_lamports: u128,
    pub total_checkins: u128,
}

impl PlatformStats {
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: &EventRecord) {
        self.total_events += 1;
        self.total_tickets_sold += event.total_minted as u128;
        self.total_revenue_lamports += event.total_revenue as u128;
        self.total_checkins += event.total_checked_in as u128;
    }

    pub fn to_response(&self) -> StatsResponse {
        StatsResponse {
            total_events: self.total_events,
            total_tickets_sold: self.total_tickets_sold,
            total_revenue_lamports: self.total_revenue_lamports,
            total_revenue_sol: lamports_to_sol(self.total_revenue_lamports),
            total_checkins: self.total_checkins,
        }
    }
}

/// Wire shape of the stats endpoint
///
/// Counters are `u128`. Serialize with `serde_json::to_string` or
/// `to_writer`: `serde_json::to_value` rejects any total above `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_events: u64,
    pub total_tickets_sold: u128,
    pub total_revenue_lamports: u128,
    pub total_revenue_sol: f64,
    pub total_checkins: u128,
}

impl From<PlatformStats> for StatsResponse {
    fn from(stats: PlatformStats) -> Self {
        stats.to_response()
    }
}

/// Fold decode results into totals: cancelled events and decode failures are skipped
pub fn aggregate_events<I>(results: I) -> PlatformStats
where
    I: IntoIterator<Item = Result<EventRecord, DecodeError>>,
{
    let mut stats = PlatformStats::zeroed();
    let mut cancelled = 0usize;
    let mut undecodable = 0usize;

    for result in results {
        match result {
            Ok(event) if event.is_cancelled => cancelled += 1,
            Ok(event) => stats.add_event(&event),
            Err(_) => undecodable += 1,
        }
    }

    debug!(
        "Aggregated {} events ({} cancelled, {} undecodable skipped)",
        stats.total_events, cancelled, undecodable
    );
    stats
}

/// Decode and aggregate raw event accounts in one pass
pub fn aggregate_accounts(accounts: &[RawAccount]) -> PlatformStats {
    aggregate_events(
        accounts
            .iter()
            .map(|account| records::decode::<EventRecord>(&account.data)),
    )
}
