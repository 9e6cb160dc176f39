//! Read-model services
//!
//! `ReadModel` is the composition root for the read path: it owns the
//! fetcher, the clock, and the platform stats cache.

pub mod cache;
pub mod stats;

use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::IndexerConfig;
use crate::core::error::{FetchError, IndexerError, IndexerResult};
use crate::core::traits::{AccountSource, Clock, SystemClock};
use crate::fetcher::RecordFetcher;
use crate::records::Schema;
use crate::views::{
    filter_active_events, to_event_view, to_listing_view, to_ticket_view, EventView, ListingView,
    TicketView,
};

pub use cache::{ReadThroughCache, Snapshot};
pub use stats::{aggregate_accounts, aggregate_events, PlatformStats, StatsResponse};

/// Parse a base58 address supplied by a caller
pub fn parse_address(value: &str) -> IndexerResult<Pubkey> {
    Pubkey::from_str(value).map_err(|_| IndexerError::InvalidAddress(value.to_string()))
}

/// Collapse a failed read into an empty result, logging why
pub fn degrade<T: Default>(result: IndexerResult<T>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!("{} unavailable this cycle: {}", what, e);
        T::default()
    })
}

pub struct ReadModel<S> {
    fetcher: Arc<RecordFetcher<S>>,
    clock: Arc<dyn Clock>,
    stats_cache: ReadThroughCache<PlatformStats>,
}

impl<S: AccountSource + 'static> ReadModel<S> {
    pub fn new(source: S, program_id: Pubkey, stats_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher: Arc::new(RecordFetcher::new(source, program_id)),
            stats_cache: ReadThroughCache::new("platform_stats", stats_ttl, clock.clone()),
            clock,
        }
    }

    pub fn from_config(source: S, config: &IndexerConfig) -> IndexerResult<Self> {
        let program_id = config
            .program_id()
            .map_err(|e| IndexerError::Configuration(e.to_string()))?;
        info!(
            "Read model for program {} (stats ttl {}s)",
            program_id, config.cache.stats_ttl_secs
        );
        Ok(Self::new(
            source,
            program_id,
            config.cache.stats_ttl(),
            Arc::new(SystemClock),
        ))
    }

    pub fn fetcher(&self) -> &RecordFetcher<S> {
        &self.fetcher
    }

    pub fn stats_cache(&self) -> &ReadThroughCache<PlatformStats> {
        &self.stats_cache
    }

    fn now_unix(&self) -> i64 {
        self.clock.now().timestamp()
    }

    /// Platform totals through the stats cache; fetch failures surface as `Err`
    ///
    /// The refresh runs on its own task, so dropping this future does not
    /// abandon a scan other readers are waiting on.
    pub async fn try_platform_stats(&self) -> Result<PlatformStats, FetchError> {
        let fetcher = Arc::clone(&self.fetcher);
        self.stats_cache
            .get_or_refresh(move || async move {
                let accounts = fetcher.fetch_raw(Some(Schema::Event), &[]).await?;
                Ok(aggregate_accounts(&accounts))
            })
            .await
    }

    /// Platform totals, zeroed when the node cannot be reached
    pub async fn platform_stats(&self) -> PlatformStats {
        self.try_platform_stats().await.unwrap_or_else(|e| {
            warn!("Platform stats unavailable, returning zeroes: {}", e);
            PlatformStats::zeroed()
        })
    }

    pub async fn stats_response(&self) -> StatsResponse {
        self.platform_stats().await.to_response()
    }

    /// Every decodable event, earliest start first
    pub async fn all_events(&self) -> IndexerResult<Vec<EventView>> {
        let batch = self.fetcher.fetch_events().await?;
        let mut views: Vec<EventView> = batch
            .records
            .iter()
            .map(|(meta, record)| to_event_view(record, meta))
            .collect();
        views.sort_by_key(|view| view.event_start);
        Ok(views)
    }

    /// Events live right now
    pub async fn active_events(&self) -> IndexerResult<Vec<EventView>> {
        let batch = self.fetcher.fetch_events().await?;
        Ok(filter_active_events(&batch.records, self.now_unix()))
    }

    pub async fn event(&self, address: &Pubkey) -> IndexerResult<EventView> {
        let (meta, record) = self.fetcher.fetch_event(address).await?;
        Ok(to_event_view(&record, &meta))
    }

    pub async fn events_by_authority(&self, authority: &Pubkey) -> IndexerResult<Vec<EventView>> {
        let batch = self.fetcher.fetch_events_by_authority(authority).await?;
        Ok(batch
            .records
            .iter()
            .map(|(meta, record)| to_event_view(record, meta))
            .collect())
    }

    /// Tickets held by `owner`, newest mint first
    pub async fn tickets_by_owner(&self, owner: &Pubkey) -> IndexerResult<Vec<TicketView>> {
        let batch = self.fetcher.fetch_tickets_by_owner(owner).await?;
        let mut views: Vec<TicketView> = batch
            .records
            .iter()
            .map(|(meta, record)| to_ticket_view(record, meta))
            .collect();
        views.sort_by(|a, b| b.minted_at.cmp(&a.minted_at));
        Ok(views)
    }

    /// Tickets of one event in sequence order
    pub async fn tickets_for_event(&self, event: &Pubkey) -> IndexerResult<Vec<TicketView>> {
        let batch = self.fetcher.fetch_tickets_for_event(event).await?;
        let mut views: Vec<TicketView> = batch
            .records
            .iter()
            .map(|(meta, record)| to_ticket_view(record, meta))
            .collect();
        views.sort_by_key(|view| view.ticket_number);
        Ok(views)
    }

    pub async fn ticket(&self, address: &Pubkey) -> IndexerResult<TicketView> {
        let (meta, record) = self.fetcher.fetch_ticket(address).await?;
        Ok(to_ticket_view(&record, &meta))
    }

    /// All resale listings, newest first, labelled with their event's name
    pub async fn marketplace_listings(&self) -> IndexerResult<Vec<ListingView>> {
        let listings = self.fetcher.fetch_listings().await?;
        if listings.is_empty() {
            return Ok(Vec::new());
        }

        let events = self.fetcher.fetch_events().await?;
        let names: HashMap<[u8; 32], &str> = events
            .records
            .iter()
            .map(|(meta, record)| (meta.address.to_bytes(), record.name.as_str()))
            .collect();

        let mut views: Vec<ListingView> = listings
            .records
            .iter()
            .map(|(meta, record)| {
                let view = to_listing_view(record, meta);
                match names.get(&record.event) {
                    Some(name) => view.with_event_name(*name),
                    None => view,
                }
            })
            .collect();
        views.sort_by(|a, b| b.listed_at.cmp(&a.listed_at));
        Ok(views)
    }

    /// Resale listings for one event, cheapest first
    pub async fn listings_for_event(&self, event: &Pubkey) -> IndexerResult<Vec<ListingView>> {
        let listings = self.fetcher.fetch_listings_for_event(event).await?;
        let mut views: Vec<ListingView> = listings
            .records
            .iter()
            .map(|(meta, record)| to_listing_view(record, meta))
            .collect();
        views.sort_by_key(|view| view.price_lamports);
        Ok(views)
    }
}
