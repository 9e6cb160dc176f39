//! Record fetcher: program account queries plus per-record decoding
//!
//! Batch reads decode every returned account independently. An account that
//! fails to decode is logged and reported in [`DecodedBatch::skipped`]; it
//! never aborts the batch. Transport failures abort the whole call.

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::core::error::{DecodeError, FetchError, IndexerError, IndexerResult};
use crate::core::traits::AccountSource;
use crate::core::types::{AccountFilter, AccountMeta, RawAccount};
use crate::records::{self, event, listing, ticket, AccountRecord, EventRecord, ListingRecord, Schema, TicketRecord};

/// Decoded records of one schema with the accounts that were skipped
#[derive(Debug)]
pub struct DecodedBatch<T> {
    pub records: Vec<(AccountMeta, T)>,
    pub skipped: Vec<(Pubkey, DecodeError)>,
}

impl<T> DecodedBatch<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for DecodedBatch<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Decode each account as `T`, skipping and logging the ones that fail
pub fn decode_accounts<T: AccountRecord>(accounts: Vec<RawAccount>) -> DecodedBatch<T> {
    let mut batch = DecodedBatch::default();
    for account in accounts {
        match records::decode::<T>(&account.data) {
            Ok(record) => batch.records.push((account.meta(), record)),
            Err(e) => {
                warn!("Skipping account {}: {}", account.address, e);
                batch.skipped.push((account.address, e));
            }
        }
    }
    batch
}

/// Filter matching the discriminator of `schema` at offset 0
pub fn discriminator_filter(schema: Schema) -> AccountFilter {
    AccountFilter::memcmp(0, schema.discriminator().to_vec())
}

pub struct RecordFetcher<S> {
    source: S,
    program_id: Pubkey,
}

impl<S: AccountSource> RecordFetcher<S> {
    pub fn new(source: S, program_id: Pubkey) -> Self {
        Self { source, program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// All program accounts, optionally narrowed to one schema's discriminator
    pub async fn fetch_raw(
        &self,
        schema: Option<Schema>,
        extra_filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, FetchError> {
        let mut filters = Vec::with_capacity(extra_filters.len() + 1);
        if let Some(schema) = schema {
            filters.push(discriminator_filter(schema));
        }
        filters.extend_from_slice(extra_filters);

        let accounts = self
            .source
            .get_program_accounts(&self.program_id, &filters)
            .await?;
        debug!(
            "Fetched {} raw accounts (schema: {:?}, filters: {})",
            accounts.len(),
            schema.map(|s| s.name()),
            filters.len()
        );
        Ok(accounts)
    }

    async fn fetch_decoded<T: AccountRecord>(
        &self,
        extra_filters: &[AccountFilter],
    ) -> Result<DecodedBatch<T>, FetchError> {
        let accounts = self.fetch_raw(Some(T::SCHEMA), extra_filters).await?;
        Ok(decode_accounts(accounts))
    }

    pub async fn fetch_events(&self) -> Result<DecodedBatch<EventRecord>, FetchError> {
        self.fetch_decoded(&[]).await
    }

    pub async fn fetch_events_by_authority(
        &self,
        authority: &Pubkey,
    ) -> Result<DecodedBatch<EventRecord>, FetchError> {
        self.fetch_decoded(&[AccountFilter::memcmp(event::AUTHORITY_OFFSET, authority.to_bytes())])
            .await
    }

    pub async fn fetch_tickets_by_owner(
        &self,
        owner: &Pubkey,
    ) -> Result<DecodedBatch<TicketRecord>, FetchError> {
        self.fetch_decoded(&[AccountFilter::memcmp(ticket::OWNER_OFFSET, owner.to_bytes())])
            .await
    }

    pub async fn fetch_tickets_for_event(
        &self,
        event: &Pubkey,
    ) -> Result<DecodedBatch<TicketRecord>, FetchError> {
        self.fetch_decoded(&[AccountFilter::memcmp(ticket::EVENT_OFFSET, event.to_bytes())])
            .await
    }

    pub async fn fetch_listings(&self) -> Result<DecodedBatch<ListingRecord>, FetchError> {
        self.fetch_decoded(&[]).await
    }

    pub async fn fetch_listings_for_event(
        &self,
        event: &Pubkey,
    ) -> Result<DecodedBatch<ListingRecord>, FetchError> {
        self.fetch_decoded(&[AccountFilter::memcmp(listing::EVENT_OFFSET, event.to_bytes())])
            .await
    }

    pub async fn fetch_listings_by_seller(
        &self,
        seller: &Pubkey,
    ) -> Result<DecodedBatch<ListingRecord>, FetchError> {
        self.fetch_decoded(&[AccountFilter::memcmp(listing::SELLER_OFFSET, seller.to_bytes())])
            .await
    }

    /// A single record by address.
    ///
    /// Missing accounts and accounts owned by another program are `NotFound`.
    pub async fn fetch_one<T: AccountRecord>(
        &self,
        address: &Pubkey,
    ) -> IndexerResult<(AccountMeta, T)> {
        let account = self
            .source
            .get_account(address)
            .await?
            .filter(|account| account.owner == self.program_id)
            .ok_or_else(|| IndexerError::not_found(T::SCHEMA.name(), address))?;

        let record = records::decode::<T>(&account.data)?;
        Ok((account.meta(), record))
    }

    pub async fn fetch_event(&self, address: &Pubkey) -> IndexerResult<(AccountMeta, EventRecord)> {
        self.fetch_one(address).await
    }

    pub async fn fetch_ticket(&self, address: &Pubkey) -> IndexerResult<(AccountMeta, TicketRecord)> {
        self.fetch_one(address).await
    }

    pub async fn fetch_listing(
        &self,
        address: &Pubkey,
    ) -> IndexerResult<(AccountMeta, ListingRecord)> {
        self.fetch_one(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DecodeFailure;

    fn listing_account(data: Vec<u8>) -> RawAccount {
        RawAccount::new(Pubkey::new_unique(), Pubkey::new_unique(), 1_000, data)
    }

    #[test]
    fn test_decode_accounts_skips_bad_records() {
        let listing = ListingRecord {
            ticket: [1; 32],
            event: [2; 32],
            seller: [3; 32],
            price: 10,
            listed_at: 20,
            bump: 1,
        };
        let good = listing_account(records::encode(&listing).unwrap());
        let short = listing_account(vec![1, 2]);
        let short_address = short.address;

        let batch = decode_accounts::<ListingRecord>(vec![good.clone(), short]);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records[0].0, good.meta());
        assert_eq!(batch.records[0].1, listing);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].0, short_address);
        assert_eq!(batch.skipped[0].1.reason, DecodeFailure::TooShort);
    }

    #[test]
    fn test_discriminator_filter_targets_offset_zero() {
        let filter = discriminator_filter(Schema::Ticket);
        assert_eq!(
            filter,
            AccountFilter::memcmp(0, Schema::Ticket.discriminator().to_vec())
        );
        let mut data = Schema::Ticket.discriminator().to_vec();
        data.push(0);
        assert!(filter.matches(&data));
        assert!(!discriminator_filter(Schema::Event).matches(&data));
    }
}
