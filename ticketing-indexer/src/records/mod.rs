//! On-chain account layouts and the discriminator-checked decoder
//!
//! Every account owned by the ticketing program starts with an 8-byte tag,
//! the first 8 bytes of `sha256("account:<TypeName>")`, followed by the
//! borsh-encoded body. Trailing bytes are allocation padding and are ignored.

pub mod event;
pub mod listing;
pub mod ticket;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::hash::hash;
use std::fmt;

use crate::core::error::{DecodeError, DecodeFailure};

pub use event::{EventRecord, TicketTier, TierType};
pub use listing::ListingRecord;
pub use ticket::TicketRecord;

pub const DISCRIMINATOR_LEN: usize = 8;

/// Account schemas owned by the ticketing program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    Event,
    Ticket,
    Listing,
}

impl Schema {
    pub const ALL: [Schema; 3] = [Schema::Event, Schema::Ticket, Schema::Listing];

    /// Account type name the discriminator is derived from
    pub fn name(&self) -> &'static str {
        match self {
            Schema::Event => "EventAccount",
            Schema::Ticket => "TicketAccount",
            Schema::Listing => "ListingAccount",
        }
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        let digest = hash(format!("account:{}", self.name()).as_bytes()).to_bytes();
        let mut tag = [0u8; DISCRIMINATOR_LEN];
        tag.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
        tag
    }

    /// Identify the schema of raw account data from its leading tag
    pub fn detect(data: &[u8]) -> Option<Schema> {
        let tag = data.get(..DISCRIMINATOR_LEN)?;
        Schema::ALL
            .into_iter()
            .find(|schema| schema.discriminator() == tag)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binds a record type to its schema
pub trait AccountRecord: BorshDeserialize + BorshSerialize {
    const SCHEMA: Schema;
}

/// Decode `data` as `T`, checking the discriminator first.
///
/// Never returns a partially populated record.
pub fn decode<T: AccountRecord>(data: &[u8]) -> Result<T, DecodeError> {
    decode_as(T::SCHEMA, data)
}

fn decode_as<T: BorshDeserialize>(schema: Schema, data: &[u8]) -> Result<T, DecodeError> {
    let fail = |reason| DecodeError::new(schema.name(), data.len(), reason);

    if data.len() < DISCRIMINATOR_LEN {
        return Err(fail(DecodeFailure::TooShort));
    }
    let (tag, mut body) = data.split_at(DISCRIMINATOR_LEN);

    let expected = schema.discriminator();
    if tag != expected {
        let mut found = [0u8; DISCRIMINATOR_LEN];
        found.copy_from_slice(tag);
        return Err(fail(DecodeFailure::DiscriminatorMismatch { expected, found }));
    }

    T::deserialize(&mut body).map_err(|e| fail(DecodeFailure::Malformed(e.to_string())))
}

/// Encode `record` with its discriminator, as the program lays it out
pub fn encode<T: AccountRecord>(record: &T) -> std::io::Result<Vec<u8>> {
    let mut data = T::SCHEMA.discriminator().to_vec();
    record.serialize(&mut data)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminators_are_distinct() {
        let event = Schema::Event.discriminator();
        let ticket = Schema::Ticket.discriminator();
        let listing = Schema::Listing.discriminator();
        assert_ne!(event, ticket);
        assert_ne!(event, listing);
        assert_ne!(ticket, listing);
    }

    #[test]
    fn test_detect_schema() {
        let mut data = Schema::Listing.discriminator().to_vec();
        data.extend_from_slice(&[0u8; 16]);
        assert_eq!(Schema::detect(&data), Some(Schema::Listing));
        assert_eq!(Schema::detect(&[1, 2, 3]), None);
        assert_eq!(Schema::detect(&[0u8; 8]), None);
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let err = decode::<ListingRecord>(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.reason, DecodeFailure::TooShort);
        assert_eq!(err.schema, "ListingAccount");
        assert_eq!(err.len, 3);
    }

    #[test]
    fn test_decode_rejects_truncated_body() {
        let listing = ListingRecord {
            ticket: [1; 32],
            event: [2; 32],
            seller: [3; 32],
            price: 1_000,
            listed_at: 1_700_000_000,
            bump: 255,
        };
        let data = encode(&listing).unwrap();
        let err = decode::<ListingRecord>(&data[..data.len() - 4]).unwrap_err();
        assert!(matches!(err.reason, DecodeFailure::Malformed(_)));
    }

    #[test]
    fn test_decode_ignores_trailing_padding() {
        let listing = ListingRecord {
            ticket: [1; 32],
            event: [2; 32],
            seller: [3; 32],
            price: 5,
            listed_at: 10,
            bump: 1,
        };
        let mut data = encode(&listing).unwrap();
        data.extend_from_slice(&[0u8; 64]);
        assert_eq!(decode::<ListingRecord>(&data).unwrap(), listing);
    }
}
