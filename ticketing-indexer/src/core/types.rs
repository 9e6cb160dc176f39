//! Core domain types

use solana_sdk::pubkey::Pubkey;

/// A program-owned account as returned by the ledger node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub address: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub data_len: usize,
    pub data: Vec<u8>,
}

impl RawAccount {
    pub fn new(address: Pubkey, owner: Pubkey, lamports: u64, data: Vec<u8>) -> Self {
        Self {
            address,
            owner,
            lamports,
            data_len: data.len(),
            data,
        }
    }

    pub fn meta(&self) -> AccountMeta {
        AccountMeta {
            address: self.address,
            lamports: self.lamports,
            data_len: self.data_len,
        }
    }
}

/// Account metadata carried alongside a decoded record into the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub address: Pubkey,
    pub lamports: u64,
    pub data_len: usize,
}

/// Server-side account filter for `getProgramAccounts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    /// Match `bytes` at `offset` in the account data
    Memcmp { offset: usize, bytes: Vec<u8> },
    /// Match accounts with exactly this data length
    DataSize(u64),
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        AccountFilter::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Whether `data` satisfies this filter, with node semantics
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::Memcmp { offset, bytes } => data
                .get(*offset..offset + bytes.len())
                .map(|window| window == bytes.as_slice())
                .unwrap_or(false),
            AccountFilter::DataSize(size) => data.len() as u64 == *size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memcmp_matches_at_offset() {
        let filter = AccountFilter::memcmp(2, vec![7, 8]);
        assert!(filter.matches(&[0, 0, 7, 8, 9]));
        assert!(!filter.matches(&[0, 7, 8]));
        assert!(!filter.matches(&[0, 0, 7]));
    }

    #[test]
    fn test_raw_account_meta() {
        let account = RawAccount::new(Pubkey::new_unique(), Pubkey::new_unique(), 42, vec![1, 2, 3]);
        let meta = account.meta();
        assert_eq!(meta.lamports, 42);
        assert_eq!(meta.data_len, 3);
        assert_eq!(meta.address, account.address);
    }
}
