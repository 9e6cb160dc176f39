//! Lightweight Solana RPC client
//!
//! Implements only the two reads the indexer needs, avoiding the dependency
//! chain of solana-client.

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RpcConfig;
use crate::core::error::FetchError;
use crate::core::traits::AccountSource;
use crate::core::types::{AccountFilter, RawAccount};

/// Lightweight RPC client for Solana
pub struct LightRpcClient {
    url: String,
    commitment: String,
    read_timeout: Duration,
    agent: ureq::Agent,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Account data response from RPC
#[derive(Debug, Deserialize)]
struct AccountInfo {
    lamports: u64,
    data: (String, String), // (data, encoding)
    owner: String,
}

/// Entry of a `getProgramAccounts` result
#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: String,
    account: AccountInfo,
}

/// `getAccountInfo` result wrapper
#[derive(Debug, Deserialize)]
struct AccountInfoResponse {
    value: Option<AccountInfo>,
}

impl LightRpcClient {
    /// Create a new lightweight RPC client
    pub fn new(url: String) -> Self {
        Self::from_config(&RpcConfig {
            url,
            ..RpcConfig::default()
        })
    }

    pub fn from_config(config: &RpcConfig) -> Self {
        let read_timeout = Duration::from_secs(config.read_timeout_secs);
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(config.connect_timeout_secs))
            .timeout_read(read_timeout)
            .build();

        Self {
            url: config.url.clone(),
            commitment: config.commitment.clone(),
            read_timeout,
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a JSON-RPC call
    async fn call<T>(&self, method: &str, params: Value) -> Result<T, FetchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {} with params: {:?}", method, params);

        // Use blocking call since ureq is sync
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = request_body.to_string();

            move || -> Result<String, ureq::Error> {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)?;
                Ok(response.into_string()?)
            }
        })
        .await
        .map_err(|e| FetchError::Transport(format!("RPC task failed: {}", e)))?
        .map_err(|e| self.classify(e))?;

        let rpc_response: RpcResponse<T> = serde_json::from_str(&response_body)?;

        if let Some(error) = rpc_response.error {
            warn!("RPC error from {}: {} {}", method, error.code, error.message);
            return Err(FetchError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response
            .result
            .ok_or_else(|| FetchError::InvalidResponse("No result in RPC response".to_string()))
    }

    fn classify(&self, err: ureq::Error) -> FetchError {
        match err {
            ureq::Error::Status(429, _) => FetchError::RateLimited,
            ureq::Error::Status(code, response) => {
                FetchError::Transport(format!("HTTP {} {}", code, response.status_text()))
            }
            ureq::Error::Transport(transport) => {
                let message = transport.to_string();
                if message.contains("timed out") {
                    FetchError::Timeout(self.read_timeout)
                } else {
                    FetchError::Transport(message)
                }
            }
        }
    }

    fn encode_filters(filters: &[AccountFilter]) -> Vec<Value> {
        filters
            .iter()
            .map(|filter| match filter {
                AccountFilter::Memcmp { offset, bytes } => json!({
                    "memcmp": {
                        "offset": offset,
                        "bytes": bs58::encode(bytes).into_string(),
                    }
                }),
                AccountFilter::DataSize(size) => json!({ "dataSize": size }),
            })
            .collect()
    }

    fn into_raw_account(address: Pubkey, info: AccountInfo) -> Result<RawAccount, FetchError> {
        if info.data.1 != "base64" {
            return Err(FetchError::InvalidResponse(format!(
                "Unsupported data encoding: {}",
                info.data.1
            )));
        }
        let data = base64::engine::general_purpose::STANDARD.decode(&info.data.0)?;
        let owner = parse_pubkey(&info.owner)?;

        Ok(RawAccount::new(address, owner, info.lamports, data))
    }
}

fn parse_pubkey(value: &str) -> Result<Pubkey, FetchError> {
    Pubkey::from_str(value)
        .map_err(|e| FetchError::InvalidResponse(format!("Failed to parse pubkey {}: {}", value, e)))
}

#[async_trait]
impl AccountSource for LightRpcClient {
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<RawAccount>, FetchError> {
        let params = json!([
            program_id.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment,
                "filters": Self::encode_filters(filters),
            }
        ]);

        let response: Vec<KeyedAccount> = self.call("getProgramAccounts", params).await?;

        let accounts = response
            .into_iter()
            .map(|keyed| {
                let address = parse_pubkey(&keyed.pubkey)?;
                Self::into_raw_account(address, keyed.account)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "getProgramAccounts returned {} accounts for {}",
            accounts.len(),
            program_id
        );
        Ok(accounts)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<RawAccount>, FetchError> {
        let params = json!([
            address.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment,
            }
        ]);

        let response: AccountInfoResponse = self.call("getAccountInfo", params).await?;

        response
            .value
            .map(|info| Self::into_raw_account(*address, info))
            .transpose()
    }
}
