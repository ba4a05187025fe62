/// Test-network faucet client
///
/// The faucet answers a mint request with the hex encoding of the BCS-serialized
/// list of transactions it submitted. Only the list length is decoded here.
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::chain::json_rpc::{DiemJsonRpc, JsonRpcError};
use crate::chain::wallet::{AccountAddress, AuthenticationKey, KeyError};
use crate::config::FaucetSettings;

#[derive(Debug, Error)]
pub enum FaucetError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("faucet returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed faucet response: {0}")]
    MalformedResponse(String),
    #[error("invalid auth key: {0}")]
    InvalidAuthKey(#[from] KeyError),
    #[error("balance lookup failed: {0}")]
    JsonRpc(#[from] JsonRpcError),
    #[error("minted funds not observed for {address} within {timeout_secs}s")]
    FundsNotObserved {
        address: AccountAddress,
        timeout_secs: u64,
    },
}

impl FaucetError {
    /// Transport failures and server-side statuses are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            FaucetError::Http(_) => true,
            FaucetError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result of a successful mint request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    /// Number of transactions the faucet submitted for this request
    pub transactions: u64,
}

#[async_trait]
pub trait Faucet {
    async fn mint(
        &self,
        auth_key_hex: &str,
        amount: u64,
        currency_code: &str,
    ) -> Result<MintReceipt, FaucetError>;
}

/// Faucet backed by the Diem testnet HTTP mint endpoint
pub struct TestnetFaucet {
    client: Client,
    json_rpc: DiemJsonRpc,
    settings: FaucetSettings,
}

impl TestnetFaucet {
    pub fn new(settings: FaucetSettings) -> Result<Self, FaucetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        let json_rpc = DiemJsonRpc::new(client.clone(), settings.json_rpc_url.clone());

        Ok(Self {
            client,
            json_rpc,
            settings,
        })
    }

    async fn mint_with_retry(
        &self,
        auth_key_hex: &str,
        amount: u64,
        currency_code: &str,
    ) -> Result<MintReceipt, FaucetError> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.mint_once(auth_key_hex, amount, currency_code).await {
                Ok(receipt) => return Ok(receipt),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "Mint attempt {}/{} for {} failed: {}",
                        attempt, max_attempts, auth_key_hex, e
                    );
                    attempt += 1;
                    sleep(Duration::from_millis(self.settings.retry_delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn mint_once(
        &self,
        auth_key_hex: &str,
        amount: u64,
        currency_code: &str,
    ) -> Result<MintReceipt, FaucetError> {
        let response = self
            .client
            .post(&self.settings.faucet_url)
            .query(&[
                ("amount", amount.to_string()),
                ("auth_key", auth_key_hex.to_string()),
                ("currency_code", currency_code.to_string()),
                ("return_txns", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FaucetError::Status {
                status: status.as_u16(),
                body,
            });
        }

        decode_receipt(&body)
    }

    async fn balance(&self, address: &AccountAddress, currency_code: &str) -> Result<u64, FaucetError> {
        let account = self.json_rpc.get_account(address).await?;
        Ok(account.map(|a| a.balance(currency_code)).unwrap_or(0))
    }

    async fn wait_for_balance(
        &self,
        address: &AccountAddress,
        currency_code: &str,
        target: u64,
    ) -> Result<(), FaucetError> {
        let timeout_secs = self.settings.funds_timeout_secs;
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);

        loop {
            let balance = self.balance(address, currency_code).await?;
            if balance >= target {
                debug!("{} holds {} {}", address, balance, currency_code);
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(FaucetError::FundsNotObserved {
                    address: *address,
                    timeout_secs,
                });
            }

            sleep(Duration::from_millis(self.settings.poll_interval_ms)).await;
        }
    }
}

#[async_trait]
impl Faucet for TestnetFaucet {
    async fn mint(
        &self,
        auth_key_hex: &str,
        amount: u64,
        currency_code: &str,
    ) -> Result<MintReceipt, FaucetError> {
        if !self.settings.wait_for_funds {
            return self.mint_with_retry(auth_key_hex, amount, currency_code).await;
        }

        let address = auth_key_hex.parse::<AuthenticationKey>()?.derived_address();
        let before = self.balance(&address, currency_code).await?;

        let receipt = self.mint_with_retry(auth_key_hex, amount, currency_code).await?;
        info!(
            "Faucet submitted {} transaction(s) for {}, waiting for funds",
            receipt.transactions, address
        );

        self.wait_for_balance(&address, currency_code, before.saturating_add(amount))
            .await?;
        Ok(receipt)
    }
}

fn decode_receipt(body: &str) -> Result<MintReceipt, FaucetError> {
    let bytes = hex::decode(body.trim())
        .map_err(|e| FaucetError::MalformedResponse(format!("body is not hex: {}", e)))?;
    let transactions = read_uleb128(&bytes).ok_or_else(|| {
        FaucetError::MalformedResponse("invalid transaction count".to_string())
    })?;

    Ok(MintReceipt { transactions })
}

/// BCS sequence lengths are canonical ULEB128 and never exceed u32::MAX
fn read_uleb128(bytes: &[u8]) -> Option<u64> {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().take(5).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            // A zero final byte after the first one is a padded encoding
            if i > 0 && *byte == 0 {
                return None;
            }
            return (value <= u64::from(u32::MAX)).then_some(value);
        }
    }
    None
}
