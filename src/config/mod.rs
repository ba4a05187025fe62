use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod prefunded;

pub use prefunded::{load_prefunded_keys, DEFAULT_CONFIG_PATH};

pub const MINT_AMOUNT: u64 = 5_000_000_000;
pub const TEST_CURRENCY_CODE: &str = "XUS";
pub const TESTNET_FAUCET_URL: &str = "https://testnet.diem.com/mint";
pub const TESTNET_JSON_RPC_URL: &str = "https://testnet.diem.com/v1";

/// Settings for a funding run
/// Every field has a testnet default, so a settings file only needs the overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunderSettings {
    pub funding: FundingSettings,
    pub faucet: FaucetSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingSettings {
    /// Amount minted to every prefunded account, in base units
    pub amount: u64,
    pub currency_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaucetSettings {
    pub faucet_url: String,
    pub json_rpc_url: String,
    /// Total attempts per mint request, including the first
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Poll the recipient's balance until the minted funds show up
    pub wait_for_funds: bool,
    pub funds_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for FundingSettings {
    fn default() -> Self {
        Self {
            amount: MINT_AMOUNT,
            currency_code: TEST_CURRENCY_CODE.to_string(),
        }
    }
}

impl Default for FaucetSettings {
    fn default() -> Self {
        Self {
            faucet_url: TESTNET_FAUCET_URL.to_string(),
            json_rpc_url: TESTNET_JSON_RPC_URL.to_string(),
            max_attempts: 5,
            retry_delay_ms: 200,
            request_timeout_secs: 30,
            wait_for_funds: true,
            funds_timeout_secs: 60,
            poll_interval_ms: 500,
        }
    }
}

impl FunderSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: FunderSettings = toml::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Load `path` when given, otherwise fall back to the testnet defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
