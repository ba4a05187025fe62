use std::path::PathBuf;
use thiserror::Error;

use crate::chain::faucet::FaucetError;
use crate::chain::wallet::KeyError;

/// Failures that abort a funding run
/// Entry indexes are zero-based positions in `prefunded_accounts`
#[derive(Debug, Error)]
pub enum FundingError {
    #[error("config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} is not valid JSON: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {} has an unexpected shape: {reason}", path.display())]
    ConfigShape { path: PathBuf, reason: String },

    #[error("invalid private key for prefunded account #{index}: {source}")]
    KeyDecode {
        index: usize,
        #[source]
        source: KeyError,
    },

    #[error("faucet mint failed for prefunded account #{index}: {source}")]
    Faucet {
        index: usize,
        #[source]
        source: FaucetError,
    },
}
