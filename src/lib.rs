// Library exports for diem_prefund

pub mod chain;
pub mod config;
pub mod error;
pub mod orchestrator;

// Re-export main types for convenience
pub use chain::{Faucet, LocalAccount, TestnetFaucet};
pub use config::FunderSettings;
pub use error::FundingError;
pub use orchestrator::{derive_accounts, AccountFunder, FundingReport};
