/// Funding orchestrator: load the prefunded accounts and mint to each in file order
///
/// A run has three phases: load the config, then derive and fund every entry.
/// Entries are handled one at a time, so a bad key at position k aborts the run
/// after exactly k mint calls. Nothing is rolled back on failure.
use std::path::Path;
use tracing::{debug, info, warn};

use crate::chain::{Faucet, LocalAccount};
use crate::config::{load_prefunded_keys, FundingSettings};
use crate::error::FundingError;

mod report;
pub use self::report::{FundedAccount, FundingReport};

pub struct AccountFunder<F> {
    settings: FundingSettings,
    faucet: F,
}

impl<F: Faucet> AccountFunder<F> {
    pub fn new(settings: FundingSettings, faucet: F) -> Self {
        Self { settings, faucet }
    }

    #[cfg(test)]
    pub(crate) fn faucet(&self) -> &F {
        &self.faucet
    }

    /// Fund every prefunded account in `config_path`, stopping at the first failure
    pub async fn run<P: AsRef<Path>>(&self, config_path: P) -> Result<FundingReport, FundingError> {
        let config_path = config_path.as_ref();
        let keys = load_prefunded_keys(config_path)?;
        info!(
            "Loaded {} prefunded account(s) from {}",
            keys.len(),
            config_path.display()
        );

        let mut report = FundingReport::default();
        for (index, key) in keys.iter().enumerate() {
            if let Err(e) = self.fund_entry(index, key, &mut report).await {
                warn!(
                    "Aborting after funding {} of {} account(s); funded accounts keep their balance",
                    report.len(),
                    keys.len()
                );
                return Err(e);
            }
        }

        info!(
            "Funded {} account(s) with {} {} each",
            report.len(),
            self.settings.amount,
            self.settings.currency_code
        );
        Ok(report)
    }

    async fn fund_entry(
        &self,
        index: usize,
        key: &str,
        report: &mut FundingReport,
    ) -> Result<(), FundingError> {
        let account = derive_account(index, key)?;
        let auth_key = account.auth_key().to_hex();
        debug!("Minting to account #{} ({})", index, auth_key);

        let receipt = self
            .faucet
            .mint(&auth_key, self.settings.amount, &self.settings.currency_code)
            .await
            .map_err(|source| FundingError::Faucet { index, source })?;

        info!(
            "Funded account #{} address={} auth_key={}",
            index,
            account.address(),
            auth_key
        );
        report.record(
            index,
            &account,
            self.settings.amount,
            &self.settings.currency_code,
            receipt,
        );
        Ok(())
    }
}

/// Load and derive every prefunded account without touching the network
pub fn derive_accounts<P: AsRef<Path>>(config_path: P) -> Result<Vec<LocalAccount>, FundingError> {
    load_prefunded_keys(config_path)?
        .iter()
        .enumerate()
        .map(|(index, key)| derive_account(index, key))
        .collect()
}

fn derive_account(index: usize, key: &str) -> Result<LocalAccount, FundingError> {
    LocalAccount::from_private_key_hex(key).map_err(|source| FundingError::KeyDecode { index, source })
}
