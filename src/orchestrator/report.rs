/// Record of the accounts funded during a run
use crate::chain::{LocalAccount, MintReceipt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundedAccount {
    /// Position in `prefunded_accounts`
    pub index: usize,
    pub auth_key: String,
    pub address: String,
    pub amount: u64,
    pub currency_code: String,
    pub transactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FundingReport {
    pub funded: Vec<FundedAccount>,
}

impl FundingReport {
    pub fn record(
        &mut self,
        index: usize,
        account: &LocalAccount,
        amount: u64,
        currency_code: &str,
        receipt: MintReceipt,
    ) {
        self.funded.push(FundedAccount {
            index,
            auth_key: account.auth_key().to_hex(),
            address: account.address().to_hex(),
            amount,
            currency_code: currency_code.to_string(),
            transactions: receipt.transactions,
        });
    }

    pub fn len(&self) -> usize {
        self.funded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funded.is_empty()
    }

    /// Sum of all minted amounts, u128 so large runs cannot overflow
    pub fn total_minted(&self) -> u128 {
        self.funded.iter().map(|f| u128::from(f.amount)).sum()
    }

    pub fn total_transactions(&self) -> u128 {
        self.funded.iter().map(|f| u128::from(f.transactions)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let account = LocalAccount::from_private_key_hex(&"00".repeat(32)).unwrap();
        let mut report = FundingReport::default();
        assert!(report.is_empty());

        report.record(0, &account, u64::MAX, "XUS", MintReceipt { transactions: 2 });
        report.record(1, &account, u64::MAX, "XUS", MintReceipt { transactions: 1 });

        assert_eq!(report.len(), 2);
        assert_eq!(report.total_minted(), 2 * u128::from(u64::MAX));
        assert_eq!(report.total_transactions(), 3);
        assert_eq!(report.funded[1].address, "bb84d9cdf7362e4e2522265b185127cb");
    }

    #[test]
    fn test_transaction_total_does_not_overflow() {
        let account = LocalAccount::from_private_key_hex(&"00".repeat(32)).unwrap();
        let mut report = FundingReport::default();

        report.record(0, &account, 1, "XUS", MintReceipt { transactions: u64::MAX });
        report.record(1, &account, 1, "XUS", MintReceipt { transactions: 1 });

        assert_eq!(report.total_transactions(), u128::from(u64::MAX) + 1);
    }
}
