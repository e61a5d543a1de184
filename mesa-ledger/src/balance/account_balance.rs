use rust_decimal::Decimal;

pub use mesa_types::balance::BalanceAmounts;

use crate::primitives::DebitOrCredit;

/// The balance of a single account over a window of time.
///
/// Amounts carry the debit-positive sign convention; `normal_balance` flips
/// the sign for credit-natural accounts so revenue and liabilities read
/// positive.
#[derive(Debug, Clone)]
pub struct AccountBalance {
    pub balance_type: DebitOrCredit,
    pub details: BalanceAmounts,
}

impl AccountBalance {
    /// Ending balance in the debit-positive convention.
    pub fn ending(&self) -> Decimal {
        self.details.ending
    }

    /// Ending balance expressed in the account's natural side.
    pub fn normal_balance(&self) -> Decimal {
        match self.balance_type {
            DebitOrCredit::Debit => self.details.ending,
            DebitOrCredit::Credit => -self.details.ending,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn normal_balance_respects_the_account_side() {
        let details = BalanceAmounts::from_sums(dec!(0), dec!(100), dec!(350));
        let debit_view = AccountBalance {
            balance_type: DebitOrCredit::Debit,
            details: details.clone(),
        };
        let credit_view = AccountBalance {
            balance_type: DebitOrCredit::Credit,
            details,
        };
        assert_eq!(debit_view.ending(), dec!(-250));
        assert_eq!(debit_view.normal_balance(), dec!(-250));
        assert_eq!(credit_view.normal_balance(), dec!(250));
    }
}
