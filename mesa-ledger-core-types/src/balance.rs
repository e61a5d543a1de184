use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw per-account figures over a reporting window, debit-positive oriented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAmounts {
    pub beginning: Decimal,
    pub debit: Decimal,
    pub credit: Decimal,
    pub ending: Decimal,
}

impl BalanceAmounts {
    pub fn from_sums(beginning: Decimal, debit: Decimal, credit: Decimal) -> Self {
        BalanceAmounts {
            beginning,
            debit,
            credit,
            ending: beginning + debit - credit,
        }
    }

    pub fn accumulate(&mut self, other: &BalanceAmounts) {
        self.beginning += other.beginning;
        self.debit += other.debit;
        self.credit += other.credit;
        self.ending += other.ending;
    }
}
