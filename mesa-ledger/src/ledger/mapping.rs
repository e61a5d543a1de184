use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::primitives::{AccountCode, PaymentMethod};

/// Per-branch posting configuration: which account each side of a document
/// entry lands on. Typically deserialized from the application's config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountMapping {
    #[serde(default)]
    pub branches: HashMap<String, BranchAccounts>,
}

impl AccountMapping {
    pub fn branch(&self, name: &str) -> Option<&BranchAccounts> {
        self.branches.get(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchAccounts {
    /// Settlement account per payment method (till, card clearing, bank,
    /// accounts receivable).
    pub settlement: HashMap<PaymentMethod, AccountCode>,
    pub sales: AccountCode,
    #[serde(default)]
    pub vat_output: Option<AccountCode>,
    #[serde(default)]
    pub vat_input: Option<AccountCode>,
    pub payable: AccountCode,
}

impl BranchAccounts {
    pub fn settlement_account(&self, method: PaymentMethod) -> Option<AccountCode> {
        self.settlement.get(&method).copied()
    }
}
