use derive_builder::Builder;
use rust_decimal::Decimal;

pub use mesa_types::{account::AccountValues, primitives::AccountId};

use crate::primitives::*;

/// An account in the chart of accounts.
#[derive(Debug)]
pub struct Account {
    values: AccountValues,
}

impl Account {
    pub(super) fn from_values(values: AccountValues) -> Self {
        Self { values }
    }

    pub fn id(&self) -> AccountId {
        self.values.id
    }

    pub fn code(&self) -> AccountCode {
        self.values.code
    }

    pub fn values(&self) -> &AccountValues {
        &self.values
    }

    pub fn into_values(self) -> AccountValues {
        self.values
    }
}

/// Representation of a ***new*** account with required/optional properties and a builder.
#[derive(Builder, Debug, Clone)]
pub struct NewAccount {
    #[builder(setter(into))]
    pub id: AccountId,
    #[builder(setter(into))]
    pub(super) code: AccountCode,
    #[builder(setter(into))]
    pub(super) name: String,
    pub(super) account_type: AccountType,
    #[builder(setter(strip_option), default)]
    pub(super) normal_balance_type: Option<DebitOrCredit>,
    #[builder(setter(strip_option, into), default)]
    pub(super) parent_code: Option<AccountCode>,
    #[builder(default = "Decimal::ZERO")]
    pub(super) opening_balance: Decimal,
    #[builder(setter(strip_option, into), default)]
    pub(super) description: Option<String>,
}

impl NewAccount {
    pub fn builder() -> NewAccountBuilder {
        NewAccountBuilder::default()
    }

    pub(super) fn parent_code(&self) -> Option<AccountCode> {
        self.parent_code
    }

    pub(super) fn into_values(self, parent_id: Option<AccountId>) -> AccountValues {
        let normal_balance_type = self
            .normal_balance_type
            .unwrap_or_else(|| self.account_type.normal_balance_type());
        AccountValues {
            id: self.id,
            code: self.code,
            name: self.name,
            account_type: self.account_type,
            normal_balance_type,
            parent_id,
            opening_balance: self.opening_balance,
            description: self.description,
        }
    }
}
