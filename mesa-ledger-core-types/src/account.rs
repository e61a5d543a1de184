use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::primitives::*;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountValues {
    pub id: AccountId,
    pub code: AccountCode,
    pub name: String,
    pub account_type: AccountType,
    pub normal_balance_type: DebitOrCredit,
    pub parent_id: Option<AccountId>,
    pub opening_balance: Decimal,
    pub description: Option<String>,
}
