use thiserror::Error;

use crate::primitives::AccountId;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("BalanceError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("BalanceError - NotFound: account '{0}' not found")]
    AccountNotFound(AccountId),
}
