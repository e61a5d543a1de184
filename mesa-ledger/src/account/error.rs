use thiserror::Error;

use crate::primitives::{AccountCode, AccountId};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("AccountError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("AccountError - NotFound: id '{0}' not found")]
    CouldNotFindById(AccountId),
    #[error("AccountError - NotFound: code '{0}' not found")]
    CouldNotFindByCode(AccountCode),
    #[error("AccountError - UnknownParent: parent code '{0}' does not resolve")]
    UnknownParent(AccountCode),
    #[error("AccountError - CodeAlreadyExists: code '{0}' is already in use")]
    CodeAlreadyExists(AccountCode),
    #[error("AccountError - Referenced: account '{0}' has postings or child accounts")]
    Referenced(AccountId),
}
