use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    period::{error::PeriodError, PostingDenied},
    primitives::{AccountId, JournalEntryId},
};

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("JournalError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JournalError - EmptyEntry: an entry needs at least two posting lines")]
    EmptyEntry,
    #[error("JournalError - InvalidPosting: {0}")]
    InvalidPosting(String),
    #[error("JournalError - Unbalanced: debits and credits differ by {0}")]
    Unbalanced(Decimal),
    #[error("JournalError - UnknownAccount: account '{0}' does not exist")]
    UnknownAccount(AccountId),
    #[error("JournalError - PeriodClosed: {0}")]
    PeriodClosed(PostingDenied),
    #[error("JournalError - Period: {0}")]
    Period(#[from] PeriodError),
    #[error("JournalError - NotFound: id '{0}' not found")]
    CouldNotFindById(JournalEntryId),
    #[error("JournalError - AlreadyReversed: entry '{0}' has already been reversed")]
    AlreadyReversed(JournalEntryId),
    #[error("JournalError - DuplicateEntryNumber: entry number {0} was taken concurrently")]
    DuplicateEntryNumber(i32),
    #[error("JournalError - ReferencedByDocument: {0}")]
    ReferencedByDocument(String),
    #[error("JournalError - Configuration: {0}")]
    Configuration(String),
}
