use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("LedgerError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("LedgerError - SqlxMigrate: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
    #[error("LedgerError - Config: {0}")]
    Config(String),
    #[error("LedgerError - AccountError: {0}")]
    Account(#[from] crate::account::error::AccountError),
    #[error("LedgerError - PeriodError: {0}")]
    Period(#[from] crate::period::error::PeriodError),
    #[error("LedgerError - JournalError: {0}")]
    Journal(#[from] crate::journal::error::JournalError),
    #[error("LedgerError - IntegrityError: {0}")]
    Integrity(#[from] crate::integrity::error::IntegrityError),
    #[error("LedgerError - BalanceError: {0}")]
    Balance(#[from] crate::balance::error::BalanceError),
}
