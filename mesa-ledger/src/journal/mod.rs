//! The single write path into the ledger: validated, sequentially numbered,
//! period-guarded journal entries.
mod entity;
pub mod error;
mod repo;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::{ledger_operation::LedgerOperation, period::PeriodGuard, primitives::*};

pub use entity::*;
use error::*;
pub(crate) use repo::JournalEntryRepo;

/// Entry numbers are backed by a unique constraint; a clash can only happen
/// when a competing transaction commits between our gap scan and insert, so a
/// couple of retries settle it.
const MAX_ENTRY_NUMBER_RETRIES: u32 = 3;

/// Service for posting and querying journal entries.
#[derive(Clone)]
pub struct JournalEntries {
    repo: JournalEntryRepo,
    period: PeriodGuard,
    pool: PgPool,
}

impl JournalEntries {
    pub(crate) fn new(pool: &PgPool, period: &PeriodGuard) -> Self {
        Self {
            repo: JournalEntryRepo::new(),
            period: period.clone(),
            pool: pool.clone(),
        }
    }

    /// Validates and posts a new entry in its own transaction.
    #[instrument(name = "mesa_ledger.journal.create", skip(self, new_entry))]
    pub async fn create(&self, new_entry: NewJournalEntry) -> Result<JournalEntry, JournalError> {
        let mut attempt = 0;
        loop {
            let mut op = LedgerOperation::init(&self.pool).await?;
            match self.create_in_op(&mut op, new_entry.clone()).await {
                Ok(entry) => {
                    op.commit().await?;
                    return Ok(entry);
                }
                Err(JournalError::DuplicateEntryNumber(_))
                    if attempt < MAX_ENTRY_NUMBER_RETRIES =>
                {
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Validates and posts a new entry inside the caller's operation.
    pub async fn create_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        new_entry: NewJournalEntry,
    ) -> Result<JournalEntry, JournalError> {
        new_entry.validate()?;
        if let Some(missing) = self
            .repo
            .find_missing_account(op.tx(), &new_entry.account_ids())
            .await?
        {
            return Err(JournalError::UnknownAccount(missing));
        }
        let permission = self
            .period
            .can_post_in_op(op, new_entry.entry_date())
            .await?;
        if let Some(denied) = permission.denied {
            return Err(JournalError::PeriodClosed(denied));
        }
        let entry_number = self.repo.allocate_entry_number(op.tx()).await?;
        let (values, postings) = new_entry.into_values(entry_number);
        self.repo.create_in_tx(op.tx(), &values, &postings).await?;
        Ok(JournalEntry::from_values(values, postings))
    }

    /// Reverses a posted entry with a mirror entry dated `entry_date` (today
    /// when not given). The mirror goes through the same validation and
    /// period checks as any other entry; the original is marked reversed.
    #[instrument(name = "mesa_ledger.journal.reverse", skip(self))]
    pub async fn reverse(
        &self,
        id: JournalEntryId,
        entry_date: Option<NaiveDate>,
    ) -> Result<JournalEntry, JournalError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        let entry = self.reverse_in_op(&mut op, id, entry_date).await?;
        op.commit().await?;
        Ok(entry)
    }

    pub async fn reverse_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        id: JournalEntryId,
        entry_date: Option<NaiveDate>,
    ) -> Result<JournalEntry, JournalError> {
        let (values, postings) = self.repo.find_by_id(&mut **op.tx(), id, true).await?;
        if values.status == EntryStatus::Reversed {
            return Err(JournalError::AlreadyReversed(id));
        }
        let original = JournalEntry::from_values(values, postings);
        let entry_date = entry_date.unwrap_or_else(|| Utc::now().date_naive());
        let mirror = original.reversal(entry_date)?;
        let reversal = self.create_in_op(op, mirror).await?;
        self.repo
            .update_status(op.tx(), id, EntryStatus::Reversed)
            .await?;
        Ok(reversal)
    }

    #[instrument(name = "mesa_ledger.journal.find_by_id", skip(self), err)]
    pub async fn find_by_id(&self, id: JournalEntryId) -> Result<JournalEntry, JournalError> {
        let mut conn = self.pool.acquire().await?;
        let (values, postings) = self.repo.find_by_id(&mut conn, id, false).await?;
        Ok(JournalEntry::from_values(values, postings))
    }

    /// The number the next posted entry would receive. Purely informational;
    /// nothing is reserved.
    #[instrument(name = "mesa_ledger.journal.next_entry_number", skip(self), err)]
    pub async fn next_entry_number(&self) -> Result<i32, JournalError> {
        let mut tx = self.pool.begin().await?;
        let number = self.repo.allocate_entry_number(&mut tx).await?;
        tx.rollback().await?;
        Ok(number)
    }

    /// Removes an entry and its postings, freeing its entry number for reuse.
    /// Fails if a committed document references the entry.
    #[instrument(name = "mesa_ledger.journal.delete", skip(self))]
    pub async fn delete(&self, id: JournalEntryId) -> Result<(), JournalError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        self.delete_in_op(&mut op, id).await?;
        op.commit().await?;
        Ok(())
    }

    pub async fn delete_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        id: JournalEntryId,
    ) -> Result<(), JournalError> {
        self.repo.find_by_id(&mut **op.tx(), id, true).await?;
        match self.repo.delete_all_in_tx(op.tx(), &[id]).await {
            Ok(()) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_check_violation() => {
                Err(JournalError::ReferencedByDocument(format!(
                    "entry '{id}' backs a committed document ({})",
                    err.constraint().unwrap_or("unknown constraint")
                )))
            }
            Err(err) => Err(err.into()),
        }
    }
}
