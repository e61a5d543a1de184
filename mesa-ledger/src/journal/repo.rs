use sqlx::{Postgres, QueryBuilder, Transaction};

use crate::primitives::*;

use super::{entity::*, error::JournalError};

/// All transactions allocating an entry number take this advisory lock, so
/// the gap scan and the insert behave as one atomic step.
const ENTRY_NUMBER_LOCK_KEY: i64 = 0x6d65_7361_5f65_6e74;

#[derive(Debug, Clone)]
pub(crate) struct JournalEntryRepo;

impl JournalEntryRepo {
    pub fn new() -> Self {
        Self
    }

    /// The smallest unused positive entry number. Numbers freed by deleted
    /// entries are handed out again before the sequence grows.
    pub async fn allocate_entry_number(
        &self,
        db: &mut Transaction<'_, Postgres>,
    ) -> Result<i32, JournalError> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ENTRY_NUMBER_LOCK_KEY)
            .execute(&mut **db)
            .await?;
        let number: i32 = sqlx::query_scalar(
            r#"SELECT COALESCE(MIN(candidate), 1)
               FROM (
                 SELECT 1 AS candidate
                 WHERE NOT EXISTS (SELECT 1 FROM mesa_journal_entries WHERE entry_number = 1)
                 UNION ALL
                 SELECT e.entry_number + 1
                 FROM mesa_journal_entries e
                 WHERE NOT EXISTS (
                   SELECT 1 FROM mesa_journal_entries n
                   WHERE n.entry_number = e.entry_number + 1
                 )
               ) AS candidates"#,
        )
        .fetch_one(&mut **db)
        .await?;
        Ok(number)
    }

    pub async fn create_in_tx(
        &self,
        db: &mut Transaction<'_, Postgres>,
        values: &JournalEntryValues,
        postings: &[PostingValues],
    ) -> Result<(), JournalError> {
        let res = sqlx::query(
            r#"INSERT INTO mesa_journal_entries
               (id, entry_number, description, entry_date, period, reference_type, reference_id, status)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(values.id)
        .bind(values.entry_number)
        .bind(&values.description)
        .bind(values.entry_date)
        .bind(values.period)
        .bind(values.reference_type)
        .bind(values.reference_id)
        .bind(values.status)
        .execute(&mut **db)
        .await;
        match res {
            Ok(_) => (),
            Err(sqlx::Error::Database(err))
                if err.constraint() == Some("mesa_journal_entries_entry_number_key") =>
            {
                return Err(JournalError::DuplicateEntryNumber(values.entry_number));
            }
            Err(err) => return Err(err.into()),
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO mesa_journal_postings (id, journal_entry_id, account_id, debit, credit) ",
        );
        query_builder.push_values(postings, |mut builder, posting| {
            builder
                .push_bind(posting.id)
                .push_bind(posting.journal_entry_id)
                .push_bind(posting.account_id)
                .push_bind(posting.debit)
                .push_bind(posting.credit);
        });
        query_builder.build().execute(&mut **db).await?;
        Ok(())
    }

    pub async fn find_by_id(
        &self,
        conn: &mut sqlx::PgConnection,
        id: JournalEntryId,
        for_update: bool,
    ) -> Result<(JournalEntryValues, Vec<PostingValues>), JournalError> {
        let mut query = String::from(
            r#"SELECT id, entry_number, description, entry_date, period,
                      reference_type, reference_id, status
               FROM mesa_journal_entries
               WHERE id = $1"#,
        );
        if for_update {
            query.push_str(" FOR UPDATE");
        }
        let values = sqlx::query_as::<_, JournalEntryValues>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(JournalError::CouldNotFindById(id))?;
        let postings = sqlx::query_as::<_, PostingValues>(
            r#"SELECT id, journal_entry_id, account_id, debit, credit
               FROM mesa_journal_postings
               WHERE journal_entry_id = $1
               ORDER BY debit = 0, account_id"#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
        Ok((values, postings))
    }

    pub async fn update_status(
        &self,
        db: &mut Transaction<'_, Postgres>,
        id: JournalEntryId,
        status: EntryStatus,
    ) -> Result<(), JournalError> {
        sqlx::query(r#"UPDATE mesa_journal_entries SET status = $2 WHERE id = $1"#)
            .bind(id)
            .bind(status)
            .execute(&mut **db)
            .await?;
        Ok(())
    }

    /// Returns an account id from `account_ids` that does not exist, if any.
    pub async fn find_missing_account(
        &self,
        db: &mut Transaction<'_, Postgres>,
        account_ids: &[AccountId],
    ) -> Result<Option<AccountId>, JournalError> {
        let missing = sqlx::query_scalar::<_, AccountId>(
            r#"SELECT candidate.id
               FROM UNNEST($1::uuid[]) AS candidate(id)
               WHERE NOT EXISTS (SELECT 1 FROM mesa_accounts a WHERE a.id = candidate.id)
               LIMIT 1"#,
        )
        .bind(account_ids)
        .fetch_optional(&mut **db)
        .await?;
        Ok(missing)
    }

    /// Deletes entries and their postings, unlinking any referencing
    /// documents first. Committed documents refuse to be unlinked via a check
    /// constraint, which aborts the whole transaction.
    pub async fn delete_all_in_tx(
        &self,
        db: &mut Transaction<'_, Postgres>,
        entry_ids: &[JournalEntryId],
    ) -> Result<(), sqlx::Error> {
        if entry_ids.is_empty() {
            return Ok(());
        }
        for table in [
            "mesa_invoices",
            "mesa_expenses",
            "mesa_supplier_invoices",
            "mesa_payroll_runs",
        ] {
            let query = format!(
                "UPDATE {table} SET journal_entry_id = NULL WHERE journal_entry_id = ANY($1)"
            );
            sqlx::query(&query).bind(entry_ids).execute(&mut **db).await?;
        }
        sqlx::query(r#"DELETE FROM mesa_journal_postings WHERE journal_entry_id = ANY($1)"#)
            .bind(entry_ids)
            .execute(&mut **db)
            .await?;
        sqlx::query(r#"DELETE FROM mesa_journal_entries WHERE id = ANY($1)"#)
            .bind(entry_ids)
            .execute(&mut **db)
            .await?;
        Ok(())
    }
}
