use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use mesa_types::account::AccountValues;

use crate::primitives::*;

use super::{error::BalanceError, TrialBalanceRow};

#[derive(Debug, Clone)]
pub(super) struct BalanceRepo {
    pool: PgPool,
}

impl BalanceRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn find_account(&self, id: AccountId) -> Result<AccountValues, BalanceError> {
        sqlx::query_as::<_, AccountValues>(
            r#"SELECT id, code, name, account_type, normal_balance_type, parent_id, opening_balance, description
               FROM mesa_accounts
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BalanceError::AccountNotFound(id))
    }

    /// Opening balance plus all signed activity strictly before `from`.
    /// Without `from` only the opening balance counts.
    pub async fn beginning_balance(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
    ) -> Result<Decimal, BalanceError> {
        let beginning: Decimal = sqlx::query_scalar(
            r#"SELECT a.opening_balance + COALESCE((
                 SELECT SUM(p.debit - p.credit)
                 FROM mesa_journal_postings p
                 JOIN mesa_journal_entries e ON e.id = p.journal_entry_id
                 WHERE p.account_id = a.id AND e.entry_date < $2
               ), 0)
               FROM mesa_accounts a
               WHERE a.id = $1"#,
        )
        .bind(account_id)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BalanceError::AccountNotFound(account_id))?;
        Ok(beginning)
    }

    /// Total debits and credits within the window (both bounds inclusive,
    /// either side open-ended when `None`).
    pub async fn range_sums(
        &self,
        account_id: AccountId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(Decimal, Decimal), BalanceError> {
        let sums: (Decimal, Decimal) = sqlx::query_as(
            r#"SELECT COALESCE(SUM(p.debit), 0), COALESCE(SUM(p.credit), 0)
               FROM mesa_journal_postings p
               JOIN mesa_journal_entries e ON e.id = p.journal_entry_id
               WHERE p.account_id = $1
                 AND ($2::date IS NULL OR e.entry_date >= $2)
                 AND ($3::date IS NULL OR e.entry_date <= $3)"#,
        )
        .bind(account_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok(sums)
    }

    /// One row per account with beginning balance and in-window activity,
    /// ordered by account code.
    pub async fn trial_balance_rows(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<TrialBalanceRow>, BalanceError> {
        let rows = sqlx::query_as::<_, TrialBalanceRow>(
            r#"SELECT a.id, a.code, a.name, a.account_type, a.normal_balance_type,
                      a.parent_id, a.opening_balance, a.description,
                      a.opening_balance + COALESCE(SUM(p.debit - p.credit)
                        FILTER (WHERE e.entry_date < $1), 0) AS beginning,
                      COALESCE(SUM(p.debit) FILTER (WHERE ($1::date IS NULL OR e.entry_date >= $1)
                        AND ($2::date IS NULL OR e.entry_date <= $2)), 0) AS debit,
                      COALESCE(SUM(p.credit) FILTER (WHERE ($1::date IS NULL OR e.entry_date >= $1)
                        AND ($2::date IS NULL OR e.entry_date <= $2)), 0) AS credit
               FROM mesa_accounts a
               LEFT JOIN mesa_journal_postings p ON p.account_id = a.id
               LEFT JOIN mesa_journal_entries e ON e.id = p.journal_entry_id
               GROUP BY a.id
               ORDER BY a.code"#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
