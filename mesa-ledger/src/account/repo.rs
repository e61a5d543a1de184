use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::primitives::{AccountCode, AccountId, JournalEntryId};

use super::{entity::*, error::AccountError};

#[derive(Debug, Clone)]
pub(super) struct AccountRepo {
    pool: PgPool,
}

impl AccountRepo {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }

    pub async fn create_in_tx(
        &self,
        db: &mut Transaction<'_, Postgres>,
        values: &AccountValues,
    ) -> Result<(), AccountError> {
        let res = sqlx::query(
            r#"INSERT INTO mesa_accounts
               (id, code, name, account_type, normal_balance_type, parent_id, opening_balance, description)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(values.id)
        .bind(values.code)
        .bind(&values.name)
        .bind(values.account_type)
        .bind(values.normal_balance_type)
        .bind(values.parent_id)
        .bind(values.opening_balance)
        .bind(&values.description)
        .execute(&mut **db)
        .await;
        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(AccountError::CodeAlreadyExists(values.code))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_id(
        &self,
        executor: impl sqlx::PgExecutor<'_>,
        id: AccountId,
    ) -> Result<AccountValues, AccountError> {
        sqlx::query_as::<_, AccountValues>(
            r#"SELECT id, code, name, account_type, normal_balance_type, parent_id, opening_balance, description
               FROM mesa_accounts
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AccountError::CouldNotFindById(id))
    }

    pub async fn find_by_code(
        &self,
        executor: impl sqlx::PgExecutor<'_>,
        code: AccountCode,
    ) -> Result<AccountValues, AccountError> {
        sqlx::query_as::<_, AccountValues>(
            r#"SELECT id, code, name, account_type, normal_balance_type, parent_id, opening_balance, description
               FROM mesa_accounts
               WHERE code = $1"#,
        )
        .bind(code)
        .fetch_optional(executor)
        .await?
        .ok_or(AccountError::CouldNotFindByCode(code))
    }

    pub async fn list_all(&self) -> Result<Vec<AccountValues>, AccountError> {
        let accounts = sqlx::query_as::<_, AccountValues>(
            r#"SELECT id, code, name, account_type, normal_balance_type, parent_id, opening_balance, description
               FROM mesa_accounts
               ORDER BY code"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    pub async fn is_referenced(
        &self,
        executor: impl sqlx::PgExecutor<'_>,
        id: AccountId,
    ) -> Result<bool, AccountError> {
        let referenced: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM mesa_journal_postings WHERE account_id = $1)
                   OR EXISTS (SELECT 1 FROM mesa_accounts WHERE parent_id = $1)"#,
        )
        .bind(id)
        .fetch_one(executor)
        .await?;
        Ok(referenced)
    }

    /// The account itself plus every descendant, via the parent links.
    pub async fn subtree_ids(
        &self,
        db: &mut Transaction<'_, Postgres>,
        id: AccountId,
    ) -> Result<Vec<AccountId>, AccountError> {
        let ids = sqlx::query_scalar::<_, AccountId>(
            r#"WITH RECURSIVE subtree AS (
                 SELECT id FROM mesa_accounts WHERE id = $1
                 UNION ALL
                 SELECT a.id FROM mesa_accounts a
                 JOIN subtree s ON a.parent_id = s.id
               )
               SELECT id FROM subtree"#,
        )
        .bind(id)
        .fetch_all(&mut **db)
        .await?;
        Ok(ids)
    }

    pub async fn entry_ids_for_accounts(
        &self,
        db: &mut Transaction<'_, Postgres>,
        account_ids: &[AccountId],
    ) -> Result<Vec<JournalEntryId>, AccountError> {
        let ids = sqlx::query_scalar::<_, JournalEntryId>(
            r#"SELECT DISTINCT journal_entry_id
               FROM mesa_journal_postings
               WHERE account_id = ANY($1)"#,
        )
        .bind(account_ids)
        .fetch_all(&mut **db)
        .await?;
        Ok(ids)
    }

    #[instrument(name = "mesa_ledger.accounts.delete_subtree", skip(self, db))]
    pub async fn delete_subtree(
        &self,
        db: &mut Transaction<'_, Postgres>,
        account_ids: &[AccountId],
    ) -> Result<(), AccountError> {
        // Children reference parents, so strip the parent links first.
        sqlx::query(r#"UPDATE mesa_accounts SET parent_id = NULL WHERE parent_id = ANY($1)"#)
            .bind(account_ids)
            .execute(&mut **db)
            .await?;
        sqlx::query(r#"DELETE FROM mesa_accounts WHERE id = ANY($1)"#)
            .bind(account_ids)
            .execute(&mut **db)
            .await?;
        Ok(())
    }
}
