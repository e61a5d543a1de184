//! The chart of accounts: a forest of typed accounts referenced by every posting.
mod entity;
pub mod error;
mod repo;
pub(crate) mod tree;

use sqlx::PgPool;
use tracing::instrument;

use crate::{journal::JournalEntryRepo, ledger_operation::LedgerOperation, primitives::*};

pub use entity::*;
use error::*;
use repo::*;
pub use tree::AccountTreeNode;

/// Service for working with `Account` entities.
#[derive(Clone)]
pub struct Accounts {
    repo: AccountRepo,
    entry_repo: JournalEntryRepo,
    pool: PgPool,
}

impl Accounts {
    pub(crate) fn new(pool: &PgPool) -> Self {
        Self {
            repo: AccountRepo::new(pool),
            entry_repo: JournalEntryRepo::new(),
            pool: pool.clone(),
        }
    }

    #[instrument(name = "mesa_ledger.accounts.create", skip(self))]
    pub async fn create(&self, new_account: NewAccount) -> Result<Account, AccountError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        let account = self.create_in_op(&mut op, new_account).await?;
        op.commit().await?;
        Ok(account)
    }

    pub async fn create_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        new_account: NewAccount,
    ) -> Result<Account, AccountError> {
        let parent_id = match new_account.parent_code() {
            Some(code) => {
                let parent = self
                    .repo
                    .find_by_code(&mut **op.tx(), code)
                    .await
                    .map_err(|err| match err {
                        AccountError::CouldNotFindByCode(code) => {
                            AccountError::UnknownParent(code)
                        }
                        other => other,
                    })?;
                Some(parent.id)
            }
            None => None,
        };
        let values = new_account.into_values(parent_id);
        self.repo.create_in_tx(op.tx(), &values).await?;
        Ok(Account::from_values(values))
    }

    #[instrument(name = "mesa_ledger.accounts.find_by_id", skip(self), err)]
    pub async fn find_by_id(&self, id: AccountId) -> Result<Account, AccountError> {
        let values = self.repo.find_by_id(&self.pool, id).await?;
        Ok(Account::from_values(values))
    }

    #[instrument(name = "mesa_ledger.accounts.find_by_code", skip(self), err)]
    pub async fn find_by_code(&self, code: AccountCode) -> Result<Account, AccountError> {
        let values = self.repo.find_by_code(&self.pool, code).await?;
        Ok(Account::from_values(values))
    }

    pub async fn find_by_code_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        code: AccountCode,
    ) -> Result<Account, AccountError> {
        let values = self.repo.find_by_code(&mut **op.tx(), code).await?;
        Ok(Account::from_values(values))
    }

    #[instrument(name = "mesa_ledger.accounts.list", skip(self), err)]
    pub async fn list(&self) -> Result<Vec<AccountValues>, AccountError> {
        self.repo.list_all().await
    }

    /// The chart of accounts as a forest, one root per top-level account.
    #[instrument(name = "mesa_ledger.accounts.tree", skip(self), err)]
    pub async fn tree(&self) -> Result<Vec<AccountTreeNode>, AccountError> {
        let accounts = self.repo.list_all().await?;
        Ok(tree::build_forest(accounts))
    }

    /// Removes an account. Refused while postings or child accounts reference
    /// it unless `cascade` is set, in which case every descendant account and
    /// every journal entry touching any of them is removed as well. The
    /// cascade is destructive and intended for corrective cleanup only.
    #[instrument(name = "mesa_ledger.accounts.delete", skip(self))]
    pub async fn delete(&self, id: AccountId, cascade: bool) -> Result<(), AccountError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        // Ensure the account exists before doing anything destructive.
        self.repo.find_by_id(&mut **op.tx(), id).await?;

        if !cascade {
            if self.repo.is_referenced(&mut **op.tx(), id).await? {
                return Err(AccountError::Referenced(id));
            }
            self.repo.delete_subtree(op.tx(), &[id]).await?;
            op.commit().await?;
            return Ok(());
        }

        let subtree = self.repo.subtree_ids(op.tx(), id).await?;
        let entry_ids = self.repo.entry_ids_for_accounts(op.tx(), &subtree).await?;
        self.entry_repo.delete_all_in_tx(op.tx(), &entry_ids).await?;
        self.repo.delete_subtree(op.tx(), &subtree).await?;
        op.commit().await?;
        Ok(())
    }
}
