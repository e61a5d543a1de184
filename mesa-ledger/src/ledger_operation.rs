use sqlx::{PgPool, Postgres, Transaction};

/// A database transaction scoping one logical ledger mutation.
///
/// Document-producing collaborators that must persist their own row together
/// with a journal entry (storing the entry id on an invoice, for instance)
/// run their statements against [`tx`](LedgerOperation::tx) before calling
/// [`commit`](LedgerOperation::commit). Dropping the operation without
/// committing rolls everything back.
pub struct LedgerOperation<'a> {
    tx: Transaction<'a, Postgres>,
}

impl<'a> LedgerOperation<'a> {
    pub(crate) async fn init(pool: &PgPool) -> Result<LedgerOperation<'static>, sqlx::Error> {
        Ok(LedgerOperation {
            tx: pool.begin().await?,
        })
    }

    pub fn tx(&mut self) -> &mut Transaction<'a, Postgres> {
        &mut self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}
