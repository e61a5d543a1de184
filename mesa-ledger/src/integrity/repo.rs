use sqlx::{Postgres, Transaction};

use crate::primitives::*;

use super::error::IntegrityError;

#[derive(Debug, Clone)]
pub(super) struct IntegrityRepo;

impl IntegrityRepo {
    pub fn new() -> Self {
        Self
    }

    /// Committed documents of `kind` whose journal entry link is missing.
    pub async fn orphan_ids(
        &self,
        conn: &mut sqlx::PgConnection,
        kind: DocumentKind,
    ) -> Result<Vec<DocumentId>, IntegrityError> {
        let query = format!(
            r#"SELECT id FROM {}
               WHERE status = ANY($1) AND journal_entry_id IS NULL
               ORDER BY id"#,
            kind.table_name()
        );
        let statuses: Vec<String> = kind
            .committed_statuses()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ids = sqlx::query_scalar::<_, DocumentId>(&query)
            .bind(statuses)
            .fetch_all(conn)
            .await?;
        Ok(ids)
    }

    /// Deletes the given documents along with their line items (the line
    /// tables cascade on delete).
    pub async fn delete_documents(
        &self,
        db: &mut Transaction<'_, Postgres>,
        kind: DocumentKind,
        ids: &[DocumentId],
    ) -> Result<u64, IntegrityError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let query = format!("DELETE FROM {} WHERE id = ANY($1)", kind.table_name());
        let res = sqlx::query(&query).bind(ids).execute(&mut **db).await?;
        Ok(res.rows_affected())
    }
}
