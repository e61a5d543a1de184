//! Detects and repairs committed documents that lost their journal entry.
//!
//! The schema makes new orphans impossible via check constraints; this module
//! exists for data imported from systems without that protection.
pub mod error;
mod repo;

use sqlx::PgPool;
use tracing::instrument;

use crate::{ledger_operation::LedgerOperation, primitives::*};

use error::*;
use repo::*;

pub const DOCUMENT_KINDS: [DocumentKind; 4] = [
    DocumentKind::Invoice,
    DocumentKind::Expense,
    DocumentKind::SupplierInvoice,
    DocumentKind::PayrollRun,
];

/// Committed-but-unlinked documents, by kind.
#[derive(Debug, Default)]
pub struct OrphanReport {
    pub invoices: Vec<DocumentId>,
    pub expenses: Vec<DocumentId>,
    pub supplier_invoices: Vec<DocumentId>,
    pub payroll_runs: Vec<DocumentId>,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn total(&self) -> usize {
        self.invoices.len()
            + self.expenses.len()
            + self.supplier_invoices.len()
            + self.payroll_runs.len()
    }

    pub fn ids(&self, kind: DocumentKind) -> &[DocumentId] {
        match kind {
            DocumentKind::Invoice => &self.invoices,
            DocumentKind::Expense => &self.expenses,
            DocumentKind::SupplierInvoice => &self.supplier_invoices,
            DocumentKind::PayrollRun => &self.payroll_runs,
        }
    }

    fn set_ids(&mut self, kind: DocumentKind, ids: Vec<DocumentId>) {
        match kind {
            DocumentKind::Invoice => self.invoices = ids,
            DocumentKind::Expense => self.expenses = ids,
            DocumentKind::SupplierInvoice => self.supplier_invoices = ids,
            DocumentKind::PayrollRun => self.payroll_runs = ids,
        }
    }
}

/// Service that audits the document-to-entry links.
#[derive(Clone)]
pub struct Integrity {
    repo: IntegrityRepo,
    pool: PgPool,
}

impl Integrity {
    pub(crate) fn new(pool: &PgPool) -> Self {
        Self {
            repo: IntegrityRepo::new(),
            pool: pool.clone(),
        }
    }

    /// Scans all document tables for committed rows without a journal entry.
    #[instrument(name = "mesa_ledger.integrity.find_orphans", skip(self), err)]
    pub async fn find_orphans(&self) -> Result<OrphanReport, IntegrityError> {
        let mut conn = self.pool.acquire().await?;
        let mut report = OrphanReport::default();
        for kind in DOCUMENT_KINDS {
            let ids = self.repo.orphan_ids(&mut conn, kind).await?;
            report.set_ids(kind, ids);
        }
        Ok(report)
    }

    /// Deletes every orphaned document (and its line items) in one
    /// transaction, returning what was (or would be) removed. With `dry_run`
    /// the transaction is rolled back and nothing is touched.
    #[instrument(name = "mesa_ledger.integrity.delete_orphans", skip(self))]
    pub async fn delete_orphans(&self, dry_run: bool) -> Result<OrphanReport, IntegrityError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        let mut report = OrphanReport::default();
        for kind in DOCUMENT_KINDS {
            let ids = self.repo.orphan_ids(&mut **op.tx(), kind).await?;
            self.repo.delete_documents(op.tx(), kind, &ids).await?;
            report.set_ids(kind, ids);
        }
        if !dry_run {
            op.commit().await?;
        }
        Ok(report)
    }

    /// Pure check used when committing a document: a committed status
    /// requires a journal entry link.
    pub fn assert_linked(
        kind: DocumentKind,
        id: DocumentId,
        status: &str,
        journal_entry_id: Option<JournalEntryId>,
    ) -> Result<(), IntegrityError> {
        if kind.committed_statuses().contains(&status) && journal_entry_id.is_none() {
            return Err(IntegrityError::Orphan { kind, id });
        }
        Ok(())
    }
}
