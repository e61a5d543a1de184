use serde::{Deserialize, Serialize};

use super::primitives::{DocumentId, DocumentKind};

/// Identifies the exactly-one source document behind a journal entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentReference {
    pub kind: DocumentKind,
    pub id: DocumentId,
}

impl DocumentKind {
    /// Statuses in which a document of this kind must be backed by a journal
    /// entry. A row in one of these states with no entry is an orphan.
    pub fn committed_statuses(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Invoice | DocumentKind::SupplierInvoice => {
                &["open", "partial", "paid", "reversed"]
            }
            DocumentKind::Expense => &["posted", "reversed"],
            DocumentKind::PayrollRun => &["approved", "posted", "reversed"],
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "mesa_invoices",
            DocumentKind::Expense => "mesa_expenses",
            DocumentKind::SupplierInvoice => "mesa_supplier_invoices",
            DocumentKind::PayrollRun => "mesa_payroll_runs",
        }
    }
}
