use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{document::DocumentReference, primitives::*};

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct JournalEntryValues {
    pub id: JournalEntryId,
    pub entry_number: i32,
    pub description: String,
    pub entry_date: NaiveDate,
    pub period: PeriodKey,
    pub reference_type: Option<DocumentKind>,
    pub reference_id: Option<DocumentId>,
    pub status: EntryStatus,
}

impl JournalEntryValues {
    /// The source document this entry was created for, if any.
    pub fn reference(&self) -> Option<DocumentReference> {
        match (self.reference_type, self.reference_id) {
            (Some(kind), Some(id)) => Some(DocumentReference { kind, id }),
            _ => None,
        }
    }
}

/// One debit-or-credit line within a journal entry.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostingValues {
    pub id: JournalPostingId,
    pub journal_entry_id: JournalEntryId,
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl PostingValues {
    pub fn direction(&self) -> DebitOrCredit {
        if self.debit > Decimal::ZERO {
            DebitOrCredit::Debit
        } else {
            DebitOrCredit::Credit
        }
    }

    /// Positive for debits, negative for credits.
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}
