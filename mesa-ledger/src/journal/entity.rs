use chrono::NaiveDate;
use derive_builder::Builder;
use rust_decimal::Decimal;

pub use mesa_types::entry::{JournalEntryValues, PostingValues};
use mesa_types::document::DocumentReference;

use crate::primitives::*;

use super::error::JournalError;

/// A journal entry together with its posting lines.
pub struct JournalEntry {
    values: JournalEntryValues,
    postings: Vec<PostingValues>,
}

impl JournalEntry {
    pub(super) fn from_values(values: JournalEntryValues, postings: Vec<PostingValues>) -> Self {
        Self { values, postings }
    }

    pub fn id(&self) -> JournalEntryId {
        self.values.id
    }

    pub fn entry_number(&self) -> i32 {
        self.values.entry_number
    }

    pub fn values(&self) -> &JournalEntryValues {
        &self.values
    }

    pub fn postings(&self) -> &[PostingValues] {
        &self.postings
    }

    pub fn into_values(self) -> (JournalEntryValues, Vec<PostingValues>) {
        (self.values, self.postings)
    }

    /// A new entry that exactly mirrors this one, with every debit and credit
    /// swapped. Posting it brings the net effect of the pair to zero.
    pub fn reversal(&self, entry_date: NaiveDate) -> Result<NewJournalEntry, JournalError> {
        let mut builder = NewJournalEntry::builder();
        builder
            .id(JournalEntryId::new())
            .description(format!(
                "Reversal of entry #{}: {}",
                self.values.entry_number, self.values.description
            ))
            .entry_date(entry_date)
            .postings(
                self.postings
                    .iter()
                    .map(|p| NewPosting {
                        account_id: p.account_id,
                        debit: p.credit,
                        credit: p.debit,
                    })
                    .collect(),
            );
        if let Some(reference) = self.values.reference() {
            builder.reference(reference);
        }
        builder
            .build()
            .map_err(|e| JournalError::InvalidPosting(e.to_string()))
    }
}

/// A single posting line of a new entry. Exactly one side must be positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosting {
    pub account_id: AccountId,
    pub debit: Decimal,
    pub credit: Decimal,
}

impl NewPosting {
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    fn validate(&self) -> Result<(), JournalError> {
        if self.debit < Decimal::ZERO || self.credit < Decimal::ZERO {
            return Err(JournalError::InvalidPosting(format!(
                "posting for account '{}' has a negative amount",
                self.account_id
            )));
        }
        if (self.debit > Decimal::ZERO) == (self.credit > Decimal::ZERO) {
            return Err(JournalError::InvalidPosting(format!(
                "posting for account '{}' must have exactly one positive side",
                self.account_id
            )));
        }
        Ok(())
    }
}

/// Representation of a ***new*** journal entry with required/optional properties and a builder.
#[derive(Builder, Debug, Clone)]
pub struct NewJournalEntry {
    #[builder(setter(into))]
    pub id: JournalEntryId,
    #[builder(setter(into))]
    pub(super) description: String,
    pub(super) entry_date: NaiveDate,
    #[builder(setter(each(name = "posting")), default)]
    pub(super) postings: Vec<NewPosting>,
    #[builder(setter(strip_option), default)]
    pub(super) reference: Option<DocumentReference>,
}

impl NewJournalEntry {
    pub fn builder() -> NewJournalEntryBuilder {
        NewJournalEntryBuilder::default()
    }

    pub(super) fn entry_date(&self) -> NaiveDate {
        self.entry_date
    }

    pub(super) fn account_ids(&self) -> Vec<AccountId> {
        self.postings.iter().map(|p| p.account_id).collect()
    }

    /// Pure validation: the entry balanced within `BALANCE_TOLERANCE`, then
    /// every line well-formed.
    pub fn validate(&self) -> Result<(), JournalError> {
        if self.postings.len() < 2 {
            return Err(JournalError::EmptyEntry);
        }
        let debits: Decimal = self.postings.iter().map(|p| p.debit).sum();
        let credits: Decimal = self.postings.iter().map(|p| p.credit).sum();
        let diff = debits - credits;
        if diff.abs() > BALANCE_TOLERANCE {
            return Err(JournalError::Unbalanced(diff));
        }
        for posting in &self.postings {
            posting.validate()?;
        }
        Ok(())
    }

    pub(super) fn into_values(
        self,
        entry_number: i32,
    ) -> (JournalEntryValues, Vec<PostingValues>) {
        let values = JournalEntryValues {
            id: self.id,
            entry_number,
            description: self.description,
            entry_date: self.entry_date,
            period: PeriodKey::from(self.entry_date),
            reference_type: self.reference.as_ref().map(|r| r.kind),
            reference_id: self.reference.as_ref().map(|r| r.id),
            status: EntryStatus::Posted,
        };
        let postings = self
            .postings
            .into_iter()
            .map(|p| PostingValues {
                id: JournalPostingId::new(),
                journal_entry_id: values.id,
                account_id: p.account_id,
                debit: p.debit,
                credit: p.credit,
            })
            .collect();
        (values, postings)
    }
}
