use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::*;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct FiscalYearValues {
    pub id: FiscalYearId,
    pub year: i32,
    pub status: FiscalYearStatus,
    pub temporary_open: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reopened_by: Option<uuid::Uuid>,
    pub reopened_at: Option<DateTime<Utc>>,
    pub reopen_reason: Option<String>,
}

impl FiscalYearValues {
    /// Whether back-dated postings into this year are currently permitted.
    pub fn accepts_postings(&self) -> bool {
        self.status == FiscalYearStatus::Open || self.temporary_open
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Month-level lock within a fiscal year.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountingPeriodValues {
    pub id: AccountingPeriodId,
    pub fiscal_year_id: FiscalYearId,
    pub period: PeriodKey,
    pub status: AccountingPeriodStatus,
}
