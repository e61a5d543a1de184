use chrono::NaiveDate;
use derive_builder::Builder;

pub use mesa_types::period::{AccountingPeriodValues, FiscalYearValues};

use crate::primitives::*;

/// A fiscal year (calendar-aligned, January through December).
pub struct FiscalYear {
    values: FiscalYearValues,
}

impl FiscalYear {
    pub(super) fn from_values(values: FiscalYearValues) -> Self {
        Self { values }
    }

    pub fn id(&self) -> FiscalYearId {
        self.values.id
    }

    pub fn year(&self) -> i32 {
        self.values.year
    }

    pub fn values(&self) -> &FiscalYearValues {
        &self.values
    }

    pub fn into_values(self) -> FiscalYearValues {
        self.values
    }
}

/// Representation of a ***new*** fiscal year with required/optional properties and a builder.
#[derive(Builder, Debug, Clone)]
pub struct NewFiscalYear {
    #[builder(setter(into))]
    pub id: FiscalYearId,
    pub(super) year: i32,
    #[builder(default = "FiscalYearStatus::Open")]
    pub(super) status: FiscalYearStatus,
}

impl NewFiscalYear {
    pub fn builder() -> NewFiscalYearBuilder {
        NewFiscalYearBuilder::default()
    }

    pub(super) fn into_values(self) -> Option<FiscalYearValues> {
        let start_date = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let end_date = NaiveDate::from_ymd_opt(self.year, 12, 31)?;
        Some(FiscalYearValues {
            id: self.id,
            year: self.year,
            status: self.status,
            temporary_open: false,
            start_date,
            end_date,
            reopened_by: None,
            reopened_at: None,
            reopen_reason: None,
        })
    }
}

/// The outcome of asking whether an entry may be posted on a given date.
#[derive(Debug)]
pub struct PostingPermission {
    pub fiscal_year: Option<FiscalYearValues>,
    pub denied: Option<PostingDenied>,
}

impl PostingPermission {
    pub fn allowed(&self) -> bool {
        self.denied.is_none()
    }
}

/// Why a posting date was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostingDenied {
    #[error("no fiscal year covers '{0}'")]
    NoFiscalYearForDate(NaiveDate),
    #[error("fiscal year {0} is closed")]
    YearClosed(i32),
    #[error("period '{0}' is locked")]
    MonthLocked(PeriodKey),
}
