//! Fiscal years and month locks: decides whether a given entry date may be
//! posted to at all.
mod entity;
pub mod error;
mod repo;

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use crate::{ledger_operation::LedgerOperation, primitives::*};

pub use entity::*;
use error::*;
use repo::*;

/// Service guarding fiscal years and accounting periods.
#[derive(Clone)]
pub struct PeriodGuard {
    repo: PeriodRepo,
    pool: PgPool,
}

impl PeriodGuard {
    pub(crate) fn new(pool: &PgPool) -> Self {
        Self {
            repo: PeriodRepo::new(),
            pool: pool.clone(),
        }
    }

    /// Checks whether an entry dated `date` may currently be posted.
    #[instrument(name = "mesa_ledger.period.can_post", skip(self))]
    pub async fn can_post(&self, date: NaiveDate) -> Result<PostingPermission, PeriodError> {
        let mut conn = self.pool.acquire().await?;
        self.evaluate(&mut conn, date).await
    }

    pub async fn can_post_in_op(
        &self,
        op: &mut LedgerOperation<'_>,
        date: NaiveDate,
    ) -> Result<PostingPermission, PeriodError> {
        self.evaluate(&mut **op.tx(), date).await
    }

    async fn evaluate(
        &self,
        conn: &mut sqlx::PgConnection,
        date: NaiveDate,
    ) -> Result<PostingPermission, PeriodError> {
        let fiscal_year = match self.repo.find_by_date(&mut *conn, date).await? {
            Some(year) => year,
            None => {
                return Ok(PostingPermission {
                    fiscal_year: None,
                    denied: Some(PostingDenied::NoFiscalYearForDate(date)),
                })
            }
        };
        if !fiscal_year.accepts_postings() {
            let year = fiscal_year.year;
            return Ok(PostingPermission {
                fiscal_year: Some(fiscal_year),
                denied: Some(PostingDenied::YearClosed(year)),
            });
        }
        let period = PeriodKey::from(date);
        let denied = match self.repo.month_status(&mut *conn, period).await? {
            Some(AccountingPeriodStatus::Locked) => Some(PostingDenied::MonthLocked(period)),
            _ => None,
        };
        Ok(PostingPermission {
            fiscal_year: Some(fiscal_year),
            denied,
        })
    }

    /// Opens a brand new fiscal year. At most one fiscal year may be open at
    /// a time; opening a second one fails with `OpenYearConflict`.
    #[instrument(name = "mesa_ledger.period.open_year", skip(self))]
    pub async fn open_year(&self, new_year: NewFiscalYear) -> Result<FiscalYear, PeriodError> {
        let year = new_year.year;
        let values = new_year
            .into_values()
            .ok_or(PeriodError::InvalidYear(year))?;
        let mut op = LedgerOperation::init(&self.pool).await?;
        self.repo.create_in_tx(op.tx(), &values).await?;
        op.commit().await?;
        Ok(FiscalYear::from_values(values))
    }

    /// Closes the currently open fiscal year and hands over to its successor:
    /// the following year is opened in the same transaction, created if it
    /// does not exist yet. Returns the successor.
    #[instrument(name = "mesa_ledger.period.close_year", skip(self))]
    pub async fn close_year(&self, year: i32, actor: uuid::Uuid) -> Result<FiscalYear, PeriodError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        let current = self.repo.find_by_year_for_update(op.tx(), year).await?;
        if current.status != FiscalYearStatus::Open {
            return Err(PeriodError::OpenYearConflict(format!(
                "fiscal year {year} is not the open fiscal year"
            )));
        }
        self.repo
            .set_status(op.tx(), current.id, FiscalYearStatus::Closed)
            .await?;

        let successor = match self.repo.find_by_year(&mut **op.tx(), year + 1).await {
            Ok(next) => {
                self.repo
                    .set_status(op.tx(), next.id, FiscalYearStatus::Open)
                    .await?;
                FiscalYearValues {
                    status: FiscalYearStatus::Open,
                    temporary_open: false,
                    ..next
                }
            }
            Err(PeriodError::CouldNotFindByYear(_)) => {
                let new_year = NewFiscalYear::builder()
                    .id(FiscalYearId::new())
                    .year(year + 1)
                    .build()
                    .map_err(|_| PeriodError::InvalidYear(year + 1))?;
                let values = new_year
                    .into_values()
                    .ok_or(PeriodError::InvalidYear(year + 1))?;
                self.repo.create_in_tx(op.tx(), &values).await?;
                values
            }
            Err(err) => return Err(err),
        };
        op.commit().await?;
        Ok(FiscalYear::from_values(successor))
    }

    /// Temporarily re-opens a closed fiscal year for corrections. The year's
    /// status stays `Closed`; only the temporary flag and the audit trail
    /// change.
    #[instrument(name = "mesa_ledger.period.open_temporarily", skip(self, reason))]
    pub async fn open_temporarily(
        &self,
        year: i32,
        actor: uuid::Uuid,
        reason: impl Into<String> + std::fmt::Debug,
    ) -> Result<FiscalYear, PeriodError> {
        let reason = reason.into();
        let mut op = LedgerOperation::init(&self.pool).await?;
        let current = self.repo.find_by_year_for_update(op.tx(), year).await?;
        if current.status != FiscalYearStatus::Closed {
            return Err(PeriodError::OpenYearConflict(format!(
                "fiscal year {year} is open; temporary reopening only applies to closed years"
            )));
        }
        self.repo
            .set_temporary_open(op.tx(), current.id, actor, &reason)
            .await?;
        let values = self.repo.find_by_year(&mut **op.tx(), year).await?;
        op.commit().await?;
        Ok(FiscalYear::from_values(values))
    }

    /// Ends a temporary reopening. The reopen audit fields are retained.
    #[instrument(name = "mesa_ledger.period.close_temporary", skip(self))]
    pub async fn close_temporary(&self, year: i32) -> Result<(), PeriodError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        let current = self.repo.find_by_year_for_update(op.tx(), year).await?;
        if !current.temporary_open {
            return Err(PeriodError::NotTemporarilyOpen(year));
        }
        self.repo.clear_temporary_open(op.tx(), current.id).await?;
        op.commit().await?;
        Ok(())
    }

    /// Locks a month against further postings, independently of the fiscal
    /// year status.
    #[instrument(name = "mesa_ledger.period.lock_month", skip(self))]
    pub async fn lock_month(
        &self,
        period: PeriodKey,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        self.set_month(period, AccountingPeriodStatus::Locked).await
    }

    #[instrument(name = "mesa_ledger.period.unlock_month", skip(self))]
    pub async fn unlock_month(
        &self,
        period: PeriodKey,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        self.set_month(period, AccountingPeriodStatus::Open).await
    }

    async fn set_month(
        &self,
        period: PeriodKey,
        status: AccountingPeriodStatus,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        let mut op = LedgerOperation::init(&self.pool).await?;
        let fiscal_year = self
            .repo
            .find_by_year(&mut **op.tx(), period.year())
            .await?;
        let values = self
            .repo
            .set_month_status(op.tx(), fiscal_year.id, period, status)
            .await?;
        op.commit().await?;
        Ok(values)
    }

    #[instrument(name = "mesa_ledger.period.find_by_year", skip(self), err)]
    pub async fn find_by_year(&self, year: i32) -> Result<FiscalYear, PeriodError> {
        let values = self.repo.find_by_year(&self.pool, year).await?;
        Ok(FiscalYear::from_values(values))
    }
}
