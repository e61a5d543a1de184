use chrono::NaiveDate;
use sqlx::{Postgres, Transaction};

use crate::primitives::*;

use super::{entity::*, error::PeriodError};

/// All queries run on a caller-supplied executor so the guard can evaluate
/// inside a posting transaction.
#[derive(Debug, Clone)]
pub(super) struct PeriodRepo;

impl PeriodRepo {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_in_tx(
        &self,
        db: &mut Transaction<'_, Postgres>,
        values: &FiscalYearValues,
    ) -> Result<(), PeriodError> {
        let res = sqlx::query(
            r#"INSERT INTO mesa_fiscal_years
               (id, year, status, temporary_open, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(values.id)
        .bind(values.year)
        .bind(values.status)
        .bind(values.temporary_open)
        .bind(values.start_date)
        .bind(values.end_date)
        .execute(&mut **db)
        .await;
        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                if err.constraint() == Some("mesa_fiscal_years_one_open_idx") {
                    Err(PeriodError::OpenYearConflict(format!(
                        "cannot open fiscal year {}: another fiscal year is already open",
                        values.year
                    )))
                } else {
                    Err(PeriodError::YearAlreadyExists(values.year))
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn find_by_year(
        &self,
        executor: impl sqlx::PgExecutor<'_>,
        year: i32,
    ) -> Result<FiscalYearValues, PeriodError> {
        sqlx::query_as::<_, FiscalYearValues>(
            r#"SELECT id, year, status, temporary_open, start_date, end_date,
                      reopened_by, reopened_at, reopen_reason
               FROM mesa_fiscal_years
               WHERE year = $1"#,
        )
        .bind(year)
        .fetch_optional(executor)
        .await?
        .ok_or(PeriodError::CouldNotFindByYear(year))
    }

    pub async fn find_by_year_for_update(
        &self,
        db: &mut Transaction<'_, Postgres>,
        year: i32,
    ) -> Result<FiscalYearValues, PeriodError> {
        sqlx::query_as::<_, FiscalYearValues>(
            r#"SELECT id, year, status, temporary_open, start_date, end_date,
                      reopened_by, reopened_at, reopen_reason
               FROM mesa_fiscal_years
               WHERE year = $1
               FOR UPDATE"#,
        )
        .bind(year)
        .fetch_optional(&mut **db)
        .await?
        .ok_or(PeriodError::CouldNotFindByYear(year))
    }

    pub async fn find_by_date(
        &self,
        executor: impl sqlx::PgExecutor<'_>,
        date: NaiveDate,
    ) -> Result<Option<FiscalYearValues>, PeriodError> {
        let year = sqlx::query_as::<_, FiscalYearValues>(
            r#"SELECT id, year, status, temporary_open, start_date, end_date,
                      reopened_by, reopened_at, reopen_reason
               FROM mesa_fiscal_years
               WHERE start_date <= $1 AND end_date >= $1"#,
        )
        .bind(date)
        .fetch_optional(executor)
        .await?;
        Ok(year)
    }

    pub async fn set_status(
        &self,
        db: &mut Transaction<'_, Postgres>,
        id: FiscalYearId,
        status: FiscalYearStatus,
    ) -> Result<(), PeriodError> {
        let res = sqlx::query(
            r#"UPDATE mesa_fiscal_years
               SET status = $2, temporary_open = false
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(status)
        .execute(&mut **db)
        .await;
        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(PeriodError::OpenYearConflict(
                    "cannot reopen: another fiscal year is already open".to_string(),
                ))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn set_temporary_open(
        &self,
        db: &mut Transaction<'_, Postgres>,
        id: FiscalYearId,
        actor: uuid::Uuid,
        reason: &str,
    ) -> Result<(), PeriodError> {
        sqlx::query(
            r#"UPDATE mesa_fiscal_years
               SET temporary_open = true, reopened_by = $2, reopened_at = NOW(), reopen_reason = $3
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(actor)
        .bind(reason)
        .execute(&mut **db)
        .await?;
        Ok(())
    }

    /// Clears the temporary-open flag, keeping the reopen audit fields.
    pub async fn clear_temporary_open(
        &self,
        db: &mut Transaction<'_, Postgres>,
        id: FiscalYearId,
    ) -> Result<(), PeriodError> {
        sqlx::query(
            r#"UPDATE mesa_fiscal_years
               SET temporary_open = false
               WHERE id = $1"#,
        )
        .bind(id)
        .execute(&mut **db)
        .await?;
        Ok(())
    }

    pub async fn month_status(
        &self,
        executor: impl sqlx::PgExecutor<'_>,
        period: PeriodKey,
    ) -> Result<Option<AccountingPeriodStatus>, PeriodError> {
        let status = sqlx::query_scalar::<_, AccountingPeriodStatus>(
            r#"SELECT status FROM mesa_accounting_periods WHERE period = $1"#,
        )
        .bind(period)
        .fetch_optional(executor)
        .await?;
        Ok(status)
    }

    pub async fn set_month_status(
        &self,
        db: &mut Transaction<'_, Postgres>,
        fiscal_year_id: FiscalYearId,
        period: PeriodKey,
        status: AccountingPeriodStatus,
    ) -> Result<AccountingPeriodValues, PeriodError> {
        let values = sqlx::query_as::<_, AccountingPeriodValues>(
            r#"INSERT INTO mesa_accounting_periods (id, fiscal_year_id, period, status)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (period)
               DO UPDATE SET status = EXCLUDED.status
               RETURNING id, fiscal_year_id, period, status"#,
        )
        .bind(AccountingPeriodId::new())
        .bind(fiscal_year_id)
        .bind(period)
        .bind(status)
        .fetch_one(&mut **db)
        .await?;
        Ok(values)
    }
}
