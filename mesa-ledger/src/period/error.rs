use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeriodError {
    #[error("PeriodError - Sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("PeriodError - NotFound: fiscal year {0} not found")]
    CouldNotFindByYear(i32),
    #[error("PeriodError - YearAlreadyExists: fiscal year {0} already exists")]
    YearAlreadyExists(i32),
    #[error("PeriodError - OpenYearConflict: {0}")]
    OpenYearConflict(String),
    #[error("PeriodError - NotTemporarilyOpen: fiscal year {0} is not temporarily open")]
    NotTemporarilyOpen(i32),
    #[error("PeriodError - InvalidYear: {0} is not a representable year")]
    InvalidYear(i32),
}
