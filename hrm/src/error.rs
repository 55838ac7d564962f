use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type HrmResult<T> = Result<T, HrmError>;

/// Failure taxonomy of the write paths. Conflicts carry the constrained
/// field so callers can produce a precise message.
#[derive(Debug, Error)]
pub enum HrmError {
    #[error("{0}")]
    Validation(String),
    #[error("duplicate value for {field}")]
    Conflict { field: &'static str },
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Db(DbErr),
}

impl HrmError {
    pub fn validation(message: impl Into<String>) -> Self {
        HrmError::Validation(message.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, HrmError::Conflict { .. })
    }
}

impl From<DbErr> for HrmError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return HrmError::Conflict {
                field: conflict_field(&detail),
            };
        }
        HrmError::Db(err)
    }
}

/// Maps a driver-reported unique violation back to the constrained field.
/// Postgres reports the index name, sqlite the column list; both carry
/// enough of the name to match on.
fn conflict_field(detail: &str) -> &'static str {
    if detail.contains("payroll") {
        "pay_period"
    } else if detail.contains("candidate") {
        "candidate_email"
    } else if detail.contains("employee_code") {
        "employee_code"
    } else if detail.contains("email") {
        "email"
    } else {
        "unique field"
    }
}
