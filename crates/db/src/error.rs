//! Mapping from `SeaORM` errors to ledger errors.

use payout_core::LedgerError;
use sea_orm::{DbErr, RuntimeErr};

/// SQLSTATE codes for failures that a fresh attempt may not hit.
const RETRYABLE_SQLSTATES: [&str; 3] = [
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "23505", // unique_violation
];

/// Classifies a database error as a retryable conflict or an outage.
pub fn map_db_err(err: DbErr) -> LedgerError {
    match sqlstate(&err) {
        Some(code) if RETRYABLE_SQLSTATES.contains(&code.as_str()) => {
            LedgerError::Conflict(err.to_string())
        }
        _ => LedgerError::LedgerUnavailable(err.to_string()),
    }
}

/// The PostgreSQL error code behind `err`, if it came from the server.
fn sqlstate(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}
