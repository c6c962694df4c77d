/// Errors from bulk maintenance writes.
///
/// Read paths return [`sqlx::Error`] directly; only writes that take the
/// maintenance lock can fail for a non-database reason.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Another maintenance operation is running (advisory lock {lock_id} is held)")]
    LockHeld { lock_id: i64 },
}
