//! Database error types.
//!
//! Every failure coming out of sqlx is wrapped in [`DatabaseError`] with a
//! short context message. Domain outcomes such as "username taken" or "image
//! not found" are reported by the owning module, not here.

use thiserror::Error;

/// Errors that can occur during database operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A query or connection failed.
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Context plus the underlying message
        reason: String,
        /// The underlying sqlx error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },

    /// The schema on disk is newer or older than this build understands.
    #[error("Unknown migration path: v{from} to v{to}")]
    UnknownMigration {
        /// Version found in the database
        from: i64,
        /// Version this build expects
        to: i64,
    },
}

impl DatabaseError {
    /// Check if this error came from the driver or the connection pool.
    pub fn is_sqlx_error(&self) -> bool {
        matches!(self, DatabaseError::SqlxError { .. })
    }

    /// Borrow the underlying sqlx error, if any.
    pub fn sqlx_source(&self) -> Option<&sqlx::Error> {
        match self {
            DatabaseError::SqlxError { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

impl From<DatabaseError> for crate::Error {
    fn from(err: DatabaseError) -> Self {
        crate::Error::Database(err)
    }
}
