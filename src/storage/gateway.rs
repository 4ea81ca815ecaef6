//! Data access seam between the handlers and the relational store.

use crate::domain::student::Student;
use crate::storage::query::Statement;
use async_trait::async_trait;

/// Failures surfaced by a [`StudentGateway`].
///
/// The message is for logs only; responses never include it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, I/O, TLS, closed pool).
    #[error("store unreachable: {0}")]
    Connection(String),

    /// The store rejected or failed to run the statement.
    #[error("statement failed: {0}")]
    Query(String),

    /// A returned row did not have the expected shape.
    #[error("unexpected row shape: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connection(e.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => StoreError::Decode(e.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Executes parameterized statements.
///
/// Implementations own their connection handling; they are shared by every request.
#[async_trait]
pub trait StudentGateway: Send + Sync {
    /// Runs a row-returning statement and decodes student rows.
    async fn fetch_students(&self, stmt: &Statement) -> Result<Vec<Student>, StoreError>;

    /// Runs a `SELECT COUNT(*) AS count ...` statement.
    async fn fetch_count(&self, stmt: &Statement) -> Result<i64, StoreError>;

    /// Runs a mutating statement and returns the number of affected rows.
    async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError>;

    /// Cheap round-trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
