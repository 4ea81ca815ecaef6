//! Postgres implementation of the student gateway.

use crate::domain::student::Student;
use crate::storage::gateway::{StoreError, StudentGateway};
use crate::storage::query::{self, SqlValue, Statement};
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};

/// Gateway backed by a `PgPool`. Clones share the pool.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the students table if it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        self.execute(&query::create_table_if_missing()).await?;
        Ok(())
    }
}

fn bind_all<'q>(stmt: &'q Statement) -> Query<'q, Postgres, PgArguments> {
    let mut q = sqlx::query(&stmt.sql);
    for param in &stmt.params {
        q = match param {
            SqlValue::Text(s) => q.bind(s.as_str()),
            SqlValue::Int(n) => q.bind(*n),
        };
    }
    q
}

#[async_trait]
impl StudentGateway for PgGateway {
    async fn fetch_students(&self, stmt: &Statement) -> Result<Vec<Student>, StoreError> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "fetching students");
        let rows = bind_all(stmt).fetch_all(&self.pool).await?;
        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            students.push(Student {
                student_id: row.try_get("StudentID")?,
                first_name: row.try_get("FirstName")?,
                last_name: row.try_get("LastName")?,
                age: row.try_get("Age")?,
            });
        }
        Ok(students)
    }

    async fn fetch_count(&self, stmt: &Statement) -> Result<i64, StoreError> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "counting students");
        let row = bind_all(stmt).fetch_one(&self.pool).await?;
        Ok(row.try_get("count")?)
    }

    async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError> {
        tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
        let result = bind_all(stmt).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
