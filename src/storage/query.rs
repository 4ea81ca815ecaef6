//! Parameterized statements for the students table.
//!
//! Statement text only ever contains the table name and identifiers from
//! [`StudentColumn`]; every client-supplied value is pushed as a bound parameter.

use crate::domain::student::{
    ListParams, NewStudent, StudentColumn, StudentPatch, STUDENTS_TABLE,
};

/// A value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

/// Statement text plus its bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Incremental statement builder in the style of `sqlx::QueryBuilder`, but independent of
/// any connection so the produced statements can be inspected.
#[derive(Debug, Default)]
pub struct StatementBuilder {
    sql: String,
    params: Vec<SqlValue>,
}

impl StatementBuilder {
    pub fn new(init: &str) -> Self {
        Self {
            sql: init.to_string(),
            params: Vec::new(),
        }
    }

    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Appends the next `$n` placeholder and records its value.
    pub fn push_bind(&mut self, value: SqlValue) -> &mut Self {
        self.params.push(value);
        self.sql.push('$');
        self.sql.push_str(&self.params.len().to_string());
        self
    }

    pub fn build(self) -> Statement {
        Statement {
            sql: self.sql,
            params: self.params,
        }
    }
}

const SELECT_COLUMNS: &str = "\"StudentID\", \"FirstName\", \"LastName\", \"Age\"";

/// Escapes LIKE metacharacters so the filter matches as a literal substring.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Filtered, sorted and paginated listing.
pub fn list_students(params: &ListParams) -> Statement {
    let mut qb = StatementBuilder::new("SELECT ");
    qb.push(SELECT_COLUMNS)
        .push(" FROM ")
        .push(STUDENTS_TABLE)
        .push(" WHERE (\"FirstName\" || ' ' || \"LastName\") ILIKE ")
        .push_bind(SqlValue::Text(format!("%{}%", escape_like(&params.filter))))
        .push(" ORDER BY ")
        .push(params.sort_field.sql_ident())
        .push(" ")
        .push(params.sort_order.as_sql());
    if params.sort_field != StudentColumn::StudentId {
        qb.push(", \"StudentID\" ASC");
    }
    qb.push(" LIMIT ")
        .push_bind(SqlValue::Int(params.limit))
        .push(" OFFSET ")
        .push_bind(SqlValue::Int(params.offset));
    qb.build()
}

/// Counts rows with the same name and age as `student`.
pub fn count_duplicates(student: &NewStudent) -> Statement {
    let mut qb = StatementBuilder::new("SELECT COUNT(*) AS count FROM ");
    qb.push(STUDENTS_TABLE)
        .push(" WHERE \"FirstName\" = ")
        .push_bind(SqlValue::Text(student.first_name.clone()))
        .push(" AND \"LastName\" = ")
        .push_bind(SqlValue::Text(student.last_name.clone()))
        .push(" AND \"Age\" = ")
        .push_bind(SqlValue::Int(student.age));
    qb.build()
}

pub fn insert_student(student: &NewStudent) -> Statement {
    let mut qb = StatementBuilder::new("INSERT INTO ");
    qb.push(STUDENTS_TABLE)
        .push(" (\"FirstName\", \"LastName\", \"Age\") VALUES (")
        .push_bind(SqlValue::Text(student.first_name.clone()))
        .push(", ")
        .push_bind(SqlValue::Text(student.last_name.clone()))
        .push(", ")
        .push_bind(SqlValue::Int(student.age))
        .push(")");
    qb.build()
}

pub fn count_by_id(student_id: i64) -> Statement {
    let mut qb = StatementBuilder::new("SELECT COUNT(*) AS count FROM ");
    qb.push(STUDENTS_TABLE)
        .push(" WHERE \"StudentID\" = ")
        .push_bind(SqlValue::Int(student_id));
    qb.build()
}

/// SET clause covers exactly the fields present in `patch`. Returns `None` for an empty
/// patch, which has no valid statement.
pub fn update_student(student_id: i64, patch: &StudentPatch) -> Option<Statement> {
    let assignments: Vec<(StudentColumn, SqlValue)> = [
        (
            StudentColumn::FirstName,
            patch.first_name.clone().map(SqlValue::Text),
        ),
        (
            StudentColumn::LastName,
            patch.last_name.clone().map(SqlValue::Text),
        ),
        (StudentColumn::Age, patch.age.map(SqlValue::Int)),
    ]
    .into_iter()
    .filter_map(|(column, value)| value.map(|v| (column, v)))
    .collect();

    if assignments.is_empty() {
        return None;
    }

    let mut qb = StatementBuilder::new("UPDATE ");
    qb.push(STUDENTS_TABLE).push(" SET ");
    for (i, (column, value)) in assignments.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        qb.push(column.sql_ident()).push(" = ").push_bind(value);
    }
    qb.push(" WHERE \"StudentID\" = ")
        .push_bind(SqlValue::Int(student_id));
    Some(qb.build())
}

pub fn delete_student(student_id: i64) -> Statement {
    let mut qb = StatementBuilder::new("DELETE FROM ");
    qb.push(STUDENTS_TABLE)
        .push(" WHERE \"StudentID\" = ")
        .push_bind(SqlValue::Int(student_id));
    qb.build()
}

/// Idempotent table creation used at startup when enabled.
pub fn create_table_if_missing() -> Statement {
    let mut qb = StatementBuilder::new("CREATE TABLE IF NOT EXISTS ");
    qb.push(STUDENTS_TABLE).push(
        " (
            \"StudentID\" SERIAL PRIMARY KEY,
            \"FirstName\" TEXT NOT NULL,
            \"LastName\" TEXT NOT NULL,
            \"Age\" INTEGER NOT NULL CHECK (\"Age\" BETWEEN 1 AND 100)
        )",
    );
    qb.build()
}
