//! Student operations.
//!
//! Each operation takes already-validated input, runs at most one pre-check and one
//! action against the gateway, and maps the outcome onto [`AppError`]. The pre-check
//! and action are separate round-trips, so concurrent writers can race between them.

use crate::app::error::AppError;
use crate::domain::student::{ListParams, NewStudent, Student, StudentPatch};
use crate::domain::validation::no_updatable_fields;
use crate::storage::{query, StudentGateway};
use std::sync::Arc;

const LIST_FAILED: &str = "Error retrieving students from database.";
const CREATE_FAILED: &str = "Error adding student to database.";
const UPDATE_FAILED: &str = "Error updating student in database.";
const DELETE_FAILED: &str = "Error deleting student from database.";

#[derive(Clone)]
pub struct StudentService {
    gateway: Arc<dyn StudentGateway>,
}

impl StudentService {
    pub fn new(gateway: Arc<dyn StudentGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Arc<dyn StudentGateway> {
        &self.gateway
    }

    pub async fn list(&self, params: &ListParams) -> Result<Vec<Student>, AppError> {
        self.gateway
            .fetch_students(&query::list_students(params))
            .await
            .map_err(AppError::store(LIST_FAILED))
    }

    /// Inserts `student` unless an identical (name, age) row already exists.
    pub async fn create(&self, student: &NewStudent) -> Result<(), AppError> {
        let existing = self
            .gateway
            .fetch_count(&query::count_duplicates(student))
            .await
            .map_err(AppError::store(CREATE_FAILED))?;
        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "User with name {} {} and age {} already exists.",
                student.first_name, student.last_name, student.age
            )));
        }

        self.gateway
            .execute(&query::insert_student(student))
            .await
            .map_err(AppError::store(CREATE_FAILED))?;
        tracing::info!(
            first_name = %student.first_name,
            last_name = %student.last_name,
            age = student.age,
            "student created"
        );
        Ok(())
    }

    /// Applies `patch` to the row. No existence pre-check: a missing row is not an error,
    /// the returned count is simply zero.
    pub async fn update(&self, student_id: i64, patch: &StudentPatch) -> Result<u64, AppError> {
        let stmt = query::update_student(student_id, patch)
            .ok_or_else(|| AppError::from(no_updatable_fields(serde_json::Value::Null)))?;

        let affected = self
            .gateway
            .execute(&stmt)
            .await
            .map_err(AppError::store(UPDATE_FAILED))?;
        if affected == 0 {
            tracing::warn!(student_id, "update matched no student");
        } else {
            tracing::info!(student_id, "student updated");
        }
        Ok(affected)
    }

    /// Deletes the row, answering `NotFound` when it does not exist.
    pub async fn delete(&self, student_id: i64) -> Result<(), AppError> {
        let existing = self
            .gateway
            .fetch_count(&query::count_by_id(student_id))
            .await
            .map_err(AppError::store(DELETE_FAILED))?;
        if existing == 0 {
            return Err(AppError::NotFound(format!(
                "Student with ID {} not found.",
                student_id
            )));
        }

        self.gateway
            .execute(&query::delete_student(student_id))
            .await
            .map_err(AppError::store(DELETE_FAILED))?;
        tracing::info!(student_id, "student deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::Rule;
    use crate::storage::{SqlValue, Statement, StoreError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    enum Reply {
        Rows(Vec<Student>),
        Count(i64),
        Affected(u64),
        Fail,
    }

    /// Answers statements from a fixed script and records what it was asked to run.
    #[derive(Default)]
    struct ScriptedGateway {
        replies: Mutex<VecDeque<Reply>>,
        seen: Mutex<Vec<Statement>>,
    }

    impl ScriptedGateway {
        fn with(replies: Vec<Reply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::default(),
            })
        }

        fn next(&self, stmt: &Statement) -> Reply {
            self.seen.lock().unwrap().push(stmt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted statement")
        }

        fn seen(&self) -> Vec<Statement> {
            self.seen.lock().unwrap().clone()
        }
    }

    fn fail() -> StoreError {
        StoreError::Connection("connection refused".into())
    }

    #[async_trait]
    impl StudentGateway for ScriptedGateway {
        async fn fetch_students(&self, stmt: &Statement) -> Result<Vec<Student>, StoreError> {
            match self.next(stmt) {
                Reply::Rows(rows) => Ok(rows),
                Reply::Fail => Err(fail()),
                _ => panic!("expected a row reply"),
            }
        }

        async fn fetch_count(&self, stmt: &Statement) -> Result<i64, StoreError> {
            match self.next(stmt) {
                Reply::Count(n) => Ok(n),
                Reply::Fail => Err(fail()),
                _ => panic!("expected a count reply"),
            }
        }

        async fn execute(&self, stmt: &Statement) -> Result<u64, StoreError> {
            match self.next(stmt) {
                Reply::Affected(n) => Ok(n),
                Reply::Fail => Err(fail()),
                _ => panic!("expected an affected-rows reply"),
            }
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn amr() -> NewStudent {
        NewStudent {
            first_name: "Amr".into(),
            last_name: "Ali".into(),
            age: 25,
        }
    }

    #[tokio::test]
    async fn create_inserts_after_clean_duplicate_check() {
        let gw = ScriptedGateway::with(vec![Reply::Count(0), Reply::Affected(1)]);
        let service = StudentService::new(gw.clone());
        service.create(&amr()).await.unwrap();

        let seen = gw.seen();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], query::count_duplicates(&amr()));
        assert_eq!(seen[1], query::insert_student(&amr()));
    }

    #[tokio::test]
    async fn create_rejects_duplicates_without_inserting() {
        let gw = ScriptedGateway::with(vec![Reply::Count(1)]);
        let service = StudentService::new(gw.clone());
        let err = service.create(&amr()).await.unwrap_err();
        match err {
            AppError::Conflict(msg) => {
                assert_eq!(msg, "User with name Amr Ali and age 25 already exists.")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(gw.seen().len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_student_is_not_found() {
        let gw = ScriptedGateway::with(vec![Reply::Count(0)]);
        let service = StudentService::new(gw.clone());
        let err = service.delete(999_999).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Student with ID 999999 not found."),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(gw.seen(), vec![query::count_by_id(999_999)]);
    }

    #[tokio::test]
    async fn delete_existing_student() {
        let gw = ScriptedGateway::with(vec![Reply::Count(1), Reply::Affected(1)]);
        let service = StudentService::new(gw.clone());
        service.delete(5).await.unwrap();
        assert_eq!(gw.seen()[1], query::delete_student(5));
    }

    #[tokio::test]
    async fn update_runs_a_single_statement() {
        let gw = ScriptedGateway::with(vec![Reply::Affected(0)]);
        let service = StudentService::new(gw.clone());
        let patch = StudentPatch {
            age: Some(30),
            ..Default::default()
        };
        assert_eq!(service.update(8, &patch).await.unwrap(), 0);

        let seen = gw.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].params, vec![SqlValue::Int(30), SqlValue::Int(8)]);
    }

    #[tokio::test]
    async fn empty_update_never_reaches_the_store() {
        let gw = ScriptedGateway::with(vec![]);
        let service = StudentService::new(gw.clone());
        let err = service.update(1, &StudentPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref v) if v[0].rule == Rule::NoFields));
        assert!(gw.seen().is_empty());
    }

    #[tokio::test]
    async fn store_failures_carry_a_generic_context() {
        let gw = ScriptedGateway::with(vec![Reply::Fail]);
        let service = StudentService::new(gw);
        let err = service.list(&ListParams::default()).await.unwrap_err();
        match err {
            AppError::Store { context, source } => {
                assert_eq!(context, LIST_FAILED);
                assert!(matches!(source, StoreError::Connection(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn list_returns_rows() {
        let row = Student {
            student_id: 1,
            first_name: "Amr".into(),
            last_name: "Ali".into(),
            age: 25,
        };
        let gw = ScriptedGateway::with(vec![Reply::Rows(vec![row.clone()])]);
        let service = StudentService::new(gw);
        assert_eq!(
            service.list(&ListParams::default()).await.unwrap(),
            vec![row]
        );
    }
}
