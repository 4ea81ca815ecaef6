use crate::app::StudentService;
use crate::domain::validation::{unreadable_body, FieldViolation};
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub students: StudentService,
}

/// Query string of `GET /students`. Values stay raw strings; normalization never fails.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring matched against "FirstName LastName".
    pub filter: Option<String>,
    /// One of StudentID, FirstName, LastName, Age (default StudentID).
    pub sort_field: Option<String>,
    /// `desc` for descending; anything else sorts ascending.
    pub sort_order: Option<String>,
    /// Page size (default 10).
    pub limit: Option<String>,
    /// Rows to skip (default 0).
    pub offset: Option<String>,
}

/// Create body (documentation only; bodies are validated from raw JSON).
#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct CreateStudentRequest {
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    /// 1..=100
    #[serde(rename = "Age")]
    pub age: i32,
}

/// Update body: any non-empty subset of the fields.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct UpdateStudentRequest {
    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    /// 1..=100
    #[serde(rename = "Age")]
    pub age: Option<i32>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldViolation>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Turns a body the `Json` extractor refused (bad syntax, wrong content type) into a
/// 400 violation, so it is reported alongside any other field problems.
pub fn rejected_body(err: JsonRejection) -> FieldViolation {
    tracing::debug!(error = %err.body_text(), "rejected request body");
    unreadable_body(err.body_text())
}
