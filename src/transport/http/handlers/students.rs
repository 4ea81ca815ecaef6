use crate::app::AppError;
use crate::domain::student::{ListParams, Student};
use crate::domain::validation::{validate_new_student, validate_student_id, validate_student_patch};
use crate::transport::http::types::{
    rejected_body, AppState, CreateStudentRequest, ErrorResponse, ListQuery,
    UpdateStudentRequest, ValidationErrorResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;

pub const CREATED_MESSAGE: &str = "User added successfully!";
pub const UPDATED_MESSAGE: &str = "User updated successfully!";
pub const DELETED_MESSAGE: &str = "User deleted successfully!";

#[utoipa::path(
    get,
    path = "/students",
    tag = "Students",
    params(ListQuery),
    responses(
        (status = 200, description = "A page of students", body = [Student]),
        (status = 500, description = "Some server error", body = ErrorResponse)
    )
)]
pub async fn list_students_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let params = ListParams::from_raw(
        query.filter.as_deref(),
        query.sort_field.as_deref(),
        query.sort_order.as_deref(),
        query.limit.as_deref(),
        query.offset.as_deref(),
    );

    match state.students.list(&params).await {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/students",
    tag = "Students",
    request_body = CreateStudentRequest,
    responses(
        (status = 200, description = "The student was created", body = String),
        (status = 400, description = "Invalid fields, unreadable JSON, or the student already exists", body = ValidationErrorResponse),
        (status = 500, description = "Some server error", body = ErrorResponse)
    )
)]
pub async fn create_student_handler(
    State(state): State<AppState>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let Json(body) = match request {
        Ok(v) => v,
        Err(e) => return AppError::from(rejected_body(e)).into_response(),
    };

    let student = match validate_new_student(&body) {
        Ok(s) => s,
        Err(errors) => return AppError::Validation(errors).into_response(),
    };

    match state.students.create(&student).await {
        Ok(()) => (StatusCode::OK, Json(CREATED_MESSAGE)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "Students",
    params(
        ("id" = i64, Path, description = "ID of the student to update")
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "The student was updated", body = String),
        (status = 400, description = "Invalid id, fields or JSON body", body = ValidationErrorResponse),
        (status = 500, description = "Some server error", body = ErrorResponse)
    )
)]
pub async fn update_student_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    // Report path and body problems together.
    let patch_result = match request {
        Ok(Json(body)) => validate_student_patch(&body),
        Err(e) => Err(vec![rejected_body(e)]),
    };
    let (student_id, patch) = match (validate_student_id(&id), patch_result) {
        (Ok(student_id), Ok(patch)) => (student_id, patch),
        (id_result, patch_result) => {
            let mut errors = Vec::new();
            if let Err(e) = id_result {
                errors.push(e);
            }
            if let Err(mut es) = patch_result {
                errors.append(&mut es);
            }
            return AppError::Validation(errors).into_response();
        }
    };

    match state.students.update(student_id, &patch).await {
        Ok(_) => (StatusCode::OK, Json(UPDATED_MESSAGE)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "Students",
    params(
        ("id" = i64, Path, description = "ID of the student to delete")
    ),
    responses(
        (status = 200, description = "The student was deleted", body = String),
        (status = 400, description = "Invalid id", body = ValidationErrorResponse),
        (status = 404, description = "The specified student was not found", body = String),
        (status = 500, description = "Some server error", body = ErrorResponse)
    )
)]
pub async fn delete_student_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let student_id = match validate_student_id(&id) {
        Ok(id) => id,
        Err(e) => return AppError::from(e).into_response(),
    };

    match state.students.delete(student_id).await {
        Ok(()) => (StatusCode::OK, Json(DELETED_MESSAGE)).into_response(),
        Err(e) => e.into_response(),
    }
}
