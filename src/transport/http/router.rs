use crate::domain::student::Student;
use crate::domain::validation::{FieldViolation, Location, Rule};
use crate::transport::http::handlers::{health, students};
use crate::transport::http::types::{
    AppState, CreateStudentRequest, ErrorResponse, HealthResponse, UpdateStudentRequest,
    ValidationErrorResponse,
};
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Swagger UI mount point.
pub const DOCS_PATH: &str = "/api-docs";
/// Generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        students::list_students_handler,
        students::create_student_handler,
        students::update_student_handler,
        students::delete_student_handler
    ),
    components(schemas(
        Student,
        CreateStudentRequest,
        UpdateStudentRequest,
        FieldViolation,
        Location,
        Rule,
        ValidationErrorResponse,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "Students", description = "API for managing student records")
    )
)]
pub struct ApiDoc;

/// Builds the full application: resource routes, docs, then CORS and request tracing
/// wrapped around all of them.
pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/students",
            get(students::list_students_handler).post(students::create_student_handler),
        )
        .route(
            "/students/:id",
            put(students::update_student_handler).delete(students::delete_student_handler),
        )
        .with_state(app_state)
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .layer(trace)
        .layer(cors)
}
