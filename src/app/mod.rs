pub mod error;
pub mod student_service;

pub use error::AppError;
pub use student_service::StudentService;
