pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{AppError, StudentService};
pub use domain::{ListParams, NewStudent, Student, StudentPatch};
pub use infra::ServerConfig;
pub use storage::{PgGateway, StoreError, StudentGateway};
