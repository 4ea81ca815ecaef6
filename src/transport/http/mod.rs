pub mod router;
pub mod types;
pub mod handlers {
    pub mod health;
    pub mod students;
}

pub use router::{create_router, ApiDoc, DOCS_PATH, OPENAPI_PATH};
pub use types::AppState;
