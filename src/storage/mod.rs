pub mod gateway;
pub mod postgres;
pub mod query;

pub use gateway::{StoreError, StudentGateway};
pub use postgres::PgGateway;
pub use query::{SqlValue, Statement};
