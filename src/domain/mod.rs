//! Domain model for the `students` resource.

pub mod student;
pub mod validation;

pub use student::{ListParams, NewStudent, SortOrder, Student, StudentColumn, StudentPatch};
pub use validation::{FieldViolation, Location, Rule};
