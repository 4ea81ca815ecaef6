//! The `students` resource: stored rows, validated inputs and list parameters.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name of the table backing the resource.
pub const STUDENTS_TABLE: &str = "students";

/// Inclusive bounds for `Age`.
pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 100;

pub const DEFAULT_LIST_LIMIT: i64 = 10;

/// A stored student row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    #[serde(rename = "StudentID")]
    pub student_id: i32,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Age")]
    pub age: i32,
}

/// A validated create payload. Names are already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
}

/// A validated update payload. At least one field is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i64>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.age.is_none()
    }
}

/// Columns of the students table.
///
/// This is also the allow-list for `sortField`: only these identifiers are ever written
/// into statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentColumn {
    #[default]
    StudentId,
    FirstName,
    LastName,
    Age,
}

impl StudentColumn {
    pub const ALL: [StudentColumn; 4] = [
        StudentColumn::StudentId,
        StudentColumn::FirstName,
        StudentColumn::LastName,
        StudentColumn::Age,
    ];

    /// Wire name, as it appears in JSON bodies and the `sortField` query parameter.
    pub fn name(self) -> &'static str {
        match self {
            StudentColumn::StudentId => "StudentID",
            StudentColumn::FirstName => "FirstName",
            StudentColumn::LastName => "LastName",
            StudentColumn::Age => "Age",
        }
    }

    /// Quoted SQL identifier (the columns are mixed-case).
    pub fn sql_ident(self) -> &'static str {
        match self {
            StudentColumn::StudentId => "\"StudentID\"",
            StudentColumn::FirstName => "\"FirstName\"",
            StudentColumn::LastName => "\"LastName\"",
            StudentColumn::Age => "\"Age\"",
        }
    }

    /// Case-insensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than an explicit `desc` sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub filter: String,
    pub sort_field: StudentColumn,
    pub sort_order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort_field: StudentColumn::default(),
            sort_order: SortOrder::default(),
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl ListParams {
    /// Builds list parameters from raw query strings.
    ///
    /// Listing never fails on its inputs: unknown sort fields fall back to `StudentID`,
    /// unusable limits to the default and unusable offsets to zero.
    pub fn from_raw(
        filter: Option<&str>,
        sort_field: Option<&str>,
        sort_order: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> Self {
        let sort_field = match sort_field.filter(|s| !s.trim().is_empty()) {
            Some(raw) => StudentColumn::from_name(raw).unwrap_or_else(|| {
                tracing::debug!(sort_field = raw, "ignoring unknown sort field");
                StudentColumn::default()
            }),
            None => StudentColumn::default(),
        };

        let limit = limit
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT);

        let offset = offset
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .unwrap_or(0);

        Self {
            filter: filter.unwrap_or_default().to_string(),
            sort_field,
            sort_order: SortOrder::parse(sort_order),
            limit,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_lookup_is_case_insensitive() {
        assert_eq!(StudentColumn::from_name("age"), Some(StudentColumn::Age));
        assert_eq!(StudentColumn::from_name("FIRSTNAME"), Some(StudentColumn::FirstName));
        assert_eq!(StudentColumn::from_name("StudentID"), Some(StudentColumn::StudentId));
        assert_eq!(StudentColumn::from_name("Age; DROP TABLE students"), None);
    }

    #[test]
    fn only_explicit_desc_sorts_descending() {
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("descending")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }

    #[test]
    fn list_params_defaults() {
        let params = ListParams::from_raw(None, None, None, None, None);
        assert_eq!(params, ListParams::default());
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset, 0);
        assert_eq!(params.sort_field, StudentColumn::StudentId);
    }

    #[test]
    fn list_params_fall_back_on_unusable_values() {
        let params = ListParams::from_raw(
            Some("amr"),
            Some("password"),
            Some("desc"),
            Some("-3"),
            Some("abc"),
        );
        assert_eq!(params.filter, "amr");
        assert_eq!(params.sort_field, StudentColumn::StudentId);
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert_eq!(params.limit, DEFAULT_LIST_LIMIT);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn large_list_limits_pass_through() {
        let params = ListParams::from_raw(None, Some("Age"), None, Some("500"), Some("20"));
        assert_eq!(params.sort_field, StudentColumn::Age);
        assert_eq!(params.limit, 500);
        assert_eq!(params.offset, 20);
    }

    #[test]
    fn student_serializes_with_wire_names() {
        let student = Student {
            student_id: 7,
            first_name: "Amr".into(),
            last_name: "Ali".into(),
            age: 25,
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"StudentID": 7, "FirstName": "Amr", "LastName": "Ali", "Age": 25})
        );
    }
}
