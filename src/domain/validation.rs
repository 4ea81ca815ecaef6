//! Field-level validation for student payloads.
//!
//! Every validator collects all violations before returning, so a client sees the full
//! list of problems in one response rather than the first one only.

use crate::domain::student::{NewStudent, StudentColumn, StudentPatch, MAX_AGE, MIN_AGE};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use utoipa::ToSchema;

/// Columns a client may change. Body keys are matched exactly.
const UPDATABLE: [StudentColumn; 3] = [
    StudentColumn::FirstName,
    StudentColumn::LastName,
    StudentColumn::Age,
];

/// Where the offending value came from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Body,
    Path,
}

/// The rule a value failed.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    InvalidJson,
    NotObject,
    NotString,
    Empty,
    NotInteger,
    OutOfRange,
    UnknownField,
    NoFields,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub location: Location,
    pub rule: Rule,
    pub message: String,
    #[schema(value_type = Object)]
    pub value: JsonValue,
}

impl FieldViolation {
    fn new(field: &str, location: Location, rule: Rule, message: String, value: JsonValue) -> Self {
        Self {
            field: field.to_string(),
            location,
            rule,
            message,
            value,
        }
    }
}

/// Validates a create body: `FirstName`, `LastName` and `Age` are all required.
pub fn validate_new_student(body: &JsonValue) -> Result<NewStudent, Vec<FieldViolation>> {
    let empty = Map::new();
    let obj = match body.as_object() {
        Some(o) => o,
        None => {
            // Still report the per-field requirements so the client sees what is expected.
            let mut errors = vec![not_object(body)];
            collect(&mut errors, required_name(&empty, StudentColumn::FirstName));
            collect(&mut errors, required_name(&empty, StudentColumn::LastName));
            collect(&mut errors, required_age(&empty));
            return Err(errors);
        }
    };

    let mut errors = Vec::new();
    let first_name = collect(&mut errors, required_name(obj, StudentColumn::FirstName));
    let last_name = collect(&mut errors, required_name(obj, StudentColumn::LastName));
    let age = collect(&mut errors, required_age(obj));

    match (first_name, last_name, age) {
        (Some(first_name), Some(last_name), Some(age)) if errors.is_empty() => Ok(NewStudent {
            first_name,
            last_name,
            age,
        }),
        _ => Err(errors),
    }
}

/// Validates an update body: any non-empty subset of `FirstName`, `LastName`, `Age`.
///
/// Keys outside that set are rejected; they never reach the SET clause.
pub fn validate_student_patch(body: &JsonValue) -> Result<StudentPatch, Vec<FieldViolation>> {
    let obj = match body.as_object() {
        Some(o) => o,
        None => return Err(vec![not_object(body)]),
    };

    let mut errors = Vec::new();
    for (key, value) in obj {
        if !UPDATABLE.iter().any(|c| c.name() == key) {
            errors.push(FieldViolation::new(
                key,
                Location::Body,
                Rule::UnknownField,
                format!(
                    "'{}' is not an updatable field (expected FirstName, LastName or Age)",
                    key
                ),
                value.clone(),
            ));
        }
    }

    let patch = StudentPatch {
        first_name: optional(obj, StudentColumn::FirstName)
            .and_then(|v| collect(&mut errors, name_value(StudentColumn::FirstName, v))),
        last_name: optional(obj, StudentColumn::LastName)
            .and_then(|v| collect(&mut errors, name_value(StudentColumn::LastName, v))),
        age: optional(obj, StudentColumn::Age).and_then(|v| collect(&mut errors, age_value(v))),
    };

    if errors.is_empty() && patch.is_empty() {
        errors.push(no_updatable_fields(body.clone()));
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// Violation for an update that would change nothing.
pub fn no_updatable_fields(body: JsonValue) -> FieldViolation {
    FieldViolation::new(
        "body",
        Location::Body,
        Rule::NoFields,
        "At least one of FirstName, LastName or Age must be provided".to_string(),
        body,
    )
}

/// Violation for a body that could not be read as JSON at all.
pub fn unreadable_body(detail: String) -> FieldViolation {
    FieldViolation::new(
        "body",
        Location::Body,
        Rule::InvalidJson,
        format!("Request body must be JSON sent as application/json: {}", detail),
        JsonValue::Null,
    )
}

/// Validates the `:id` path segment: an integer >= 1.
pub fn validate_student_id(raw: &str) -> Result<i64, FieldViolation> {
    let violation = |rule, message: &str| {
        FieldViolation::new(
            "id",
            Location::Path,
            rule,
            message.to_string(),
            JsonValue::from(raw),
        )
    };
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        Ok(_) => Err(violation(Rule::OutOfRange, "id must be an integer >= 1")),
        Err(_) => Err(violation(Rule::NotInteger, "id must be an integer >= 1")),
    }
}

fn collect<T>(errors: &mut Vec<FieldViolation>, result: Result<T, FieldViolation>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn not_object(body: &JsonValue) -> FieldViolation {
    FieldViolation::new(
        "body",
        Location::Body,
        Rule::NotObject,
        "Request body must be a JSON object".to_string(),
        body.clone(),
    )
}

fn optional(obj: &Map<String, JsonValue>, column: StudentColumn) -> Option<&JsonValue> {
    obj.get(column.name())
}

fn required_name(
    obj: &Map<String, JsonValue>,
    column: StudentColumn,
) -> Result<String, FieldViolation> {
    match obj.get(column.name()) {
        Some(v) => name_value(column, v),
        None => Err(FieldViolation::new(
            column.name(),
            Location::Body,
            Rule::Required,
            format!("{} is required", column.name()),
            JsonValue::Null,
        )),
    }
}

fn required_age(obj: &Map<String, JsonValue>) -> Result<i64, FieldViolation> {
    match obj.get(StudentColumn::Age.name()) {
        Some(v) => age_value(v),
        None => Err(FieldViolation::new(
            StudentColumn::Age.name(),
            Location::Body,
            Rule::Required,
            "Age is required".to_string(),
            JsonValue::Null,
        )),
    }
}

fn name_value(column: StudentColumn, v: &JsonValue) -> Result<String, FieldViolation> {
    let field = column.name();
    let s = v.as_str().ok_or_else(|| {
        FieldViolation::new(
            field,
            Location::Body,
            Rule::NotString,
            format!("{} must be a string", field),
            v.clone(),
        )
    })?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(FieldViolation::new(
            field,
            Location::Body,
            Rule::Empty,
            format!("{} must not be empty", field),
            v.clone(),
        ));
    }
    Ok(trimmed.to_string())
}

fn age_value(v: &JsonValue) -> Result<i64, FieldViolation> {
    let field = StudentColumn::Age.name();
    let parsed = if let Some(n) = v.as_i64() {
        Some(n)
    } else if let Some(f) = v.as_f64() {
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64).then_some(f as i64)
    } else if let Some(s) = v.as_str() {
        s.parse::<i64>().ok()
    } else {
        None
    };

    let age = parsed.ok_or_else(|| {
        FieldViolation::new(
            field,
            Location::Body,
            Rule::NotInteger,
            format!("Age must be an integer between {} and {}", MIN_AGE, MAX_AGE),
            v.clone(),
        )
    })?;
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(FieldViolation::new(
            field,
            Location::Body,
            Rule::OutOfRange,
            format!("Age must be an integer between {} and {}", MIN_AGE, MAX_AGE),
            v.clone(),
        ));
    }
    Ok(age)
}
