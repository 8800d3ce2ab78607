//! Payload validation for resource writes
//!
//! A [`Schema`] turns a raw JSON request body into a [`Draft`] or a
//! [`FieldErrors`] map. Schemas are built once at startup and shared by
//! every request.

use std::{borrow::Cow, collections::BTreeMap, marker::PhantomData};

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::models::{Draft, Payload, Resource};

/// Key used for errors that are not tied to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const NULL_MESSAGE: &str = "This field may not be null.";

/// Field name to the human-readable messages raised for it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add `other`'s errors for fields that have none yet
    pub fn merge_missing(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Validation collaborator for one resource type
pub trait Schema<E: Resource>: Send + Sync {
    /// Validate `payload` as a full representation of `E`.
    ///
    /// When `existing` is given the draft keeps its identity; nothing from the
    /// stored record is merged into the result.
    fn validate(&self, payload: &Value, existing: Option<&E>) -> Result<Draft<E>, FieldErrors>;
}

/// Schema driven by the resource's `validator`-annotated payload type
pub struct PayloadSchema<E> {
    _resource: PhantomData<fn() -> E>,
}

impl<E> PayloadSchema<E> {
    pub fn new() -> Self {
        Self {
            _resource: PhantomData,
        }
    }
}

impl<E> Default for PayloadSchema<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Resource> Schema<E> for PayloadSchema<E> {
    fn validate(&self, payload: &Value, existing: Option<&E>) -> Result<Draft<E>, FieldErrors> {
        let Some(object) = payload.as_object() else {
            return Err(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected an object, but got {}.",
                    json_kind(payload)
                ),
            ));
        };

        // Type errors win over rule errors for the same field
        let mut errors = FieldErrors::new();
        let mut parsed = <E::Payload as Payload>::read(object, &mut errors);
        parsed.trim();
        if let Err(rule_errors) = parsed.validate() {
            errors.merge_missing(rule_errors.into());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Draft {
            id: existing.map(E::id),
            data: parsed.into_data(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Text field; wrong types and `null` are reported under `key`
pub fn string_field(
    object: &Map<String, Value>,
    key: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match object.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Null => {
            errors.add(key, NULL_MESSAGE);
            None
        }
        _ => {
            errors.add(key, "Not a valid string.");
            None
        }
    }
}

/// Boolean field; wrong types and `null` are reported under `key`
pub fn bool_field(
    object: &Map<String, Value>,
    key: &str,
    errors: &mut FieldErrors,
) -> Option<bool> {
    match object.get(key)? {
        Value::Bool(value) => Some(*value),
        Value::Null => {
            errors.add(key, NULL_MESSAGE);
            None
        }
        _ => {
            errors.add(key, "Must be a valid boolean.");
            None
        }
    }
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejects empty (already trimmed) text
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error_with_message("blank", "This field may not be blank."));
    }
    Ok(())
}

/// Non-blank, well-formed e-mail address
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !value.validate_email() {
        return Err(error_with_message("email", "Enter a valid email address."));
    }
    Ok(())
}
