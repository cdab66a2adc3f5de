//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Category, Error, PlayerId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidCategory,
    InvalidPlayerId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidCategory => "invalid_category",
            ErrorCode::InvalidPlayerId => "invalid_player_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_category_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be one of: {}", Category::accepted_values()),
    )
    .with_value(ErrorCode::InvalidCategory, value)
}

pub(crate) fn invalid_player_id_error(field: FieldName, value: i64) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a non-negative integer"))
        .with_value(ErrorCode::InvalidPlayerId, value.to_string())
}

pub(crate) fn parse_category(value: &str, field: FieldName) -> Result<Category, Error> {
    value
        .parse()
        .map_err(|_| invalid_category_error(field, value))
}

pub(crate) fn parse_optional_category(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Category>, Error> {
    value.map(|raw| parse_category(raw, field)).transpose()
}

pub(crate) fn parse_player_id(value: i64, field: FieldName) -> Result<PlayerId, Error> {
    PlayerId::new(value).map_err(|_| invalid_player_id_error(field, value))
}
