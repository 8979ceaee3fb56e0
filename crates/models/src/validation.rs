use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::ModelError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[A-Za-z0-9-]{2,}$").expect("Failed to compile email regex"));

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn validate_email(field: &str, value: &str) -> Result<(), ModelError> {
    if is_email(value) {
        Ok(())
    } else {
        Err(ModelError::validation(format!("\"{field}\" must be a valid email")))
    }
}

/// Interpret a request body as a JSON object.
pub fn as_object(body: &Value) -> Result<&Map<String, Value>, ModelError> {
    body.as_object()
        .ok_or_else(|| ModelError::validation("\"value\" must be of type object"))
}

/// Read an optional non-empty string field.
pub fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, ModelError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ModelError::validation(format!("\"{field}\" is not allowed to be empty")))
        }
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ModelError::validation(format!("\"{field}\" must be a string"))),
    }
}

/// Read a required non-empty string field.
pub fn required_string(obj: &Map<String, Value>, field: &str) -> Result<String, ModelError> {
    optional_string(obj, field)?
        .ok_or_else(|| ModelError::validation(format!("\"{field}\" is required")))
}

/// Reject keys outside `allowed`.
pub fn deny_unknown(obj: &Map<String, Value>, allowed: &[&str]) -> Result<(), ModelError> {
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(ModelError::validation(format!("\"{key}\" is not allowed"))),
        None => Ok(()),
    }
}
