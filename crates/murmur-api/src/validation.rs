use tracing::warn;

use crate::ApiError;

/// A required text field: present and not blank.
pub fn required_text(op: &str, field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(op, field)),
    }
}

pub fn required<T>(op: &str, field: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| missing(op, field))
}

fn missing(op: &str, field: &str) -> ApiError {
    warn!("{} rejected: missing {}", op, field);
    ApiError::InvalidInput(format!("{} is required", field))
}
