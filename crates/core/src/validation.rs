//! Bridges `validator` derive output into [`CoreError`].
//!
//! Request DTOs derive [`validator::Validate`]; handlers call
//! [`validate_input`] at the boundary so a failed check surfaces as a
//! regular `CoreError::Validation` (HTTP 400).

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run the derived validations on `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(|errors| flatten(&errors))
}

/// Flatten field errors into a single `field: message; field: message` string.
///
/// Fields are sorted so the message is stable across runs.
pub fn flatten(errors: &ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    CoreError::Validation(parts.join("; "))
}

/// Trim an optional string and drop it if nothing is left.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
