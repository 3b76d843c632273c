//! Validation error types.

use std::fmt;

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The field name that failed validation
    pub field: String,
    /// The validation rule code (e.g., "email", "length", "range")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Validation error containing all field errors.
///
/// Middleware never sends it to the client; its `Display` form is what
/// ends up in the `debug` record of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Collection of field-level validation errors
    pub fields: Vec<FieldError>,
    /// Error message (default: "Validation failed")
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error with field errors.
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self {
            fields,
            message: "Validation failed".to_string(),
        }
    }

    /// Create a validation error that carries only a message.
    ///
    /// Handy for hand-written [`SelfValidate`](crate::SelfValidate) impls
    /// whose rules span several fields.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            message: message.into(),
        }
    }

    /// Create a validation error for a single field.
    pub fn field(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(vec![FieldError::new(field, code, message)])
    }

    /// Check if there are any field errors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the number of field errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Convert validator errors to our format.
    pub fn from_validator_errors(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = Vec::new();

        for (field, error_kinds) in errors.field_errors() {
            for error in error_kinds {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{}'", field));

                field_errors.push(FieldError::new(field.to_string(), error.code.to_string(), message));
            }
        }

        // HashMap iteration order is unstable; keep reports deterministic.
        field_errors.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));

        Self::new(field_errors)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return write!(f, "{}", self.message);
        }

        let fields: Vec<&str> = self.fields.iter().map(|e| e.field.as_str()).collect();
        write!(f, "{}: {}", self.message, fields.join(", "))
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_creation() {
        let error = FieldError::new("email", "email", "Invalid email format");
        assert_eq!(error.field, "email");
        assert_eq!(error.code, "email");
        assert_eq!(error.message, "Invalid email format");
    }

    #[test]
    fn validation_error_display_names_failing_fields() {
        let error = ValidationError::new(vec![
            FieldError::new("age", "range", "Out of range"),
            FieldError::new("email", "email", "Invalid email"),
        ]);
        assert_eq!(error.to_string(), "Validation failed: age, email");

        let error = ValidationError::message("age must be between 0 and 130");
        assert!(error.is_empty());
        assert_eq!(error.to_string(), "age must be between 0 and 130");
    }
}
