//! Validation result types.

use serde::{Deserialize, Serialize};

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl FieldViolation {
    pub fn new(field: &str, message: &str, value: Option<serde_json::Value>) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value,
        }
    }
}

/// Either the accepted value or every violation found.
pub type ValidationOutcome<T> = Result<T, Vec<FieldViolation>>;

/// Collects violations, then yields the accepted value only if none were
/// recorded.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: &str, value: Option<serde_json::Value>) {
        self.0.push(FieldViolation::new(field, message, value));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }

    /// Finish validation, building the accepted value lazily.
    pub fn finish<T>(self, accepted: impl FnOnce() -> T) -> ValidationOutcome<T> {
        if self.0.is_empty() {
            Ok(accepted())
        } else {
            Err(self.0)
        }
    }
}
