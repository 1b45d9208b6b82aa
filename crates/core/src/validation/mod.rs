//! Per-stage business rules for wizard form submissions.
//!
//! Every validator is pure: it takes the submitted form plus whatever the
//! session already holds, and returns either the typed value to store or
//! the full list of field violations found in one pass.

pub mod rules;
pub mod selection;

pub use rules::{FieldViolation, ValidationOutcome};
