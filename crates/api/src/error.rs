use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use bookvisit_core::error::{CoreError, UpstreamError};
use bookvisit_core::validation::FieldViolation;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bookvisit_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A stage form failed validation. The form values are echoed back so
    /// the stage can be redisplayed with the caller's input.
    #[error("Validation failed with {} violation(s)", errors.len())]
    Rejected {
        errors: Vec<FieldViolation>,
        form_values: serde_json::Value,
    },

    /// The session is not ready for the requested stage; send the caller to
    /// the given location instead.
    #[error("Redirect to {0}")]
    Redirect(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Core(CoreError::Upstream(err))
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Build a [`AppError::Rejected`] echoing the submitted form.
    pub fn rejected<F: serde::Serialize>(errors: Vec<FieldViolation>, form: &F) -> Self {
        AppError::Rejected {
            errors,
            form_values: serde_json::to_value(form).unwrap_or(serde_json::Value::Null),
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // --- Flow control ---
            AppError::Redirect(location) => {
                return (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
            }
            AppError::Rejected {
                errors,
                form_values,
            } => {
                let body = json!({
                    "error": "Validation failed",
                    "code": "VALIDATION_ERROR",
                    "errors": errors,
                    "form_values": form_values,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                CoreError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
                CoreError::Upstream(UpstreamError::NotFound { resource, id }) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{resource} with id {id} not found"),
                ),
                CoreError::Upstream(err) => {
                    tracing::error!(error = %err, "Upstream request failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_ERROR",
                        "An upstream service failed".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_is_see_other_with_location() {
        let response = AppError::Redirect("/api/v1/search/prisoner".into()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/v1/search/prisoner"
        );
    }

    #[test]
    fn upstream_not_found_is_distinct_from_other_failures() {
        let not_found = AppError::from(UpstreamError::NotFound {
            resource: "Visit",
            id: "ab-cd".into(),
        })
        .into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let failed = AppError::from(UpstreamError::Status {
            status: 500,
            body: "boom".into(),
        })
        .into_response();
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn rejected_is_bad_request() {
        let response = AppError::rejected(
            vec![FieldViolation::new("visitors", "No visitors selected", None)],
            &json!({ "visitors": [] }),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
