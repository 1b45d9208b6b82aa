/// Failure reported by an upstream collaborator.
///
/// `NotFound` is kept apart from every other failure because callers route
/// it to a distinct outcome (a "not found" page, or an empty list).
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}
