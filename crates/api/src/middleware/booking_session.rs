//! Booking session id carried between wizard requests.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Header carrying the booking session id.
pub const SESSION_HEADER: &str = "x-booking-session";

/// The booking session id sent with the request, if any.
///
/// A missing or malformed header is not an error: the wizard guard treats
/// it like an expired session and sends the caller back to the start.
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Option<Uuid>);

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v.trim()).ok());
        Ok(SessionId(id))
    }
}
