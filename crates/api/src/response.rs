//! Shared response types for API handlers.
//!
//! Page payloads use a `{ "data": ... }` envelope. Successful form posts
//! answer with a 303 redirect to the next stage, see [`see_other`].

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::booking_session::SESSION_HEADER;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A 303 See Other to `location`, carrying the booking session id when
/// there is one.
pub fn see_other(location: &str, session_id: Option<Uuid>) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, value);
    }
    if let Some(id) = session_id {
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            headers.insert(HeaderName::from_static(SESSION_HEADER), value);
        }
    }
    response
}
