//! Request extractors shared by the handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caseworker from a JWT Bearer token.
//! - [`booking_session::SessionId`] -- Reads the booking session id header.

pub mod auth;
pub mod booking_session;
