pub mod book_a_visit;
pub mod health;
pub mod prisoner;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /search/prisoner                          prisoner search (?offender_no)
/// /prisoner/{offender_no}                   profile and approved visitors
/// /prisoner/{offender_no}/book-a-visit      start a booking session (POST)
///
/// /book-a-visit/select-visitors             stage 2 (GET, POST)
/// /book-a-visit/select-date-and-time        stage 3 (GET ?days&time_of_day, POST)
/// /book-a-visit/additional-support          stage 4 (GET, POST)
/// /book-a-visit/select-main-contact         stage 5 (GET, POST)
/// /book-a-visit/check-your-answers          stage 6 (GET, POST books the visit)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(prisoner::router())
        .nest("/book-a-visit", book_a_visit::router())
}
