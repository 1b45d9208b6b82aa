use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prisoner;
use crate::state::AppState;

/// Prisoner search and profile routes, merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search/prisoner", get(prisoner::search))
        .route("/prisoner/{offender_no}", get(prisoner::get_profile))
        .route(
            "/prisoner/{offender_no}/book-a-visit",
            post(prisoner::start_booking),
        )
}
