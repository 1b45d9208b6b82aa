//! Route definitions for the visit booking wizard.
//!
//! Mounted at `/book-a-visit` by `api_routes()`. Each stage's GET describes
//! the stage and its POST submits it.

use axum::routing::get;
use axum::Router;

use crate::handlers::book_a_visit;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/select-visitors",
            get(book_a_visit::show_visitors).post(book_a_visit::select_visitors),
        )
        .route(
            "/select-date-and-time",
            get(book_a_visit::show_date_and_time).post(book_a_visit::select_date_and_time),
        )
        .route(
            "/additional-support",
            get(book_a_visit::show_additional_support)
                .post(book_a_visit::select_additional_support),
        )
        .route(
            "/select-main-contact",
            get(book_a_visit::show_main_contact).post(book_a_visit::select_main_contact),
        )
        .route(
            "/check-your-answers",
            get(book_a_visit::show_check_your_answers).post(book_a_visit::book_visit),
        )
}
