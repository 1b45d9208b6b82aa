pub mod book_a_visit;
pub mod prisoner;

use bookvisit_core::booking_wizard::{BookingStage, RedirectTarget};
use bookvisit_core::identifiers::OffenderNo;

/// Prisoner search, the start of every booking.
pub const SEARCH_PATH: &str = "/api/v1/search/prisoner";

pub fn profile_location(offender_no: &OffenderNo) -> String {
    format!("/api/v1/prisoner/{offender_no}")
}

pub fn stage_location(stage: BookingStage) -> String {
    format!("/api/v1/book-a-visit/{}", stage.path())
}

pub fn redirect_location(target: &RedirectTarget) -> String {
    match target {
        RedirectTarget::Start => SEARCH_PATH.to_string(),
        RedirectTarget::PrisonerProfile(offender_no) => profile_location(offender_no),
    }
}
