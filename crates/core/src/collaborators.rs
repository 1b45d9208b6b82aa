//! Contracts for the upstream services the booking flow depends on.
//!
//! Implementations normalise wire formats into the canonical types used
//! here and report failures as [`UpstreamError`], keeping "not found"
//! distinguishable from every other failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::identifiers::OffenderNo;
use crate::reservation::{Reservation, ReservationRequest};
use crate::slots::{SlotListing, SlotQuery};
use crate::types::Date;
use crate::visitor::Contact;

/// A prisoner's current booking as held by the booking-records service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrisonerBooking {
    pub booking_id: i64,
    pub offender_no: OffenderNo,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub prison_id: String,
    /// Cell location, e.g. `1-1-C-028`.
    pub location: Option<String>,
    pub prison_name: Option<String>,
}

impl PrisonerBooking {
    /// Cell and establishment as one display string.
    pub fn location_label(&self) -> Option<String> {
        match (self.location.as_deref(), self.prison_name.as_deref()) {
            (Some(cell), Some(prison)) => Some(format!("{cell}, {prison}")),
            (Some(cell), None) => Some(cell.to_string()),
            (None, Some(prison)) => Some(prison.to_string()),
            (None, None) => None,
        }
    }
}

#[async_trait]
pub trait BookingRecords: Send + Sync {
    /// Bookings matching the offender, optionally scoped to one prison.
    /// An empty list is a normal response, not an error.
    async fn find_bookings(
        &self,
        offender_no: &OffenderNo,
        prison_id: Option<&str>,
        username: &str,
    ) -> Result<Vec<PrisonerBooking>, UpstreamError>;
}

#[async_trait]
pub trait ContactRegistry: Send + Sync {
    /// All social contacts for the prisoner, approved or not.
    async fn social_contacts(
        &self,
        offender_no: &OffenderNo,
        username: &str,
    ) -> Result<Vec<Contact>, UpstreamError>;
}

#[async_trait]
pub trait VisitScheduler: Send + Sync {
    async fn visit_slots(&self, query: &SlotQuery) -> Result<SlotListing, UpstreamError>;

    async fn reserve_visit(
        &self,
        request: &ReservationRequest,
        username: &str,
    ) -> Result<Reservation, UpstreamError>;

    async fn change_reservation(
        &self,
        reference: &str,
        request: &ReservationRequest,
        username: &str,
    ) -> Result<Reservation, UpstreamError>;

    async fn book_visit(&self, reference: &str, username: &str)
        -> Result<Reservation, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(location: Option<&str>, prison_name: Option<&str>) -> PrisonerBooking {
        PrisonerBooking {
            booking_id: 1,
            offender_no: OffenderNo::parse("A1234BC").unwrap(),
            first_name: "JOHN".into(),
            last_name: "SMITH".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 4, 2).unwrap(),
            prison_id: "HEI".into(),
            location: location.map(str::to_string),
            prison_name: prison_name.map(str::to_string),
        }
    }

    #[test]
    fn location_label_combines_cell_and_prison() {
        assert_eq!(
            booking(Some("1-1-C-028"), Some("Hewell (HMP)")).location_label().as_deref(),
            Some("1-1-C-028, Hewell (HMP)")
        );
        assert_eq!(booking(Some("1-1-C-028"), None).location_label().as_deref(), Some("1-1-C-028"));
        assert_eq!(booking(None, None).location_label(), None);
    }
}
