//! Builds a prisoner's approved visitor list from the upstream records.

use std::sync::Arc;

use serde::Serialize;

use crate::booking_wizard::PrisonerProfile;
use crate::collaborators::{BookingRecords, ContactRegistry};
use crate::error::CoreError;
use crate::identifiers::OffenderNo;
use crate::naming;
use crate::types::Date;
use crate::visitor::{build_visitor_item, VisitorListItem};

/// A prisoner's display details and approved visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrisonerVisitors {
    pub prisoner_name: String,
    pub prisoner: PrisonerProfile,
    pub visitor_list: Vec<VisitorListItem>,
}

/// Reads booking and contact records to derive who may visit a prisoner.
///
/// Holds no state beyond its collaborators, so every call is safe to retry.
#[derive(Clone)]
pub struct VisitorEligibilityService {
    bookings: Arc<dyn BookingRecords>,
    contacts: Arc<dyn ContactRegistry>,
    booking_window_days: i64,
}

impl VisitorEligibilityService {
    pub fn new(
        bookings: Arc<dyn BookingRecords>,
        contacts: Arc<dyn ContactRegistry>,
        booking_window_days: i64,
    ) -> Self {
        Self {
            bookings,
            contacts,
            booking_window_days,
        }
    }

    pub fn booking_window_days(&self) -> i64 {
        self.booking_window_days
    }

    /// Approved visitors for the prisoner as of today.
    pub async fn get_visitors(
        &self,
        offender_no: &OffenderNo,
        prison_id: Option<&str>,
        username: &str,
    ) -> Result<PrisonerVisitors, CoreError> {
        let today = chrono::Local::now().date_naive();
        self.get_visitors_on(offender_no, prison_id, username, today).await
    }

    /// Approved visitors for the prisoner, with ages and bans computed
    /// relative to `today`.
    ///
    /// Fails with [`CoreError::NotFound`] when no booking matches. A
    /// not-found from the contact registry yields an empty visitor list.
    /// Contacts not flagged as approved visitors are dropped; the remaining
    /// ones keep their upstream order.
    pub async fn get_visitors_on(
        &self,
        offender_no: &OffenderNo,
        prison_id: Option<&str>,
        username: &str,
        today: Date,
    ) -> Result<PrisonerVisitors, CoreError> {
        let bookings = self
            .bookings
            .find_bookings(offender_no, prison_id, username)
            .await?;

        let Some(booking) = bookings.into_iter().next() else {
            return Err(CoreError::NotFound {
                entity: "Prisoner",
                id: offender_no.to_string(),
            });
        };

        let contacts = match self.contacts.social_contacts(offender_no, username).await {
            Ok(contacts) => contacts,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let visitor_list = contacts
            .iter()
            .filter(|c| c.approved_visitor)
            .map(|c| build_visitor_item(c, self.booking_window_days, today))
            .collect();

        let prisoner_name = naming::prisoner_name(&booking.first_name, &booking.last_name);
        let location = booking
            .location_label()
            .unwrap_or_else(|| booking.prison_id.clone());

        Ok(PrisonerVisitors {
            prisoner: PrisonerProfile {
                name: prisoner_name.clone(),
                offender_no: booking.offender_no,
                date_of_birth: booking.date_of_birth,
                location,
            },
            prisoner_name,
            visitor_list,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PrisonerBooking;
    use crate::error::UpstreamError;
    use crate::visitor::tests::{contact, today};
    use crate::visitor::Contact;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct FakeBookings(Vec<PrisonerBooking>);

    #[async_trait]
    impl BookingRecords for FakeBookings {
        async fn find_bookings(
            &self,
            offender_no: &OffenderNo,
            _prison_id: Option<&str>,
            _username: &str,
        ) -> Result<Vec<PrisonerBooking>, UpstreamError> {
            Ok(self
                .0
                .iter()
                .filter(|b| &b.offender_no == offender_no)
                .cloned()
                .collect())
        }
    }

    enum FakeContacts {
        Found(Vec<Contact>),
        NotFound,
        Broken,
    }

    #[async_trait]
    impl ContactRegistry for FakeContacts {
        async fn social_contacts(
            &self,
            offender_no: &OffenderNo,
            _username: &str,
        ) -> Result<Vec<Contact>, UpstreamError> {
            match self {
                Self::Found(contacts) => Ok(contacts.clone()),
                Self::NotFound => Err(UpstreamError::NotFound {
                    resource: "Contacts",
                    id: offender_no.to_string(),
                }),
                Self::Broken => Err(UpstreamError::Status {
                    status: 500,
                    body: "boom".into(),
                }),
            }
        }
    }

    fn offender_no() -> OffenderNo {
        OffenderNo::parse("A1234BC").unwrap()
    }

    fn booking() -> PrisonerBooking {
        PrisonerBooking {
            booking_id: 12345,
            offender_no: offender_no(),
            first_name: "JOHN".into(),
            last_name: "SMITH".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 4, 2).unwrap(),
            prison_id: "HEI".into(),
            location: Some("1-1-C-028".into()),
            prison_name: Some("Hewell (HMP)".into()),
        }
    }

    fn service(bookings: Vec<PrisonerBooking>, contacts: FakeContacts) -> VisitorEligibilityService {
        VisitorEligibilityService::new(Arc::new(FakeBookings(bookings)), Arc::new(contacts), 28)
    }

    #[tokio::test]
    async fn approved_contacts_only_in_upstream_order() {
        let adult = contact(4321, NaiveDate::from_ymd_opt(1986, 7, 28));
        let child = contact(4324, NaiveDate::from_ymd_opt(2018, 3, 2));
        let mut unapproved = contact(4325, NaiveDate::from_ymd_opt(1980, 1, 1));
        unapproved.approved_visitor = false;

        let result = service(vec![booking()], FakeContacts::Found(vec![adult, unapproved, child]))
            .get_visitors_on(&offender_no(), Some("HEI"), "user", today())
            .await
            .unwrap();

        let ids: Vec<i64> = result.visitor_list.iter().map(|v| v.person_id).collect();
        assert_eq!(ids, vec![4321, 4324]);
        assert_eq!(result.visitor_list[0].adult, Some(true));
        assert_eq!(result.visitor_list[1].adult, Some(false));
        assert_eq!(result.prisoner_name, "Smith, John");
        assert_eq!(result.prisoner.location, "1-1-C-028, Hewell (HMP)");
    }

    #[tokio::test]
    async fn no_booking_is_not_found() {
        let err = service(Vec::new(), FakeContacts::Found(Vec::new()))
            .get_visitors_on(&offender_no(), Some("HEI"), "user", today())
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::NotFound { entity: "Prisoner", ref id } if id == "A1234BC");
    }

    #[tokio::test]
    async fn contacts_not_found_gives_empty_list() {
        let result = service(vec![booking()], FakeContacts::NotFound)
            .get_visitors_on(&offender_no(), None, "user", today())
            .await
            .unwrap();
        assert!(result.visitor_list.is_empty());
    }

    #[tokio::test]
    async fn other_contact_failures_propagate() {
        let err = service(vec![booking()], FakeContacts::Broken)
            .get_visitors_on(&offender_no(), None, "user", today())
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Upstream(UpstreamError::Status { status: 500, .. }));
    }
}
