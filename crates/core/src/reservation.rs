//! Reservation planning: what to send to the visit scheduler, and whether
//! to create a new reservation or change the one the session already holds.

use serde::{Deserialize, Serialize};

use crate::booking_wizard::WizardState;
use crate::identifiers::OffenderNo;
use crate::session::{MainContact, VisitRestriction, VisitSessionData};
use crate::slots::VisitSlot;
use crate::support::VisitorSupport;
use crate::types::PersonId;

/// Reference and status assigned by the visit scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub reference: String,
    pub status: String,
}

pub const STATUS_RESERVED: &str = "RESERVED";
pub const STATUS_BOOKED: &str = "BOOKED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationVisitor {
    pub person_id: PersonId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationContact {
    pub name: String,
    pub telephone: String,
}

impl From<&MainContact> for ReservationContact {
    fn from(contact: &MainContact) -> Self {
        Self {
            name: contact.display_name().to_string(),
            telephone: contact.phone_number.clone(),
        }
    }
}

/// The visit details sent on create and on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub prison_id: String,
    pub offender_no: OffenderNo,
    pub visit_restriction: VisitRestriction,
    pub slot: VisitSlot,
    pub visitors: Vec<ReservationVisitor>,
    pub visitor_support: Vec<VisitorSupport>,
    pub main_contact: Option<ReservationContact>,
}

impl ReservationRequest {
    /// Build a request from a validated session view and the slot to book.
    ///
    /// `slot` is passed separately because on the date/time stage it has
    /// only just been validated and is not yet in the session.
    pub fn from_state(
        prison_id: &str,
        state: &WizardState<'_>,
        data: &VisitSessionData,
        slot: VisitSlot,
    ) -> Self {
        Self {
            prison_id: prison_id.to_string(),
            offender_no: state.prisoner().offender_no.clone(),
            visit_restriction: data.visit_restriction.unwrap_or(VisitRestriction::Open),
            slot,
            visitors: state
                .visitors()
                .iter()
                .map(|v| ReservationVisitor {
                    person_id: v.person_id,
                })
                .collect(),
            visitor_support: data.visitor_support.clone().unwrap_or_default(),
            main_contact: state.main_contact().map(ReservationContact::from),
        }
    }
}

/// Whether the next scheduler call creates or changes a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationAction {
    Create,
    Update { reference: String },
}

impl ReservationAction {
    /// A session creates exactly one reservation; every later change in the
    /// same session updates it.
    pub fn for_session(data: &VisitSessionData) -> Self {
        match data.visit_reference.as_deref().filter(|r| !r.is_empty()) {
            Some(reference) => Self::Update {
                reference: reference.to_string(),
            },
            None => Self::Create,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_creates() {
        assert_eq!(
            ReservationAction::for_session(&VisitSessionData::default()),
            ReservationAction::Create
        );
    }

    #[test]
    fn reserved_session_updates() {
        let data = VisitSessionData {
            visit_reference: Some("ab-cd-ef-gh".into()),
            ..Default::default()
        };
        assert_eq!(
            ReservationAction::for_session(&data),
            ReservationAction::Update {
                reference: "ab-cd-ef-gh".into()
            }
        );
    }

    #[test]
    fn blank_reference_creates() {
        let data = VisitSessionData {
            visit_reference: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(ReservationAction::for_session(&data), ReservationAction::Create);
    }
}
