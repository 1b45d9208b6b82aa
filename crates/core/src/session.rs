//! The booking session bag accumulated across wizard stages.
//!
//! [`VisitSessionData`] is what gets stored between requests. Every field is
//! optional because the stored value cannot be trusted to be complete (a
//! stage may have been skipped, or the session may have expired and been
//! recreated). [`crate::booking_wizard::WizardState`] is the validated view
//! over it.

use serde::{Deserialize, Serialize};

use crate::slots::VisitSlot;
use crate::support::VisitorSupport;
use crate::types::{Date, Timestamp};
use crate::visitor::VisitorListItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitRestriction {
    Open,
    Closed,
}

impl VisitRestriction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

/// Why a visit was made closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedVisitReason {
    Visitor,
    Prisoner,
}

/// Prisoner details captured when the wizard starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPrisoner {
    pub name: Option<String>,
    pub offender_no: Option<String>,
    pub date_of_birth: Option<Date>,
    pub location: Option<String>,
}

/// The chosen slot as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVisit {
    pub id: Option<String>,
    pub start_timestamp: Option<Timestamp>,
    pub end_timestamp: Option<Timestamp>,
    pub available_tables: Option<u32>,
    pub room: Option<String>,
    /// The restriction whose capacity the slot was listed under.
    #[serde(default)]
    pub visit_restriction: Option<VisitRestriction>,
}

impl From<VisitSlot> for SessionVisit {
    fn from(slot: VisitSlot) -> Self {
        Self {
            id: Some(slot.id),
            start_timestamp: Some(slot.start_timestamp),
            end_timestamp: Some(slot.end_timestamp),
            available_tables: Some(slot.available_tables),
            room: Some(slot.room),
            visit_restriction: None,
        }
    }
}

/// The main contact as stored: either a known visitor or a free-text name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMainContact {
    pub contact: Option<VisitorListItem>,
    pub contact_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Wizard state accumulated across stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSessionData {
    pub prisoner: Option<SessionPrisoner>,
    pub visit_restriction: Option<VisitRestriction>,
    pub closed_visit_reason: Option<ClosedVisitReason>,
    pub visitors: Option<Vec<VisitorListItem>>,
    pub visit: Option<SessionVisit>,
    pub visitor_support: Option<Vec<VisitorSupport>>,
    pub main_contact: Option<SessionMainContact>,
    pub visit_reference: Option<String>,
    pub visit_status: Option<String>,
}

impl VisitSessionData {
    /// A fresh session for the given prisoner.
    pub fn for_prisoner(prisoner: SessionPrisoner) -> Self {
        Self {
            prisoner: Some(prisoner),
            ..Default::default()
        }
    }

    /// The prisoner's offender identifier as stored, if any.
    pub fn offender_no(&self) -> Option<&str> {
        self.prisoner.as_ref()?.offender_no.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Typed main contact
// ---------------------------------------------------------------------------

/// Who the prison should contact about the visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainContactPerson {
    Visitor(VisitorListItem),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainContact {
    pub person: MainContactPerson,
    pub phone_number: String,
}

impl MainContact {
    pub fn display_name(&self) -> &str {
        match &self.person {
            MainContactPerson::Visitor(visitor) => &visitor.name,
            MainContactPerson::Named(name) => name,
        }
    }

    /// Read back a stored main contact. Exactly one of `contact` and
    /// `contact_name` must be set, along with a phone number.
    pub fn from_session(stored: &SessionMainContact) -> Option<Self> {
        let phone_number = stored.phone_number.clone().filter(|p| !p.trim().is_empty())?;
        let name = stored.contact_name.clone().filter(|n| !n.trim().is_empty());
        let person = match (&stored.contact, name) {
            (Some(visitor), None) => MainContactPerson::Visitor(visitor.clone()),
            (None, Some(name)) => MainContactPerson::Named(name),
            _ => return None,
        };
        Some(Self {
            person,
            phone_number,
        })
    }
}

impl From<MainContact> for SessionMainContact {
    fn from(main_contact: MainContact) -> Self {
        let (contact, contact_name) = match main_contact.person {
            MainContactPerson::Visitor(visitor) => (Some(visitor), None),
            MainContactPerson::Named(name) => (None, Some(name)),
        };
        Self {
            contact,
            contact_name,
            phone_number: Some(main_contact.phone_number),
        }
    }
}
