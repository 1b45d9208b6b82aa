//! Booking wizard stages and the guard deciding whether a stage may be shown.
//!
//! The stored [`VisitSessionData`] is a loose bag of optional fields. This
//! module reads it back as a [`WizardState`], a tagged union where each
//! variant carries only the data guaranteed present once that stage has
//! been completed. The guard compares the furthest completed stage with the
//! stage being requested. It never changes the session; stages advance only
//! through [`apply`] after their own form has validated.

use serde::{Deserialize, Serialize};

use crate::identifiers::OffenderNo;
use crate::reservation::Reservation;
use crate::session::{
    ClosedVisitReason, MainContact, MainContactPerson, SessionPrisoner, SessionVisit, VisitRestriction,
    VisitSessionData,
};
use crate::slots::VisitSlot;
use crate::support::VisitorSupport;
use crate::types::Date;
use crate::validation::selection::VisitorSelection;
use crate::visitor::VisitorListItem;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Wizard stages in their strict forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStage {
    ChoosePrisoner,
    ChooseVisitors,
    ChooseDateTime,
    ChooseAdditionalSupport,
    ChooseMainContact,
    CheckYourAnswers,
}

pub const ALL_STAGES: [BookingStage; 6] = [
    BookingStage::ChoosePrisoner,
    BookingStage::ChooseVisitors,
    BookingStage::ChooseDateTime,
    BookingStage::ChooseAdditionalSupport,
    BookingStage::ChooseMainContact,
    BookingStage::CheckYourAnswers,
];

impl BookingStage {
    /// 1-based position in the wizard.
    pub fn to_number(self) -> u8 {
        match self {
            Self::ChoosePrisoner => 1,
            Self::ChooseVisitors => 2,
            Self::ChooseDateTime => 3,
            Self::ChooseAdditionalSupport => 4,
            Self::ChooseMainContact => 5,
            Self::CheckYourAnswers => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ChoosePrisoner => "Choose prisoner",
            Self::ChooseVisitors => "Select visitors",
            Self::ChooseDateTime => "Select date and time",
            Self::ChooseAdditionalSupport => "Additional support",
            Self::ChooseMainContact => "Select main contact",
            Self::CheckYourAnswers => "Check your answers",
        }
    }

    /// URL path segment under the booking routes.
    pub fn path(self) -> &'static str {
        match self {
            Self::ChoosePrisoner => "select-prisoner",
            Self::ChooseVisitors => "select-visitors",
            Self::ChooseDateTime => "select-date-and-time",
            Self::ChooseAdditionalSupport => "additional-support",
            Self::ChooseMainContact => "select-main-contact",
            Self::CheckYourAnswers => "check-your-answers",
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::ChoosePrisoner => Some(Self::ChooseVisitors),
            Self::ChooseVisitors => Some(Self::ChooseDateTime),
            Self::ChooseDateTime => Some(Self::ChooseAdditionalSupport),
            Self::ChooseAdditionalSupport => Some(Self::ChooseMainContact),
            Self::ChooseMainContact => Some(Self::CheckYourAnswers),
            Self::CheckYourAnswers => None,
        }
    }

    /// The furthest stage that must already be complete before this one
    /// can be shown. Additional support is optional, so the main contact
    /// stage only needs a chosen slot.
    pub fn prerequisite(self) -> Option<Self> {
        match self {
            Self::ChoosePrisoner => None,
            Self::ChooseVisitors => Some(Self::ChoosePrisoner),
            Self::ChooseDateTime => Some(Self::ChooseVisitors),
            Self::ChooseAdditionalSupport => Some(Self::ChooseDateTime),
            Self::ChooseMainContact => Some(Self::ChooseDateTime),
            Self::CheckYourAnswers => Some(Self::ChooseMainContact),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated view of the session
// ---------------------------------------------------------------------------

/// The prisoner as read back from a session, with every field checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrisonerProfile {
    pub name: String,
    pub offender_no: OffenderNo,
    pub date_of_birth: Date,
    pub location: String,
}

impl PrisonerProfile {
    pub fn from_session(stored: &SessionPrisoner) -> Option<Self> {
        let name = stored.name.clone().filter(|n| !n.trim().is_empty())?;
        let offender_no = OffenderNo::parse(stored.offender_no.as_deref()?).ok()?;
        let date_of_birth = stored.date_of_birth?;
        let location = stored.location.clone().filter(|l| !l.trim().is_empty())?;
        Some(Self {
            name,
            offender_no,
            date_of_birth,
            location,
        })
    }
}

impl From<PrisonerProfile> for SessionPrisoner {
    fn from(profile: PrisonerProfile) -> Self {
        Self {
            name: Some(profile.name),
            offender_no: Some(profile.offender_no.to_string()),
            date_of_birth: Some(profile.date_of_birth),
            location: Some(profile.location),
        }
    }
}

fn visit_from_session(stored: &SessionVisit) -> Option<VisitSlot> {
    Some(VisitSlot {
        id: stored.id.clone().filter(|id| !id.is_empty())?,
        start_timestamp: stored.start_timestamp?,
        end_timestamp: stored.end_timestamp?,
        available_tables: stored.available_tables?,
        room: stored.room.clone().unwrap_or_default(),
    })
}

/// A slot only stands while the visit restriction it was listed under is
/// still the session's restriction.
fn visit_matches_restriction(stored: &SessionVisit, data: &VisitSessionData) -> bool {
    stored.visit_restriction.unwrap_or(VisitRestriction::Open)
        == data.visit_restriction.unwrap_or(VisitRestriction::Open)
}

/// A main contact picked from the visitors must still be one of them.
fn main_contact_in_party(main_contact: &MainContact, visitors: &[VisitorListItem]) -> bool {
    match &main_contact.person {
        MainContactPerson::Visitor(contact) => {
            visitors.iter().any(|v| v.person_id == contact.person_id)
        }
        MainContactPerson::Named(_) => true,
    }
}

/// The furthest consistent point a session has reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState<'a> {
    PrisonerChosen {
        prisoner: PrisonerProfile,
    },
    VisitorsChosen {
        prisoner: PrisonerProfile,
        visitors: &'a [VisitorListItem],
    },
    DateTimeChosen {
        prisoner: PrisonerProfile,
        visitors: &'a [VisitorListItem],
        visit: VisitSlot,
    },
    MainContactChosen {
        prisoner: PrisonerProfile,
        visitors: &'a [VisitorListItem],
        visit: VisitSlot,
        main_contact: MainContact,
    },
}

impl<'a> WizardState<'a> {
    /// Read the session back in stage order, stopping at the first stage
    /// whose data is missing, malformed or no longer agrees with the
    /// visitors chosen since. `None` means there is no usable prisoner and
    /// the wizard has to start over.
    pub fn from_session(data: &'a VisitSessionData) -> Option<Self> {
        let prisoner = PrisonerProfile::from_session(data.prisoner.as_ref()?)?;

        let Some(visitors) = data.visitors.as_deref().filter(|v| !v.is_empty()) else {
            return Some(Self::PrisonerChosen { prisoner });
        };

        let Some(visit) = data
            .visit
            .as_ref()
            .filter(|v| visit_matches_restriction(v, data))
            .and_then(visit_from_session)
        else {
            return Some(Self::VisitorsChosen { prisoner, visitors });
        };

        let Some(main_contact) = data
            .main_contact
            .as_ref()
            .and_then(MainContact::from_session)
            .filter(|mc| main_contact_in_party(mc, visitors))
        else {
            return Some(Self::DateTimeChosen {
                prisoner,
                visitors,
                visit,
            });
        };

        Some(Self::MainContactChosen {
            prisoner,
            visitors,
            visit,
            main_contact,
        })
    }

    /// The last stage whose data is complete.
    pub fn completed_stage(&self) -> BookingStage {
        match self {
            Self::PrisonerChosen { .. } => BookingStage::ChoosePrisoner,
            Self::VisitorsChosen { .. } => BookingStage::ChooseVisitors,
            Self::DateTimeChosen { .. } => BookingStage::ChooseDateTime,
            Self::MainContactChosen { .. } => BookingStage::ChooseMainContact,
        }
    }

    pub fn prisoner(&self) -> &PrisonerProfile {
        match self {
            Self::PrisonerChosen { prisoner }
            | Self::VisitorsChosen { prisoner, .. }
            | Self::DateTimeChosen { prisoner, .. }
            | Self::MainContactChosen { prisoner, .. } => prisoner,
        }
    }

    pub fn visitors(&self) -> &'a [VisitorListItem] {
        match self {
            Self::PrisonerChosen { .. } => &[],
            Self::VisitorsChosen { visitors, .. }
            | Self::DateTimeChosen { visitors, .. }
            | Self::MainContactChosen { visitors, .. } => visitors,
        }
    }

    pub fn visit(&self) -> Option<&VisitSlot> {
        match self {
            Self::DateTimeChosen { visit, .. } | Self::MainContactChosen { visit, .. } => {
                Some(visit)
            }
            _ => None,
        }
    }

    pub fn main_contact(&self) -> Option<&MainContact> {
        match self {
            Self::MainContactChosen { main_contact, .. } => Some(main_contact),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Where to send the user when a stage's prerequisites are missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The prisoner search page: no usable session.
    Start,
    /// The prisoner's profile page: a stage was skipped.
    PrisonerProfile(OffenderNo),
}

/// Outcome of [`check_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck<'a> {
    Proceed(WizardState<'a>),
    Redirect(RedirectTarget),
}

/// Decide whether `target` may be shown for the given session.
pub fn check_session(target: BookingStage, data: Option<&VisitSessionData>) -> SessionCheck<'_> {
    let Some(state) = data.and_then(WizardState::from_session) else {
        return SessionCheck::Redirect(RedirectTarget::Start);
    };

    match target.prerequisite() {
        Some(required) if state.completed_stage() < required => SessionCheck::Redirect(
            RedirectTarget::PrisonerProfile(state.prisoner().offender_no.clone()),
        ),
        _ => SessionCheck::Proceed(state),
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A validated stage result to record in the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageUpdate {
    Visitors(VisitorSelection),
    DateTime(VisitSlot),
    AdditionalSupport(Vec<VisitorSupport>),
    MainContact(MainContact),
    Reserved(Reservation),
}

impl StageUpdate {
    /// The stage this update completes.
    pub fn stage(&self) -> BookingStage {
        match self {
            Self::Visitors(_) => BookingStage::ChooseVisitors,
            Self::DateTime(_) | Self::Reserved(_) => BookingStage::ChooseDateTime,
            Self::AdditionalSupport(_) => BookingStage::ChooseAdditionalSupport,
            Self::MainContact(_) => BookingStage::ChooseMainContact,
        }
    }
}

/// Record a validated stage result and return the stage to show next.
///
/// Data belonging to later stages is left in place; revisiting a stage
/// only overwrites that stage's own fields.
pub fn apply(data: &mut VisitSessionData, update: StageUpdate) -> BookingStage {
    let stage = update.stage();
    match update {
        StageUpdate::Visitors(selection) => {
            data.visitors = Some(selection.visitors);
            data.visit_restriction = Some(selection.visit_restriction);
            data.closed_visit_reason = selection.closed_visit_reason;
        }
        StageUpdate::DateTime(slot) => {
            data.visit = Some(SessionVisit {
                visit_restriction: data.visit_restriction,
                ..SessionVisit::from(slot)
            });
        }
        StageUpdate::AdditionalSupport(support) => {
            data.visitor_support = Some(support);
        }
        StageUpdate::MainContact(main_contact) => {
            data.main_contact = Some(main_contact.into());
        }
        StageUpdate::Reserved(reservation) => {
            data.visit_reference = Some(reservation.reference);
            data.visit_status = Some(reservation.status);
        }
    }
    stage.next().unwrap_or(BookingStage::CheckYourAnswers)
}

/// The visit restriction recorded for the session, defaulting to open.
pub fn visit_restriction(data: &VisitSessionData) -> (VisitRestriction, Option<ClosedVisitReason>) {
    (
        data.visit_restriction.unwrap_or(VisitRestriction::Open),
        data.closed_visit_reason,
    )
}
