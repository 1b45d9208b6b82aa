//! Stage validators: visitors, time slot, additional support, main contact.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::rules::{FieldViolation, ValidationOutcome, Violations};
use crate::identifiers::is_valid_uk_phone_number;
use crate::restrictions::RestrictionType;
use crate::session::{ClosedVisitReason, MainContact, MainContactPerson, VisitRestriction};
use crate::slots::{find_available_slot, VisitSlot};
use crate::support::{SupportType, VisitorSupport};
use crate::types::PersonId;
use crate::visitor::VisitorListItem;

pub const MAX_VISITORS: usize = 3;
pub const MAX_ADULTS: usize = 2;
pub const MIN_ADULTS: usize = 1;

/// Value of the main-contact radio when the contact is not a listed visitor.
pub const SOMEONE_ELSE: &str = "someoneElse";

pub const MSG_NO_VISITORS: &str = "No visitors selected";
pub const MSG_TOO_MANY_VISITORS: &str = "Select no more than 3 visitors";
pub const MSG_NO_ADULT: &str = "Add an adult to the visit";
pub const MSG_TOO_MANY_ADULTS: &str = "Select no more than 2 adults";
pub const MSG_BANNED_VISITOR: &str = "Banned visitors cannot be added to a visit";
pub const MSG_INVALID_SELECTION: &str = "Invalid selection";
pub const MSG_NO_SLOT: &str = "No time slot selected";
pub const MSG_NO_SUPPORT_ANSWER: &str = "No answer selected";
pub const MSG_NO_SUPPORT_REQUEST: &str = "No request selected";
pub const MSG_INVALID_SUPPORT_REQUEST: &str = "Invalid request selected";
pub const MSG_NO_OTHER_DETAILS: &str = "Enter details of the request";
pub const MSG_NO_MAIN_CONTACT: &str = "No main contact selected";
pub const MSG_NO_CONTACT_NAME: &str = "Enter the name of the main contact";
pub const MSG_NO_PHONE: &str = "Enter a phone number";
pub const MSG_INVALID_PHONE: &str =
    "Enter a valid UK phone number, like 01632 960 001, 07700 900 982 or +44 808 157 0192";

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorSelectionForm {
    #[serde(default)]
    pub visitors: Vec<PersonId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelectionForm {
    pub visit_slot: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalSupportForm {
    /// `"yes"` or `"no"`.
    pub additional_support_required: Option<String>,
    #[serde(default)]
    pub additional_support: Vec<String>,
    pub other_support_details: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainContactForm {
    /// A visitor's person id, or [`SOMEONE_ELSE`].
    pub contact: Option<String>,
    pub someone_else_name: Option<String>,
    pub phone_number: Option<String>,
}

// ---------------------------------------------------------------------------
// Visitors
// ---------------------------------------------------------------------------

/// Accepted visitor selection and the restriction it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorSelection {
    pub visitors: Vec<VisitorListItem>,
    pub visit_restriction: VisitRestriction,
    pub closed_visit_reason: Option<ClosedVisitReason>,
}

/// Validate a visitor selection against the prisoner's visitor list.
///
/// Ids not on the list are treated as tampered input. Banned visitors are
/// reported separately from the count rules. A visitor with no known date
/// of birth counts as an adult.
pub fn validate_visitor_selection(
    form: &VisitorSelectionForm,
    visitor_list: &[VisitorListItem],
) -> ValidationOutcome<VisitorSelection> {
    let mut violations = Violations::new();
    let echoed = Some(json!(form.visitors));

    let unknown = form
        .visitors
        .iter()
        .any(|id| !visitor_list.iter().any(|v| v.person_id == *id));

    let selected: Vec<VisitorListItem> = visitor_list
        .iter()
        .filter(|v| form.visitors.contains(&v.person_id))
        .cloned()
        .map(|mut v| {
            v.selected = true;
            v
        })
        .collect();

    if form.visitors.is_empty() {
        violations.push("visitors", MSG_NO_VISITORS, echoed.clone());
    } else if unknown {
        violations.push("visitors", MSG_INVALID_SELECTION, echoed.clone());
    } else {
        let adults = selected.iter().filter(|v| v.counts_as_adult()).count();

        if selected.len() > MAX_VISITORS {
            violations.push("visitors", MSG_TOO_MANY_VISITORS, echoed.clone());
        }
        if adults < MIN_ADULTS {
            violations.push("visitors", MSG_NO_ADULT, echoed.clone());
        } else if adults > MAX_ADULTS {
            violations.push("visitors", MSG_TOO_MANY_ADULTS, echoed.clone());
        }
        if selected.iter().any(|v| v.banned) {
            violations.push("visitors", MSG_BANNED_VISITOR, echoed.clone());
        }
    }

    violations.finish(|| {
        let closed = selected
            .iter()
            .any(|v| v.has_restriction(&RestrictionType::Closed));
        VisitorSelection {
            visit_restriction: if closed {
                VisitRestriction::Closed
            } else {
                VisitRestriction::Open
            },
            closed_visit_reason: closed.then_some(ClosedVisitReason::Visitor),
            visitors: selected,
        }
    })
}

// ---------------------------------------------------------------------------
// Time slot
// ---------------------------------------------------------------------------

/// Validate a slot choice against the listing last shown to the user.
///
/// Unknown ids and fully booked slots get the same message.
pub fn validate_slot_selection(
    form: &SlotSelectionForm,
    last_listing: &[VisitSlot],
) -> ValidationOutcome<VisitSlot> {
    let chosen = form
        .visit_slot
        .as_deref()
        .and_then(|id| find_available_slot(last_listing, id));

    match chosen {
        Some(slot) => Ok(slot.clone()),
        None => Err(vec![FieldViolation::new(
            "visit_slot",
            MSG_NO_SLOT,
            form.visit_slot.as_ref().map(|s| json!(s)),
        )]),
    }
}

// ---------------------------------------------------------------------------
// Additional support
// ---------------------------------------------------------------------------

/// Validate the additional support answer. "no" yields an empty list.
pub fn validate_additional_support(
    form: &AdditionalSupportForm,
) -> ValidationOutcome<Vec<VisitorSupport>> {
    let mut violations = Violations::new();

    let required = match form.additional_support_required.as_deref() {
        Some("yes") => Some(true),
        Some("no") => Some(false),
        other => {
            violations.push(
                "additional_support_required",
                MSG_NO_SUPPORT_ANSWER,
                other.map(|s| json!(s)),
            );
            None
        }
    };

    let mut chosen: Vec<SupportType> = Vec::new();
    let other_details = form
        .other_support_details
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if required == Some(true) {
        let echoed = Some(json!(form.additional_support));
        if form.additional_support.is_empty() {
            violations.push("additional_support", MSG_NO_SUPPORT_REQUEST, echoed);
        } else {
            let parsed: Result<Vec<SupportType>, _> = form
                .additional_support
                .iter()
                .map(|code| SupportType::from_code(code))
                .collect();
            match parsed {
                Ok(types) => {
                    for t in types {
                        if !chosen.contains(&t) {
                            chosen.push(t);
                        }
                    }
                    if chosen.contains(&SupportType::Other) && other_details.is_none() {
                        violations.push(
                            "other_support_details",
                            MSG_NO_OTHER_DETAILS,
                            form.other_support_details.as_ref().map(|s| json!(s)),
                        );
                    }
                }
                Err(_) => violations.push("additional_support", MSG_INVALID_SUPPORT_REQUEST, echoed),
            }
        }
    }

    violations.finish(|| {
        chosen
            .into_iter()
            .map(|support_type| VisitorSupport {
                support_type,
                text: (support_type == SupportType::Other)
                    .then(|| other_details.unwrap_or_default().to_string()),
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Main contact
// ---------------------------------------------------------------------------

/// Validate the main contact choice against the visitors already selected.
pub fn validate_main_contact(
    form: &MainContactForm,
    visitors: &[VisitorListItem],
) -> ValidationOutcome<MainContact> {
    let mut violations = Violations::new();

    let person = match form.contact.as_deref().map(str::trim) {
        None | Some("") => {
            violations.push("contact", MSG_NO_MAIN_CONTACT, None);
            None
        }
        Some(SOMEONE_ELSE) => {
            match form
                .someone_else_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            {
                Some(name) => Some(MainContactPerson::Named(name.to_string())),
                None => {
                    violations.push(
                        "someone_else_name",
                        MSG_NO_CONTACT_NAME,
                        form.someone_else_name.as_ref().map(|s| json!(s)),
                    );
                    None
                }
            }
        }
        Some(raw_id) => {
            let visitor = raw_id
                .parse::<PersonId>()
                .ok()
                .and_then(|id| visitors.iter().find(|v| v.person_id == id));
            match visitor {
                Some(v) => {
                    let mut v = v.clone();
                    v.selected = false;
                    Some(MainContactPerson::Visitor(v))
                }
                None => {
                    violations.push("contact", MSG_NO_MAIN_CONTACT, Some(json!(raw_id)));
                    None
                }
            }
        }
    };

    let phone_number = match form.phone_number.as_deref().map(str::trim) {
        None | Some("") => {
            violations.push("phone_number", MSG_NO_PHONE, None);
            None
        }
        Some(phone) if !is_valid_uk_phone_number(phone) => {
            violations.push("phone_number", MSG_INVALID_PHONE, Some(json!(phone)));
            None
        }
        Some(phone) => Some(phone.to_string()),
    };

    match (person, phone_number) {
        (Some(person), Some(phone_number)) => Ok(MainContact {
            person,
            phone_number,
        }),
        _ => Err(violations.into_vec()),
    }
}
