//! Contact records and the visitor list built from them.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::address::{format_address, Address};
use crate::naming;
use crate::restrictions::{ban_status, Restriction, RestrictionType};
use crate::types::{Date, PersonId};

/// Age in whole years from which a visitor counts as an adult.
pub const ADULT_AGE_YEARS: i32 = 18;

// ---------------------------------------------------------------------------
// Contact registry records (canonical shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAddress {
    #[serde(flatten)]
    pub address: Address,
    pub primary: bool,
}

/// A prisoner's social contact as held by the contact registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub person_id: PersonId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub relationship_description: String,
    pub approved_visitor: bool,
    pub restrictions: Vec<Restriction>,
    pub addresses: Vec<ContactAddress>,
}

impl Contact {
    /// The primary address, falling back to the first one listed.
    pub fn display_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.primary)
            .or_else(|| self.addresses.first())
            .map(|a| &a.address)
    }
}

// ---------------------------------------------------------------------------
// Visitor list
// ---------------------------------------------------------------------------

/// One selectable (or displayable) visitor for a prisoner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorListItem {
    pub person_id: PersonId,
    pub name: String,
    pub date_of_birth: Option<Date>,
    /// `None` when the date of birth is unknown. Consumers treat that as adult.
    pub adult: Option<bool>,
    pub relationship_description: String,
    pub address: String,
    pub restrictions: Vec<Restriction>,
    pub banned: bool,
    /// Set only while handling a visitor selection submission.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

impl VisitorListItem {
    /// Whether this visitor counts towards the adult limit.
    pub fn counts_as_adult(&self) -> bool {
        self.adult.unwrap_or(true)
    }

    pub fn has_restriction(&self, restriction_type: &RestrictionType) -> bool {
        self.restrictions
            .iter()
            .any(|r| &r.restriction_type == restriction_type)
    }
}

/// Whole years between `date_of_birth` and `today`.
pub fn age_in_years(date_of_birth: Date, today: Date) -> i32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years
}

pub fn is_adult(date_of_birth: Date, today: Date) -> bool {
    age_in_years(date_of_birth, today) >= ADULT_AGE_YEARS
}

/// Map one contact into a visitor list entry.
///
/// Restrictions are carried through untouched; only the ban flag is derived
/// from them.
pub fn build_visitor_item(contact: &Contact, booking_window_days: i64, today: Date) -> VisitorListItem {
    VisitorListItem {
        person_id: contact.person_id,
        name: naming::contact_name(&contact.first_name, &contact.last_name),
        date_of_birth: contact.date_of_birth,
        adult: contact.date_of_birth.map(|dob| is_adult(dob, today)),
        relationship_description: contact.relationship_description.clone(),
        address: format_address(contact.display_address()),
        restrictions: contact.restrictions.clone(),
        banned: ban_status(&contact.restrictions, booking_window_days, today).is_banned,
        selected: false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::address::ADDRESS_NOT_ENTERED;
    use chrono::{Duration, NaiveDate};

    pub(crate) fn today() -> Date {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    pub(crate) fn contact(person_id: PersonId, date_of_birth: Option<Date>) -> Contact {
        Contact {
            person_id,
            first_name: "JEANETTE".to_string(),
            middle_name: None,
            last_name: "SMITH".to_string(),
            date_of_birth,
            relationship_description: "Wife".to_string(),
            approved_visitor: true,
            restrictions: Vec::new(),
            addresses: Vec::new(),
        }
    }

    fn address(street: &str, primary: bool) -> ContactAddress {
        ContactAddress {
            address: Address {
                street: Some(street.to_string()),
                ..Default::default()
            },
            primary,
        }
    }

    #[test]
    fn age_counts_birthday_today() {
        let dob = NaiveDate::from_ymd_opt(2008, 3, 1).unwrap();
        assert_eq!(age_in_years(dob, today()), 18);
        assert!(is_adult(dob, today()));
    }

    #[test]
    fn age_day_before_birthday() {
        let dob = NaiveDate::from_ymd_opt(2008, 3, 2).unwrap();
        assert_eq!(age_in_years(dob, today()), 17);
        assert!(!is_adult(dob, today()));
    }

    #[test]
    fn builds_adult_visitor() {
        let c = contact(4321, NaiveDate::from_ymd_opt(1986, 7, 28));
        let item = build_visitor_item(&c, 28, today());
        assert_eq!(item.person_id, 4321);
        assert_eq!(item.name, "Jeanette Smith");
        assert_eq!(item.adult, Some(true));
        assert_eq!(item.relationship_description, "Wife");
        assert_eq!(item.address, ADDRESS_NOT_ENTERED);
        assert!(!item.banned);
        assert!(!item.selected);
    }

    #[test]
    fn unknown_date_of_birth_leaves_adult_unset() {
        let item = build_visitor_item(&contact(1, None), 28, today());
        assert_eq!(item.adult, None);
        assert!(item.counts_as_adult());
    }

    #[test]
    fn child_visitor() {
        let c = contact(2, NaiveDate::from_ymd_opt(2018, 1, 1));
        let item = build_visitor_item(&c, 28, today());
        assert_eq!(item.adult, Some(false));
        assert!(!item.counts_as_adult());
    }

    #[test]
    fn primary_address_preferred() {
        let mut c = contact(1, None);
        c.addresses = vec![address("1st", false), address("Primary Street", true)];
        assert_eq!(build_visitor_item(&c, 28, today()).address, "Primary Street");
    }

    #[test]
    fn first_address_used_without_primary() {
        let mut c = contact(1, None);
        c.addresses = vec![address("2nd", false)];
        assert_eq!(build_visitor_item(&c, 28, today()).address, "2nd");
    }

    #[test]
    fn banned_flag_derived_and_restrictions_passed_through() {
        let mut c = contact(1, None);
        c.restrictions = vec![
            Restriction {
                restriction_type: RestrictionType::Ban,
                description: "Banned".into(),
                start_date: today(),
                expiry_date: Some(today() + Duration::days(60)),
                comment: Some("Assault".into()),
                global_restriction: false,
            },
            Restriction {
                restriction_type: RestrictionType::Other("PREINF".into()),
                description: "Previous Info".into(),
                start_date: today(),
                expiry_date: None,
                comment: None,
                global_restriction: true,
            },
        ];
        let item = build_visitor_item(&c, 28, today());
        assert!(item.banned);
        assert_eq!(item.restrictions, c.restrictions);
    }
}
