//! Contact-registry client.
//!
//! The registry has returned addresses in two shapes over time: the current
//! one with plain `town`/`county`/`country` strings, and an older one where
//! those fields hold reference codes and the display text is in
//! `townDescription`/`countyDescription`/`countryDescription`. Both are
//! accepted here and mapped to the single core [`Address`].

use async_trait::async_trait;
use serde::Deserialize;

use bookvisit_core::address::Address;
use bookvisit_core::collaborators::ContactRegistry;
use bookvisit_core::error::UpstreamError;
use bookvisit_core::identifiers::OffenderNo;
use bookvisit_core::restrictions::{Restriction, RestrictionType};
use bookvisit_core::types::{Date, PersonId};
use bookvisit_core::visitor::{Contact, ContactAddress};

use crate::http::{parse_response, transport_error, UpstreamConfig};

/// Contact type code for social (as opposed to official) contacts.
const SOCIAL_CONTACT_TYPE: &str = "S";

pub struct ContactRegistryClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl ContactRegistryClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: config.build_client()?,
            config,
        })
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContact {
    person_id: PersonId,
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    date_of_birth: Option<Date>,
    relationship_description: Option<String>,
    #[serde(default)]
    approved_visitor: bool,
    #[serde(default)]
    restrictions: Vec<RawRestriction>,
    #[serde(default)]
    addresses: Vec<RawAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRestriction {
    restriction_type: String,
    restriction_type_description: Option<String>,
    start_date: Date,
    expiry_date: Option<Date>,
    comment: Option<String>,
    #[serde(default)]
    global_restriction: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    flat: Option<String>,
    premise: Option<String>,
    street: Option<String>,
    locality: Option<String>,
    town: Option<String>,
    town_description: Option<String>,
    county: Option<String>,
    county_description: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    country_description: Option<String>,
    #[serde(default)]
    primary: bool,
}

impl From<RawAddress> for ContactAddress {
    fn from(raw: RawAddress) -> Self {
        ContactAddress {
            address: Address {
                flat: raw.flat,
                premise: raw.premise,
                street: raw.street,
                locality: raw.locality,
                town: raw.town_description.or(raw.town),
                county: raw.county_description.or(raw.county),
                postal_code: raw.postal_code,
                country: raw.country_description.or(raw.country),
            },
            primary: raw.primary,
        }
    }
}

impl From<RawRestriction> for Restriction {
    fn from(raw: RawRestriction) -> Self {
        Restriction {
            description: raw
                .restriction_type_description
                .unwrap_or_else(|| raw.restriction_type.clone()),
            restriction_type: RestrictionType::from(raw.restriction_type),
            start_date: raw.start_date,
            expiry_date: raw.expiry_date,
            comment: raw.comment,
            global_restriction: raw.global_restriction,
        }
    }
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        Contact {
            person_id: raw.person_id,
            first_name: raw.first_name,
            middle_name: raw.middle_name,
            last_name: raw.last_name,
            date_of_birth: raw.date_of_birth,
            relationship_description: raw.relationship_description.unwrap_or_default(),
            approved_visitor: raw.approved_visitor,
            restrictions: raw.restrictions.into_iter().map(Restriction::from).collect(),
            addresses: raw.addresses.into_iter().map(ContactAddress::from).collect(),
        }
    }
}

#[async_trait]
impl ContactRegistry for ContactRegistryClient {
    async fn social_contacts(
        &self,
        offender_no: &OffenderNo,
        _username: &str,
    ) -> Result<Vec<Contact>, UpstreamError> {
        let response = self
            .client
            .get(self.config.url(&format!("/prisoners/{offender_no}/contacts")))
            .query(&[("type", SOCIAL_CONTACT_TYPE)])
            .send()
            .await
            .map_err(transport_error)?;

        let raw: Vec<RawContact> = parse_response(response, "Contacts", offender_no.as_str()).await?;
        Ok(raw.into_iter().map(Contact::from).collect())
    }
}
