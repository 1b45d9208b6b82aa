//! Visit-scheduler client: session listing and the reservation lifecycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bookvisit_core::collaborators::VisitScheduler;
use bookvisit_core::error::UpstreamError;
use bookvisit_core::reservation::{Reservation, ReservationRequest};
use bookvisit_core::session::VisitRestriction;
use bookvisit_core::slots::{group_slots, SlotListing, SlotQuery, VisitSlot};
use bookvisit_core::support::VisitorSupport;
use bookvisit_core::types::{PersonId, Timestamp};

use crate::http::{parse_response, transport_error, UpstreamConfig};

const VISIT_TYPE_SOCIAL: &str = "SOCIAL";

pub struct VisitSchedulerClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl VisitSchedulerClient {
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
struct VisitSession {
    start_timestamp: Timestamp,
    end_timestamp: Timestamp,
    #[serde(default)]
    visit_room_name: String,
    #[serde(default)]
    open_visit_capacity: u32,
    #[serde(default)]
    open_visit_booked_count: u32,
    #[serde(default)]
    closed_visit_capacity: u32,
    #[serde(default)]
    closed_visit_booked_count: u32,
}

impl VisitSession {
    /// Free tables for the given restriction, never below zero.
    fn available_tables(&self, restriction: VisitRestriction) -> u32 {
        match restriction {
            VisitRestriction::Open => self.open_visit_capacity.saturating_sub(self.open_visit_booked_count),
            VisitRestriction::Closed => {
                self.closed_visit_capacity.saturating_sub(self.closed_visit_booked_count)
            }
        }
    }
}

/// Turn upstream sessions into slots with sequential ids in start order.
fn to_slots(mut sessions: Vec<VisitSession>, restriction: VisitRestriction) -> Vec<VisitSlot> {
    sessions.sort_by_key(|s| s.start_timestamp);
    sessions
        .into_iter()
        .enumerate()
        .map(|(index, session)| VisitSlot {
            id: (index + 1).to_string(),
            available_tables: session.available_tables(restriction),
            start_timestamp: session.start_timestamp,
            end_timestamp: session.end_timestamp,
            room: session.visit_room_name,
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireVisitor {
    nomis_person_id: PersonId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireContact<'a> {
    name: &'a str,
    telephone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReserveVisitBody<'a> {
    prisoner_id: &'a str,
    prison_code: &'a str,
    visit_room: &'a str,
    visit_type: &'static str,
    visit_restriction: VisitRestriction,
    start_timestamp: Timestamp,
    end_timestamp: Timestamp,
    visitors: Vec<WireVisitor>,
    visitor_support: &'a [VisitorSupport],
    #[serde(skip_serializing_if = "Option::is_none")]
    visit_contact: Option<WireContact<'a>>,
    actioned_by: &'a str,
}

impl<'a> ReserveVisitBody<'a> {
    fn new(request: &'a ReservationRequest, username: &'a str) -> Self {
        Self {
            prisoner_id: request.offender_no.as_str(),
            prison_code: &request.prison_id,
            visit_room: &request.slot.room,
            visit_type: VISIT_TYPE_SOCIAL,
            visit_restriction: request.visit_restriction,
            start_timestamp: request.slot.start_timestamp,
            end_timestamp: request.slot.end_timestamp,
            visitors: request
                .visitors
                .iter()
                .map(|v| WireVisitor {
                    nomis_person_id: v.person_id,
                })
                .collect(),
            visitor_support: &request.visitor_support,
            visit_contact: request.main_contact.as_ref().map(|c| WireContact {
                name: &c.name,
                telephone: &c.telephone,
            }),
            actioned_by: username,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookVisitBody<'a> {
    actioned_by: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVisit {
    reference: String,
    visit_status: String,
}

impl From<WireVisit> for Reservation {
    fn from(visit: WireVisit) -> Self {
        Reservation {
            reference: visit.reference,
            status: visit.visit_status,
        }
    }
}

#[async_trait]
impl VisitScheduler for VisitSchedulerClient {
    async fn visit_slots(&self, query: &SlotQuery) -> Result<SlotListing, UpstreamError> {
        let min = query.min_days_ahead.to_string();
        let max = query.max_days_ahead.to_string();
        let response = self
            .client
            .get(self.config.url("/visit-sessions"))
            .query(&[
                ("prisonId", query.prison_id.as_str()),
                ("prisonerId", query.offender_no.as_str()),
                ("min", min.as_str()),
                ("max", max.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let sessions: Vec<VisitSession> =
            parse_response(response, "VisitSessions", &query.prison_id).await?;
        let slots = to_slots(sessions, query.visit_restriction);
        tracing::debug!(
            prison_id = %query.prison_id,
            restriction = query.visit_restriction.as_str(),
            count = slots.len(),
            "Fetched visit sessions",
        );
        Ok(group_slots(slots, &query.filter))
    }

    async fn reserve_visit(
        &self,
        request: &ReservationRequest,
        username: &str,
    ) -> Result<Reservation, UpstreamError> {
        let response = self
            .client
            .post(self.config.url("/visits/slot/reserve"))
            .json(&ReserveVisitBody::new(request, username))
            .send()
            .await
            .map_err(transport_error)?;

        let visit: WireVisit = parse_response(response, "Visit", request.offender_no.as_str()).await?;
        Ok(visit.into())
    }

    async fn change_reservation(
        &self,
        reference: &str,
        request: &ReservationRequest,
        username: &str,
    ) -> Result<Reservation, UpstreamError> {
        let response = self
            .client
            .put(self.config.url(&format!("/visits/{reference}/slot/change")))
            .json(&ReserveVisitBody::new(request, username))
            .send()
            .await
            .map_err(transport_error)?;

        let visit: WireVisit = parse_response(response, "Visit", reference).await?;
        Ok(visit.into())
    }

    async fn book_visit(&self, reference: &str, username: &str) -> Result<Reservation, UpstreamError> {
        let response = self
            .client
            .put(self.config.url(&format!("/visits/{reference}/book")))
            .json(&BookVisitBody {
                actioned_by: username,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let visit: WireVisit = parse_response(response, "Visit", reference).await?;
        Ok(visit.into())
    }
}
