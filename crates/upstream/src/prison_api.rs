//! Booking-records client (prison API).

use async_trait::async_trait;
use serde::Deserialize;

use bookvisit_core::collaborators::{BookingRecords, PrisonerBooking};
use bookvisit_core::error::UpstreamError;
use bookvisit_core::identifiers::OffenderNo;
use bookvisit_core::types::Date;

use crate::http::{parse_response, transport_error, UpstreamConfig};

pub struct PrisonApiClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl PrisonApiClient {
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
struct BookingPage {
    #[serde(default)]
    content: Vec<BookingSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingSummary {
    booking_id: i64,
    offender_no: String,
    first_name: String,
    last_name: String,
    date_of_birth: Date,
    agency_id: String,
    assigned_living_unit: Option<LivingUnit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LivingUnit {
    description: Option<String>,
    agency_name: Option<String>,
}

fn to_booking(summary: BookingSummary) -> Option<PrisonerBooking> {
    // Records whose offender number fails the format check are dropped.
    let offender_no = OffenderNo::parse(&summary.offender_no).ok()?;
    let (location, prison_name) = match summary.assigned_living_unit {
        Some(unit) => (unit.description, unit.agency_name),
        None => (None, None),
    };
    Some(PrisonerBooking {
        booking_id: summary.booking_id,
        offender_no,
        first_name: summary.first_name,
        last_name: summary.last_name,
        date_of_birth: summary.date_of_birth,
        prison_id: summary.agency_id,
        location,
        prison_name,
    })
}

#[async_trait]
impl BookingRecords for PrisonApiClient {
    async fn find_bookings(
        &self,
        offender_no: &OffenderNo,
        prison_id: Option<&str>,
        _username: &str,
    ) -> Result<Vec<PrisonerBooking>, UpstreamError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("offenderNo", offender_no.as_str()),
            ("legalInfo", "true"),
        ];
        if let Some(prison_id) = prison_id {
            query.push(("prisonId", prison_id));
        }

        let response = self
            .client
            .get(self.config.url("/api/bookings/v2"))
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;

        let page: BookingPage = match parse_response(response, "Booking", offender_no.as_str()).await {
            Ok(page) => page,
            // The search endpoint answers 404 for "no match" on some versions.
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };

        let bookings: Vec<PrisonerBooking> = page.content.into_iter().filter_map(to_booking).collect();
        tracing::debug!(offender_no = %offender_no, count = bookings.len(), "Fetched bookings");
        Ok(bookings)
    }
}
