#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookvisit_api::auth::jwt::{generate_access_token, JwtConfig};
use bookvisit_api::config::{BookingSettings, ServerConfig, UpstreamSettings};
use bookvisit_api::middleware::booking_session::SESSION_HEADER;
use bookvisit_api::router::build_app_router;
use bookvisit_api::state::AppState;
use bookvisit_core::address::Address;
use bookvisit_core::collaborators::{
    BookingRecords, ContactRegistry, PrisonerBooking, VisitScheduler,
};
use bookvisit_core::error::UpstreamError;
use bookvisit_core::identifiers::OffenderNo;
use bookvisit_core::reservation::{
    Reservation, ReservationRequest, STATUS_BOOKED, STATUS_RESERVED,
};
use bookvisit_core::restrictions::{Restriction, RestrictionType};
use bookvisit_core::slots::{group_slots, SlotListing, SlotQuery, VisitSlot};
use bookvisit_core::visitor::{Contact, ContactAddress};

pub const OFFENDER_NO: &str = "A1234BC";
pub const UNKNOWN_OFFENDER_NO: &str = "Z9999ZZ";
pub const PRISON_ID: &str = "HEI";
pub const REFERENCE: &str = "ab-cd-ef-gh";

/// Adult, no restrictions.
pub const ADULT_ID: i64 = 4321;
/// Child.
pub const CHILD_ID: i64 = 4324;
/// Adult, not an approved visitor.
pub const UNAPPROVED_ID: i64 = 4325;
/// Adult with a CLOSED restriction.
pub const CLOSED_ID: i64 = 4326;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        upstream: UpstreamSettings {
            prison_api_url: "http://localhost:8081".to_string(),
            contact_registry_url: "http://localhost:8082".to_string(),
            visit_scheduler_url: "http://localhost:8083".to_string(),
            timeout_secs: 10,
        },
        booking: BookingSettings {
            min_advance_booking_days: 2,
            max_advance_booking_days: 28,
            session_ttl_mins: 120,
        },
    }
}

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

pub struct FakeBookings;

#[async_trait]
impl BookingRecords for FakeBookings {
    async fn find_bookings(
        &self,
        offender_no: &OffenderNo,
        _prison_id: Option<&str>,
        _username: &str,
    ) -> Result<Vec<PrisonerBooking>, UpstreamError> {
        if offender_no.as_str() != OFFENDER_NO {
            return Ok(Vec::new());
        }
        Ok(vec![PrisonerBooking {
            booking_id: 12345,
            offender_no: offender_no.clone(),
            first_name: "JOHN".into(),
            last_name: "SMITH".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 4, 2).unwrap(),
            prison_id: PRISON_ID.into(),
            location: Some("1-1-C-028".into()),
            prison_name: Some("Hewell (HMP)".into()),
        }])
    }
}

fn contact(person_id: i64, first_name: &str, born: (i32, u32, u32), approved: bool) -> Contact {
    Contact {
        person_id,
        first_name: first_name.into(),
        middle_name: None,
        last_name: "Smith".into(),
        date_of_birth: NaiveDate::from_ymd_opt(born.0, born.1, born.2),
        relationship_description: "Wife".into(),
        approved_visitor: approved,
        restrictions: Vec::new(),
        addresses: vec![ContactAddress {
            address: Address {
                street: Some("123 The Street".into()),
                town: Some("Coventry".into()),
                ..Default::default()
            },
            primary: true,
        }],
    }
}

pub struct FakeContacts;

#[async_trait]
impl ContactRegistry for FakeContacts {
    async fn social_contacts(
        &self,
        _offender_no: &OffenderNo,
        _username: &str,
    ) -> Result<Vec<Contact>, UpstreamError> {
        let mut closed = contact(CLOSED_ID, "Anne", (1980, 1, 1), true);
        closed.restrictions.push(Restriction {
            restriction_type: RestrictionType::Closed,
            description: "Closed".into(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            expiry_date: None,
            comment: None,
            global_restriction: false,
        });

        Ok(vec![
            contact(ADULT_ID, "Jeanette", (1986, 7, 28), true),
            contact(UNAPPROVED_ID, "Bob", (1970, 5, 5), false),
            contact(CHILD_ID, "Anne", (2018, 3, 2), true),
            closed,
        ])
    }
}

fn slot(id: &str, day: u32, hour: u32, available_tables: u32) -> VisitSlot {
    let start = NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap();
    VisitSlot {
        id: id.to_string(),
        start_timestamp: start,
        end_timestamp: start + chrono::Duration::hours(1),
        available_tables,
        room: "Visits Main Hall".to_string(),
    }
}

/// Records every scheduler call as a short string, in order, along with
/// each reservation request sent.
#[derive(Default)]
pub struct FakeScheduler {
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<ReservationRequest>>,
}

impl FakeScheduler {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent reserve or change request.
    pub fn last_request(&self) -> Option<ReservationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn record_request(&self, request: &ReservationRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VisitScheduler for FakeScheduler {
    async fn visit_slots(&self, query: &SlotQuery) -> Result<SlotListing, UpstreamError> {
        self.record(format!("slots:{}", query.visit_restriction.as_str()));
        let slots = vec![slot("1", 3, 10, 2), slot("2", 3, 14, 0), slot("3", 4, 9, 1)];
        Ok(group_slots(slots, &query.filter))
    }

    async fn reserve_visit(
        &self,
        request: &ReservationRequest,
        _username: &str,
    ) -> Result<Reservation, UpstreamError> {
        self.record(format!("reserve:{}", request.slot.id));
        self.record_request(request);
        Ok(Reservation {
            reference: REFERENCE.into(),
            status: STATUS_RESERVED.into(),
        })
    }

    async fn change_reservation(
        &self,
        reference: &str,
        request: &ReservationRequest,
        _username: &str,
    ) -> Result<Reservation, UpstreamError> {
        let contact = if request.main_contact.is_some() { "+contact" } else { "" };
        self.record(format!("change:{reference}:{}{contact}", request.slot.id));
        self.record_request(request);
        Ok(Reservation {
            reference: reference.into(),
            status: STATUS_RESERVED.into(),
        })
    }

    async fn book_visit(&self, reference: &str, _username: &str) -> Result<Reservation, UpstreamError> {
        self.record(format!("book:{reference}"));
        Ok(Reservation {
            reference: reference.into(),
            status: STATUS_BOOKED.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// App and request helpers
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub scheduler: Arc<FakeScheduler>,
    token: String,
}

/// Build the full application router over the fake collaborators, using
/// the same middleware stack as production.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let scheduler = Arc::new(FakeScheduler::default());
    let token = generate_access_token("caseworker", PRISON_ID, &config.jwt).unwrap();

    let state = AppState::new(
        config.clone(),
        Arc::new(FakeBookings),
        Arc::new(FakeContacts),
        scheduler.clone(),
    );

    TestApp {
        router: build_app_router(state, &config),
        scheduler,
        token,
    }
}

impl TestApp {
    /// Send an authenticated request.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        self.send(Method::GET, uri, session, None).await
    }

    pub async fn post(&self, uri: &str, session: Option<&str>, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, session, Some(body)).await
    }

    /// Start a booking for the default prisoner and return the session id.
    pub async fn start_booking(&self) -> String {
        let response = self
            .send(
                Method::POST,
                &format!("/api/v1/prisoner/{OFFENDER_NO}/book-a-visit"),
                None,
                None,
            )
            .await;
        session_id(&response)
    }
}

/// Send a request with no credentials.
pub async fn get_anonymous(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
}

pub fn session_id(response: &Response<Body>) -> String {
    response
        .headers()
        .get(SESSION_HEADER)
        .expect("response should carry the booking session header")
        .to_str()
        .unwrap()
        .to_string()
}
