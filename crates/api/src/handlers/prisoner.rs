//! Handlers for prisoner search, the prisoner profile and starting a booking.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use bookvisit_core::booking_wizard::BookingStage;
use bookvisit_core::identifiers::OffenderNo;
use bookvisit_core::session::VisitSessionData;

use crate::error::AppResult;
use crate::handlers::{profile_location, stage_location};
use crate::middleware::auth::AuthUser;
use crate::middleware::booking_session::SessionId;
use crate::response::{see_other, DataResponse};
use crate::session_store::BookingSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub offender_no: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchPrompt {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// GET /search/prisoner
// ---------------------------------------------------------------------------

/// Look up a prisoner by offender number.
///
/// With no number this returns the search prompt; with a well-formed one it
/// redirects to the prisoner's profile.
pub async fn search(
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let Some(raw) = params.offender_no.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Json(DataResponse {
            data: SearchPrompt {
                message: "Enter a prisoner number",
            },
        })
        .into_response());
    };

    let offender_no = OffenderNo::parse(&raw.to_uppercase())?;
    Ok(see_other(&profile_location(&offender_no), None))
}

// ---------------------------------------------------------------------------
// GET /prisoner/{offender_no}
// ---------------------------------------------------------------------------

/// Prisoner details and approved visitors.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(offender_no): Path<String>,
) -> AppResult<impl IntoResponse> {
    let offender_no = OffenderNo::parse(&offender_no)?;

    let visitors = state
        .eligibility
        .get_visitors(&offender_no, Some(&auth.caseload), &auth.username)
        .await?;

    tracing::debug!(
        offender_no = %offender_no,
        visitors = visitors.visitor_list.len(),
        "Prisoner profile loaded"
    );

    Ok(Json(DataResponse { data: visitors }))
}

// ---------------------------------------------------------------------------
// POST /prisoner/{offender_no}/book-a-visit
// ---------------------------------------------------------------------------

/// Start a new booking for the prisoner, replacing any session the caller
/// was holding.
pub async fn start_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    SessionId(previous): SessionId,
    Path(offender_no): Path<String>,
) -> AppResult<Response> {
    let offender_no = OffenderNo::parse(&offender_no)?;

    let visitors = state
        .eligibility
        .get_visitors(&offender_no, Some(&auth.caseload), &auth.username)
        .await?;

    if let Some(previous) = previous {
        state.sessions.remove(previous).await;
    }

    let data = VisitSessionData::for_prisoner(visitors.prisoner.into());
    let session_id = state
        .sessions
        .create(BookingSession::new(data, visitors.visitor_list))
        .await;

    tracing::info!(
        session_id = %session_id,
        offender_no = %offender_no,
        username = %auth.username,
        "Booking session started"
    );

    Ok(see_other(&stage_location(BookingStage::ChooseVisitors), Some(session_id)))
}
