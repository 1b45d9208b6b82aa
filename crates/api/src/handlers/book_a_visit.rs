//! Handlers for the visit booking wizard.
//!
//! Every stage runs the same way: load the session named by the
//! `x-booking-session` header, check the stage's prerequisites (redirecting
//! with 303 when they are missing), then either describe the stage (GET) or
//! validate the submitted form, call the visit scheduler where the stage
//! needs it, record the result and redirect to the next stage (POST).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookvisit_core::booking_wizard::{
    self, check_session, BookingStage, PrisonerProfile, SessionCheck, StageUpdate, WizardState,
};
use bookvisit_core::reservation::{
    Reservation, ReservationAction, ReservationContact, ReservationRequest,
};
use bookvisit_core::session::{
    ClosedVisitReason, SessionMainContact, VisitRestriction, VisitSessionData,
};
use bookvisit_core::slots::{SlotFilter, SlotListing, SlotQuery, TimeOfDay, VisitSlot};
use bookvisit_core::support::{VisitorSupport, ALL_SUPPORT_TYPES};
use bookvisit_core::validation::selection::{
    validate_additional_support, validate_main_contact, validate_slot_selection,
    validate_visitor_selection, AdditionalSupportForm, MainContactForm, SlotSelectionForm,
    VisitorSelectionForm, MAX_ADULTS, MAX_VISITORS, MSG_INVALID_SELECTION,
    MSG_INVALID_SUPPORT_REQUEST, SOMEONE_ELSE,
};
use bookvisit_core::validation::FieldViolation;
use bookvisit_core::visitor::VisitorListItem;

use crate::error::{AppError, AppResult};
use crate::handlers::{redirect_location, stage_location, SEARCH_PATH};
use crate::middleware::auth::AuthUser;
use crate::middleware::booking_session::SessionId;
use crate::response::{see_other, DataResponse};
use crate::session_store::BookingSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the caller's session, or send them back to the search page.
async fn load_session(state: &AppState, id: Option<Uuid>) -> AppResult<(Uuid, BookingSession)> {
    let loaded = match id {
        Some(id) => state.sessions.load(id).await.map(|s| (id, s)),
        None => None,
    };
    loaded.ok_or_else(|| AppError::Redirect(SEARCH_PATH.to_string()))
}

/// Run the stage guard, turning a redirect outcome into [`AppError::Redirect`].
fn guard(stage: BookingStage, data: &VisitSessionData) -> AppResult<WizardState<'_>> {
    match check_session(stage, Some(data)) {
        SessionCheck::Proceed(wizard) => Ok(wizard),
        SessionCheck::Redirect(target) => {
            tracing::debug!(stage = stage.label(), ?target, "Stage prerequisites missing");
            Err(AppError::Redirect(redirect_location(&target)))
        }
    }
}

/// Turn validation failures into a rejection, logging inputs that could
/// only come from a tampered form.
fn reject<F: Serialize>(stage: BookingStage, errors: Vec<FieldViolation>, form: &F) -> AppError {
    let tampered = errors
        .iter()
        .any(|e| e.message == MSG_INVALID_SELECTION || e.message == MSG_INVALID_SUPPORT_REQUEST);
    if tampered {
        tracing::warn!(stage = stage.label(), "Rejected selection not offered on the page");
    } else {
        tracing::debug!(stage = stage.label(), violations = errors.len(), "Stage form rejected");
    }
    AppError::rejected(errors, form)
}

/// Create the session's reservation, or change the one it already holds.
async fn reserve_or_change(
    state: &AppState,
    action: ReservationAction,
    request: &ReservationRequest,
    username: &str,
) -> AppResult<Reservation> {
    match action {
        ReservationAction::Create => {
            let reservation = state.scheduler.reserve_visit(request, username).await?;
            tracing::info!(
                reference = %reservation.reference,
                offender_no = %request.offender_no,
                "Visit slot reserved"
            );
            Ok(reservation)
        }
        ReservationAction::Update { reference } => {
            let reservation = state
                .scheduler
                .change_reservation(&reference, request, username)
                .await?;
            tracing::info!(reference = %reservation.reference, "Reservation changed");
            Ok(reservation)
        }
    }
}

/// A body that does not parse as the stage's form counts as an empty
/// submission, so it is validated and rejected like any other. Call only
/// after the stage guard has passed.
fn submitted_form<F: Default>(stage: BookingStage, body: Result<Json<F>, JsonRejection>) -> F {
    match body {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::warn!(
                stage = stage.label(),
                error = %rejection.body_text(),
                "Unreadable stage form"
            );
            F::default()
        }
    }
}

fn parse_days(raw: Option<&str>) -> AppResult<Vec<Weekday>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| {
            d.parse::<Weekday>()
                .map_err(|_| AppError::BadRequest(format!("Invalid day '{d}'")))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Page payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct VisitorsPage<'a> {
    pub stage: BookingStage,
    pub prisoner: &'a PrisonerProfile,
    pub visitor_list: Vec<VisitorListItem>,
    pub max_visitors: usize,
    pub max_adults: usize,
}

#[derive(Debug, Serialize)]
pub struct DateTimePage<'a> {
    pub stage: BookingStage,
    pub prisoner: &'a PrisonerProfile,
    pub visit_restriction: VisitRestriction,
    pub closed_visit_reason: Option<ClosedVisitReason>,
    pub slots: SlotListing,
    pub selected_slot: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct SupportOption {
    pub code: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AdditionalSupportPage<'a> {
    pub stage: BookingStage,
    pub prisoner: &'a PrisonerProfile,
    pub options: Vec<SupportOption>,
    pub visitor_support: Option<&'a [VisitorSupport]>,
}

#[derive(Debug, Serialize)]
pub struct MainContactPage<'a> {
    pub stage: BookingStage,
    pub prisoner: &'a PrisonerProfile,
    pub visitors: &'a [VisitorListItem],
    pub someone_else: &'static str,
    pub main_contact: Option<&'a SessionMainContact>,
}

#[derive(Debug, Serialize)]
pub struct MainContactSummary<'a> {
    pub name: &'a str,
    pub phone_number: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CheckAnswersPage<'a> {
    pub stage: BookingStage,
    pub prisoner: &'a PrisonerProfile,
    pub visit_restriction: VisitRestriction,
    pub visit: &'a VisitSlot,
    pub visitors: &'a [VisitorListItem],
    pub visitor_support: &'a [VisitorSupport],
    pub main_contact: MainContactSummary<'a>,
    pub reference: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// GET/POST /book-a-visit/select-visitors
// ---------------------------------------------------------------------------

/// The prisoner's visitors, with any earlier choice marked as selected.
pub async fn show_visitors(
    State(state): State<AppState>,
    _auth: AuthUser,
    SessionId(id): SessionId,
) -> AppResult<Response> {
    let (_, session) = load_session(&state, id).await?;
    let wizard = guard(BookingStage::ChooseVisitors, &session.data)?;

    let chosen = wizard.visitors();
    let visitor_list = session
        .visitor_list
        .iter()
        .cloned()
        .map(|mut v| {
            v.selected = chosen.iter().any(|c| c.person_id == v.person_id);
            v
        })
        .collect();

    Ok(Json(DataResponse {
        data: VisitorsPage {
            stage: BookingStage::ChooseVisitors,
            prisoner: wizard.prisoner(),
            visitor_list,
            max_visitors: MAX_VISITORS,
            max_adults: MAX_ADULTS,
        },
    })
    .into_response())
}

pub async fn select_visitors(
    State(state): State<AppState>,
    _auth: AuthUser,
    SessionId(id): SessionId,
    body: Result<Json<VisitorSelectionForm>, JsonRejection>,
) -> AppResult<Response> {
    let stage = BookingStage::ChooseVisitors;
    let (session_id, mut session) = load_session(&state, id).await?;
    guard(stage, &session.data)?;
    let form = submitted_form(stage, body);

    let selection = validate_visitor_selection(&form, &session.visitor_list)
        .map_err(|errors| reject(stage, errors, &form))?;

    tracing::info!(
        session_id = %session_id,
        visitors = selection.visitors.len(),
        restriction = selection.visit_restriction.as_str(),
        "Visitors selected"
    );

    let next = booking_wizard::apply(&mut session.data, StageUpdate::Visitors(selection));
    state.sessions.save(session_id, session).await;

    Ok(see_other(&stage_location(next), Some(session_id)))
}

// ---------------------------------------------------------------------------
// GET/POST /book-a-visit/select-date-and-time
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SlotFilterParams {
    /// Comma-separated weekdays, e.g. `mon,wed`.
    pub days: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
}

/// Bookable slots for the selected visitors. The flattened listing is kept
/// in the session as the only slots a later choice may name.
pub async fn show_date_and_time(
    State(state): State<AppState>,
    auth: AuthUser,
    SessionId(id): SessionId,
    Query(params): Query<SlotFilterParams>,
) -> AppResult<Response> {
    let (session_id, mut session) = load_session(&state, id).await?;
    let filter = SlotFilter {
        days: parse_days(params.days.as_deref())?,
        time_of_day: params.time_of_day,
    };

    let wizard = guard(BookingStage::ChooseDateTime, &session.data)?;
    let (visit_restriction, closed_visit_reason) = booking_wizard::visit_restriction(&session.data);
    let query = SlotQuery {
        username: auth.username.clone(),
        prison_id: auth.caseload.clone(),
        offender_no: wizard.prisoner().offender_no.clone(),
        visit_restriction,
        min_days_ahead: state.config.booking.min_advance_booking_days,
        max_days_ahead: state.config.booking.max_advance_booking_days,
        filter,
    };
    let prisoner = wizard.prisoner().clone();
    let selected_slot = wizard.visit().map(|v| v.id.clone());

    let slots = state.scheduler.visit_slots(&query).await?;
    session.slot_listing = slots.flatten();
    state.sessions.save(session_id, session).await;

    Ok(Json(DataResponse {
        data: DateTimePage {
            stage: BookingStage::ChooseDateTime,
            prisoner: &prisoner,
            visit_restriction,
            closed_visit_reason,
            slots,
            selected_slot: selected_slot.as_deref(),
        },
    })
    .into_response())
}

/// Accept a slot from the last listing and reserve it, or move the
/// existing reservation to it.
pub async fn select_date_and_time(
    State(state): State<AppState>,
    auth: AuthUser,
    SessionId(id): SessionId,
    body: Result<Json<SlotSelectionForm>, JsonRejection>,
) -> AppResult<Response> {
    let stage = BookingStage::ChooseDateTime;
    let (session_id, mut session) = load_session(&state, id).await?;
    let wizard = guard(stage, &session.data)?;
    let form = submitted_form(stage, body);

    let slot = validate_slot_selection(&form, &session.slot_listing)
        .map_err(|errors| reject(stage, errors, &form))?;

    let request =
        ReservationRequest::from_state(&auth.caseload, &wizard, &session.data, slot.clone());
    let action = ReservationAction::for_session(&session.data);
    let reservation = reserve_or_change(&state, action, &request, &auth.username).await?;

    booking_wizard::apply(&mut session.data, StageUpdate::DateTime(slot));
    let next = booking_wizard::apply(&mut session.data, StageUpdate::Reserved(reservation));
    state.sessions.save(session_id, session).await;

    Ok(see_other(&stage_location(next), Some(session_id)))
}

// ---------------------------------------------------------------------------
// GET/POST /book-a-visit/additional-support
// ---------------------------------------------------------------------------

pub async fn show_additional_support(
    State(state): State<AppState>,
    _auth: AuthUser,
    SessionId(id): SessionId,
) -> AppResult<Response> {
    let (_, session) = load_session(&state, id).await?;
    let wizard = guard(BookingStage::ChooseAdditionalSupport, &session.data)?;

    Ok(Json(DataResponse {
        data: AdditionalSupportPage {
            stage: BookingStage::ChooseAdditionalSupport,
            prisoner: wizard.prisoner(),
            options: ALL_SUPPORT_TYPES
                .iter()
                .map(|t| SupportOption {
                    code: t.code(),
                    label: t.label(),
                })
                .collect(),
            visitor_support: session.data.visitor_support.as_deref(),
        },
    })
    .into_response())
}

pub async fn select_additional_support(
    State(state): State<AppState>,
    _auth: AuthUser,
    SessionId(id): SessionId,
    body: Result<Json<AdditionalSupportForm>, JsonRejection>,
) -> AppResult<Response> {
    let stage = BookingStage::ChooseAdditionalSupport;
    let (session_id, mut session) = load_session(&state, id).await?;
    guard(stage, &session.data)?;
    let form = submitted_form(stage, body);

    let support =
        validate_additional_support(&form).map_err(|errors| reject(stage, errors, &form))?;

    tracing::info!(session_id = %session_id, requests = support.len(), "Additional support recorded");

    let next = booking_wizard::apply(&mut session.data, StageUpdate::AdditionalSupport(support));
    state.sessions.save(session_id, session).await;

    Ok(see_other(&stage_location(next), Some(session_id)))
}

// ---------------------------------------------------------------------------
// GET/POST /book-a-visit/select-main-contact
// ---------------------------------------------------------------------------

pub async fn show_main_contact(
    State(state): State<AppState>,
    _auth: AuthUser,
    SessionId(id): SessionId,
) -> AppResult<Response> {
    let (_, session) = load_session(&state, id).await?;
    let wizard = guard(BookingStage::ChooseMainContact, &session.data)?;

    Ok(Json(DataResponse {
        data: MainContactPage {
            stage: BookingStage::ChooseMainContact,
            prisoner: wizard.prisoner(),
            visitors: wizard.visitors(),
            someone_else: SOMEONE_ELSE,
            main_contact: session.data.main_contact.as_ref(),
        },
    })
    .into_response())
}

/// Record the main contact and update the reservation with the visitors,
/// support requests and contact details.
pub async fn select_main_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    SessionId(id): SessionId,
    body: Result<Json<MainContactForm>, JsonRejection>,
) -> AppResult<Response> {
    let stage = BookingStage::ChooseMainContact;
    let (session_id, mut session) = load_session(&state, id).await?;
    let wizard = guard(stage, &session.data)?;
    let form = submitted_form(stage, body);

    let main_contact = validate_main_contact(&form, wizard.visitors())
        .map_err(|errors| reject(stage, errors, &form))?;

    let slot = wizard
        .visit()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Guarded session has no visit".into()))?;
    let mut request = ReservationRequest::from_state(&auth.caseload, &wizard, &session.data, slot);
    request.main_contact = Some(ReservationContact::from(&main_contact));

    let action = ReservationAction::for_session(&session.data);
    let reservation = reserve_or_change(&state, action, &request, &auth.username).await?;

    tracing::info!(session_id = %session_id, "Main contact recorded");

    booking_wizard::apply(&mut session.data, StageUpdate::Reserved(reservation));
    let next = booking_wizard::apply(&mut session.data, StageUpdate::MainContact(main_contact));
    state.sessions.save(session_id, session).await;

    Ok(see_other(&stage_location(next), Some(session_id)))
}

// ---------------------------------------------------------------------------
// GET/POST /book-a-visit/check-your-answers
// ---------------------------------------------------------------------------

pub async fn show_check_your_answers(
    State(state): State<AppState>,
    _auth: AuthUser,
    SessionId(id): SessionId,
) -> AppResult<Response> {
    let (_, session) = load_session(&state, id).await?;
    let wizard = guard(BookingStage::CheckYourAnswers, &session.data)?;

    let (Some(visit), Some(main_contact)) = (wizard.visit(), wizard.main_contact()) else {
        return Err(AppError::InternalError("Guarded session is incomplete".into()));
    };

    Ok(Json(DataResponse {
        data: CheckAnswersPage {
            stage: BookingStage::CheckYourAnswers,
            prisoner: wizard.prisoner(),
            visit_restriction: booking_wizard::visit_restriction(&session.data).0,
            visit,
            visitors: wizard.visitors(),
            visitor_support: session.data.visitor_support.as_deref().unwrap_or_default(),
            main_contact: MainContactSummary {
                name: main_contact.display_name(),
                phone_number: &main_contact.phone_number,
            },
            reference: session.data.visit_reference.as_deref(),
        },
    })
    .into_response())
}

/// Book the visit exactly as confirmed and end the session.
///
/// The reservation is brought up to date with the session first, since
/// earlier stages may have been revisited after it was last changed.
pub async fn book_visit(
    State(state): State<AppState>,
    auth: AuthUser,
    SessionId(id): SessionId,
) -> AppResult<Response> {
    let (session_id, session) = load_session(&state, id).await?;
    let wizard = guard(BookingStage::CheckYourAnswers, &session.data)?;

    let slot = wizard
        .visit()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Guarded session has no visit".into()))?;
    let request = ReservationRequest::from_state(&auth.caseload, &wizard, &session.data, slot);
    let action = ReservationAction::for_session(&session.data);
    let reference = reserve_or_change(&state, action, &request, &auth.username)
        .await?
        .reference;

    let booked = state.scheduler.book_visit(&reference, &auth.username).await?;
    state.sessions.remove(session_id).await;

    tracing::info!(
        session_id = %session_id,
        reference = %booked.reference,
        status = %booked.status,
        offender_no = %wizard.prisoner().offender_no,
        "Visit booked"
    );

    Ok(Json(DataResponse { data: booked }).into_response())
}
