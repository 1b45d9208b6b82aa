use std::sync::Arc;

use bookvisit_core::collaborators::{BookingRecords, ContactRegistry, VisitScheduler};
use bookvisit_core::eligibility::VisitorEligibilityService;

use crate::config::ServerConfig;
use crate::session_store::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Booking sessions in progress.
    pub sessions: Arc<SessionStore>,
    /// Visitor list derivation over the booking and contact services.
    pub eligibility: Arc<VisitorEligibilityService>,
    /// Slot listing and reservations.
    pub scheduler: Arc<dyn VisitScheduler>,
}

impl AppState {
    /// Wire the state from configuration and the three upstream collaborators.
    pub fn new(
        config: ServerConfig,
        bookings: Arc<dyn BookingRecords>,
        contacts: Arc<dyn ContactRegistry>,
        scheduler: Arc<dyn VisitScheduler>,
    ) -> Self {
        let eligibility = VisitorEligibilityService::new(
            bookings,
            contacts,
            config.booking.max_advance_booking_days,
        );
        let sessions = SessionStore::new(config.booking.session_ttl());

        Self {
            config: Arc::new(config),
            sessions: Arc::new(sessions),
            eligibility: Arc::new(eligibility),
            scheduler,
        }
    }
}
