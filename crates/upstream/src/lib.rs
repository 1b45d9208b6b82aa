//! HTTP clients for the upstream services behind the booking flow.
//!
//! Each client implements one of the collaborator traits from
//! `bookvisit_core::collaborators` and maps its service's wire format into
//! the canonical core types. Nothing outside this crate sees the wire
//! shapes.

pub mod contact_registry;
pub mod http;
pub mod prison_api;
pub mod visit_scheduler;

pub use contact_registry::ContactRegistryClient;
pub use http::UpstreamConfig;
pub use prison_api::PrisonApiClient;
pub use visit_scheduler::VisitSchedulerClient;
