//! Domain logic for booking prison visits on behalf of a prisoner.
//!
//! Everything in this crate is free of I/O. Upstream services are reached
//! through the traits in [`collaborators`], implemented by the
//! `bookvisit-upstream` crate and by in-memory fakes in tests.

pub mod address;
pub mod booking_wizard;
pub mod collaborators;
pub mod eligibility;
pub mod error;
pub mod identifiers;
pub mod naming;
pub mod reservation;
pub mod restrictions;
pub mod session;
pub mod slots;
pub mod support;
pub mod types;
pub mod validation;
pub mod visitor;
