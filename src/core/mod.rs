//! Core business logic - framework-agnostic operations for the business and
//! hospital domains.
//!
//! Every operation takes the injected [`Store`](crate::store::Store) and returns
//! structured data for the screens to render.

/// Attendance sheets and monthly attendance records
pub mod attendance;
/// Slot booking and appointment creation
pub mod booking;
/// Calendar arithmetic: periods and working days
pub mod calendar;
/// Company registration, listing and search
pub mod company;
/// Company dashboard aggregates
pub mod dashboard;
/// Doctor registration and slot management
pub mod doctor;
/// Employee records
pub mod employee;
/// Hospital registration and directory
pub mod hospital;
/// Local storage of company logos
pub mod media;
/// Payroll calculation and payment status
pub mod payroll;
/// Per-month employee performance summaries
pub mod performance;
/// Patient directory built from appointments
pub mod patient;
/// PIN gates in front of dashboards
pub mod pin;
/// Company revenue entries
pub mod revenue;
/// Shared input validation
pub mod validation;

/// Generates an opaque document ID.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
