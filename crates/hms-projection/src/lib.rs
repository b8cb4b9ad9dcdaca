//! hms-projection
//!
//! The read side: pending worklists, grouped medication orders, the ED
//! queue and dashboard aggregates. Everything here reads current entity
//! snapshots and returns owned view records — no mutation, and never an
//! authority for a transition decision (all writes go through
//! `hms-lifecycle`).
//!
//! Outputs are deterministically ordered: explicit sort keys everywhere,
//! id as the final tie-break.

mod dashboard;
mod emergency;
mod grouping;
mod pending;

pub use dashboard::{dashboard_summary, DashboardSummary};
pub use emergency::{emergency_queue, priority_score, EmergencyQueueEntry};
pub use grouping::{grouped_medication_orders, GroupedMedicationOrders};
pub use pending::{pending_bookings, pending_medication_orders, pending_verification_lab_orders};
