//! hms-lifecycle
//!
//! The lifecycle engine: every state-changing operation in the system goes
//! through here. An operation validates, in order — existence, registry
//! edge, actor role, required payload fields, optimistic version, and any
//! cross-entity guard — and only then writes, so a failed request never
//! mutates stored state. Each committed transition yields exactly one
//! domain event (creations yield one with no source status).
//!
//! The engine is synchronous and takes `&mut HospitalState`: the daemon
//! serializes commits behind a single writer lock, which is what makes the
//! check-then-commit sequence serializable-equivalent for the cross-entity
//! guards.

mod engine;
mod error;
pub mod ops;

pub use engine::Committed;
pub use error::TransitionError;

pub use ops::ancillary::{
    diagnostic_transition, imaging_transition, order_diagnostic, order_imaging,
    NewDiagnosticOrder, NewImagingOrder,
};
pub use ops::booking::{
    cancel_booking, complete_booking, confirm_booking, create_booking, mark_no_show,
    BookingConfirmation, NewBooking,
};
pub use ops::emergency::{
    assign_staff, emergency_arrival, retriage, EmergencyArrival, NewEmergency, Retriage,
};
pub use ops::encounter::{
    begin_consultation, cancel_encounter, check_in, create_walk_in, discharge, NewWalkIn,
};
pub use ops::invoice::{cancel_invoice, generate_invoice, record_payment, GenerateInvoice};
pub use ops::lab::{
    collect_specimen, complete_result, order_lab_test, receive_specimen, reject_specimen,
    start_processing, verify_result, NewLabOrder,
};
pub use ops::medication::{
    activate_order, complete_order, discontinue_order, hold_order, place_order_group,
    resume_order, NewMedicationOrder, NewOrderGroup, PlacedOrderGroup,
};
pub use ops::prescription::{
    cancel_prescription, dispense_prescription, issue_prescription, NewPrescription,
};
pub use ops::stay::{
    admit, discharge_stay, file_discharge_plan, transfer_stay, NewStay,
};
