//! hms-consistency
//!
//! Cross-entity consistency coordinator: guard checks whose preconditions
//! span more than one entity, plus capability-flag recomputation.
//!
//! All functions here are pure deterministic reads over the current state
//! snapshot — no IO, no clock, no mutation. The lifecycle engine calls
//! them inside the same critical section that commits the transition, so
//! a guard decision cannot be invalidated between check and commit.
//!
//! The specimen-workflow guard (no Ordered→Received shortcut, rejection
//! only pre-completion, rejection reason mandatory) is enforced
//! structurally by the registry's lab transition table and therefore has
//! no separate check surface here.

mod capabilities;
mod guards;

pub use capabilities::encounter_capabilities;
pub use guards::{
    check_encounter_discharge, check_invoice_generation, check_stay_discharge, GuardBreach,
    GuardVerdict,
};
