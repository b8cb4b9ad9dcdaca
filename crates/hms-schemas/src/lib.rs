//! hms-schemas
//!
//! Shared data model for the lifecycle engine: entity records, status
//! enums, the actor/role model, transition payloads, capability flags and
//! the domain-event envelope.
//!
//! This crate is DTOs only — no business logic. Transition legality lives
//! in `hms-registry`; guards live in `hms-consistency`.
//!
//! Display labels are presentation strings and are deliberately kept out
//! of the domain types; see the [`display`] module.

mod actor;
mod entities;
mod event;
mod payload;
mod status;

pub mod display;

pub use actor::{Actor, Role};
pub use entities::{
    Booking, BookingSource, DiagnosticOrder, DischargePlan, EmergencyDetails, Encounter,
    EncounterType, ImagingOrder, InpatientStay, Invoice, InvoiceLineItem, LabTestOrder, LineItemKind,
    MedicationOrder, MedicationOrderGroup, Prescription, PrescriptionLine, UrgencyLevel,
};
pub use event::DomainEvent;
pub use payload::{Disposition, FieldName, TransitionPayload};
pub use status::{
    BookingStatus, DiagnosticOrderStatus, EncounterStatus, EntityKind, ImagingOrderStatus,
    InpatientStayStatus, InvoiceStatus, LabTestOrderStatus, MedicationOrderStatus,
    PrescriptionStatus, TriageCategory,
};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Capability flags
// ---------------------------------------------------------------------------

/// Derived booleans returned with every encounter snapshot so the caller
/// never has to re-derive transition legality locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFlags {
    pub can_check_in: bool,
    pub can_discharge: bool,
    pub can_cancel: bool,
}

/// An encounter plus its recomputed capability flags. This is the shape
/// every mutating encounter endpoint returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub encounter: Encounter,
    pub capabilities: CapabilityFlags,
}
