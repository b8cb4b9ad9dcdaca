//! hms-store
//!
//! In-memory entity store. One [`HospitalState`] value holds every durable
//! record; the daemon serializes access behind a single writer lock, so a
//! `&mut HospitalState` is a transaction — either the whole set of writes
//! a transition performs lands, or (on any validation error) nothing was
//! touched.
//!
//! Collections are `BTreeMap` keyed by id so every iteration order is
//! deterministic. Records are never removed; terminal statuses are the
//! archival mechanism.

use std::collections::BTreeMap;

use uuid::Uuid;

use hms_schemas::{
    Booking, DiagnosticOrder, EmergencyDetails, Encounter, ImagingOrder, InpatientStay, Invoice,
    InvoiceStatus, LabTestOrder, MedicationOrder, MedicationOrderGroup, Prescription,
};

// ---------------------------------------------------------------------------
// HospitalState
// ---------------------------------------------------------------------------

/// Every durable record in the system.
#[derive(Debug, Clone, Default)]
pub struct HospitalState {
    pub bookings: BTreeMap<Uuid, Booking>,
    pub encounters: BTreeMap<Uuid, Encounter>,
    /// Emergency extensions, keyed by encounter id (1:1).
    pub emergency: BTreeMap<Uuid, EmergencyDetails>,
    pub med_order_groups: BTreeMap<Uuid, MedicationOrderGroup>,
    pub med_orders: BTreeMap<Uuid, MedicationOrder>,
    pub stays: BTreeMap<Uuid, InpatientStay>,
    pub invoices: BTreeMap<Uuid, Invoice>,
    pub lab_orders: BTreeMap<Uuid, LabTestOrder>,
    pub diagnostic_orders: BTreeMap<Uuid, DiagnosticOrder>,
    pub imaging_orders: BTreeMap<Uuid, ImagingOrder>,
    pub prescriptions: BTreeMap<Uuid, Prescription>,
}

impl HospitalState {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Cross-entity lookups
    // -----------------------------------------------------------------------

    /// All medication orders linked to an encounter, via their groups.
    pub fn med_orders_for_encounter(&self, encounter_id: Uuid) -> Vec<&MedicationOrder> {
        let group_ids: Vec<Uuid> = self
            .med_order_groups
            .values()
            .filter(|g| g.encounter_id == encounter_id)
            .map(|g| g.id)
            .collect();
        self.med_orders
            .values()
            .filter(|o| group_ids.contains(&o.group_id))
            .collect()
    }

    /// All medication orders placed for an inpatient stay.
    pub fn med_orders_for_stay(&self, stay_id: Uuid) -> Vec<&MedicationOrder> {
        let group_ids: Vec<Uuid> = self
            .med_order_groups
            .values()
            .filter(|g| g.stay_id == Some(stay_id))
            .map(|g| g.id)
            .collect();
        self.med_orders
            .values()
            .filter(|o| group_ids.contains(&o.group_id))
            .collect()
    }

    /// The current non-cancelled invoice for an encounter, if any.
    /// The invoice-uniqueness invariant says there is at most one.
    pub fn open_invoice_for_encounter(&self, encounter_id: Uuid) -> Option<&Invoice> {
        self.invoices
            .values()
            .find(|i| i.encounter_id == encounter_id && i.status != InvoiceStatus::Cancelled)
    }

    /// The inpatient stay attached to an encounter, if one exists.
    pub fn stay_for_encounter(&self, encounter_id: Uuid) -> Option<&InpatientStay> {
        self.stays
            .values()
            .find(|s| s.encounter_id == encounter_id)
    }

}

// ---------------------------------------------------------------------------
// Optimistic versioning
// ---------------------------------------------------------------------------

/// Compare the version a caller read against the stored one.
///
/// `Err` carries (expected_by_caller, actual_stored) so the conflict can be
/// reported verbatim; the caller must refetch and retry — this is the
/// recoverable path, not a fault.
pub fn check_version(caller_read: u64, stored: u64) -> Result<(), (u64, u64)> {
    if caller_read == stored {
        Ok(())
    } else {
        Err((caller_read, stored))
    }
}
