//! hms-testkit
//!
//! Scenario fixtures for cross-crate tests: a seeded ward with named
//! actors and helpers that walk entities through their common early
//! lifecycle so scenario tests start at the interesting step.

use chrono::Utc;
use uuid::Uuid;

use hms_lifecycle::{
    activate_order, check_in, confirm_booking, create_booking, place_order_group, Committed,
    NewBooking, NewMedicationOrder, NewOrderGroup, TransitionError,
};
use hms_schemas::{
    Actor, Booking, BookingSource, DomainEvent, EncounterSnapshot, MedicationOrder, Role,
};
use hms_store::HospitalState;

/// A seeded world: one patient, one of each staff role, and the state all
/// operations run against.
pub struct ScenarioWard {
    pub state: HospitalState,
    pub patient_id: Uuid,
    pub department_id: Uuid,
    pub receptionist: Actor,
    pub doctor: Actor,
    pub nurse: Actor,
    pub pharmacist: Actor,
    pub lab_technician: Actor,
    pub cashier: Actor,
    /// Every event emitted through the helpers, in commit order.
    pub events: Vec<DomainEvent>,
}

impl Default for ScenarioWard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioWard {
    pub fn new() -> Self {
        Self {
            state: HospitalState::new(),
            patient_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            receptionist: Actor::new(Uuid::new_v4(), Role::Receptionist),
            doctor: Actor::new(Uuid::new_v4(), Role::Doctor),
            nurse: Actor::new(Uuid::new_v4(), Role::Nurse),
            pharmacist: Actor::new(Uuid::new_v4(), Role::Pharmacist),
            lab_technician: Actor::new(Uuid::new_v4(), Role::LabTechnician),
            cashier: Actor::new(Uuid::new_v4(), Role::Cashier),
            events: Vec::new(),
        }
    }

    fn record<T>(&mut self, committed: Committed<T>) -> T {
        self.events.extend(committed.events);
        committed.snapshot
    }

    /// A pending booking for the seeded patient.
    pub fn pending_booking(&mut self) -> Booking {
        let receptionist = self.receptionist;
        let req = NewBooking {
            patient_id: self.patient_id,
            doctor_id: self.doctor.actor_id,
            department_id: self.department_id,
            scheduled_at: Utc::now(),
            source: BookingSource::Online,
        };
        let committed = create_booking(&mut self.state, req, receptionist);
        self.record(committed)
    }

    /// Booking confirmed; returns the planned encounter.
    pub fn confirmed_encounter(&mut self) -> Result<EncounterSnapshot, TransitionError> {
        let booking = self.pending_booking();
        let receptionist = self.receptionist;
        let committed = confirm_booking(&mut self.state, booking.id, receptionist, booking.version)?;
        Ok(self.record(committed).encounter)
    }

    /// Booking confirmed and patient checked in; returns the arrived
    /// encounter.
    pub fn checked_in_encounter(&mut self) -> Result<EncounterSnapshot, TransitionError> {
        let planned = self.confirmed_encounter()?;
        let receptionist = self.receptionist;
        let committed = check_in(
            &mut self.state,
            planned.encounter.id,
            receptionist,
            planned.encounter.version,
        )?;
        Ok(self.record(committed))
    }

    /// One active medication order linked to the encounter.
    pub fn active_order(&mut self, encounter_id: Uuid) -> Result<MedicationOrder, TransitionError> {
        let doctor = self.doctor;
        let placed = place_order_group(
            &mut self.state,
            NewOrderGroup {
                encounter_id,
                stay_id: None,
                orders: vec![NewMedicationOrder {
                    drug_name: "enoxaparin".into(),
                    dose: "40 mg".into(),
                    route: "sc".into(),
                    frequency: "qd".into(),
                }],
            },
            doctor,
        )?;
        let order = self.record(placed).orders.remove(0);
        let pharmacist = self.pharmacist;
        let committed = activate_order(&mut self.state, order.id, pharmacist, order.version)?;
        Ok(self.record(committed))
    }
}
