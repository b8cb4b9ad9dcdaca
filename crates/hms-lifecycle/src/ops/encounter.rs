use chrono::Utc;
use uuid::Uuid;

use hms_consistency::{check_encounter_discharge, encounter_capabilities, GuardVerdict};
use hms_schemas::{
    Actor, BookingStatus, DomainEvent, Encounter, EncounterSnapshot, EncounterStatus,
    EncounterType, EntityKind, TransitionPayload,
};
use hms_store::HospitalState;

use crate::engine::{breach_to_error, require_edge, require_version, Committed};
use crate::error::TransitionError;

// ---------------------------------------------------------------------------
// Creation (walk-in)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewWalkIn {
    pub patient_id: Uuid,
    pub department_id: Uuid,
    pub encounter_type: EncounterType,
}

/// Create an encounter with no booking. Walk-ins arrive in person, so the
/// record starts at Arrived rather than Planned.
pub fn create_walk_in(
    state: &mut HospitalState,
    req: NewWalkIn,
    actor: Actor,
) -> Committed<EncounterSnapshot> {
    let now = Utc::now();
    let encounter = Encounter {
        id: Uuid::new_v4(),
        booking_id: None,
        patient_id: req.patient_id,
        department_id: req.department_id,
        encounter_type: req.encounter_type,
        status: EncounterStatus::Arrived,
        disposition: None,
        cancellation_reason: None,
        started_at: Some(now),
        ended_at: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::Encounter,
        encounter.id,
        encounter.status.as_code(),
        actor,
        now,
    );
    state.encounters.insert(encounter.id, encounter.clone());
    let capabilities = encounter_capabilities(state, &encounter);
    Committed::new(
        EncounterSnapshot {
            encounter,
            capabilities,
        },
        vec![event],
    )
}

// ---------------------------------------------------------------------------
// Check-in / begin
// ---------------------------------------------------------------------------

pub fn check_in(
    state: &mut HospitalState,
    encounter_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<EncounterSnapshot>, TransitionError> {
    encounter_transition(
        state,
        encounter_id,
        EncounterStatus::Arrived,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

pub fn begin_consultation(
    state: &mut HospitalState,
    encounter_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<EncounterSnapshot>, TransitionError> {
    encounter_transition(
        state,
        encounter_id,
        EncounterStatus::InProgress,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

// ---------------------------------------------------------------------------
// Discharge / cancel
// ---------------------------------------------------------------------------

/// Discharge an encounter.
///
/// The open-order guard is re-validated here, inside the same critical
/// section that commits the write, so a medication order placed after the
/// caller's read still blocks the discharge. A complete discharge plan in
/// the payload overrides the guard; the orders themselves are untouched.
pub fn discharge(
    state: &mut HospitalState,
    encounter_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<EncounterSnapshot>, TransitionError> {
    encounter_transition(
        state,
        encounter_id,
        EncounterStatus::Finished,
        actor,
        caller_version,
        payload,
    )
}

pub fn cancel_encounter(
    state: &mut HospitalState,
    encounter_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<EncounterSnapshot>, TransitionError> {
    encounter_transition(
        state,
        encounter_id,
        EncounterStatus::Cancelled,
        actor,
        caller_version,
        payload,
    )
}

// ---------------------------------------------------------------------------
// Shared transition path
// ---------------------------------------------------------------------------

fn encounter_transition(
    state: &mut HospitalState,
    encounter_id: Uuid,
    target: EncounterStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<EncounterSnapshot>, TransitionError> {
    let not_found = TransitionError::NotFound {
        kind: EntityKind::Encounter,
        entity_id: encounter_id,
    };

    // Checks run on an immutable read: the discharge guard needs the rest
    // of the state, so the mutable borrow is taken only once everything
    // has passed.
    let (from, stored_version) = match state.encounters.get(&encounter_id) {
        Some(e) => (e.status, e.version),
        None => return Err(not_found),
    };

    require_edge(encounter_id, from, target, actor, payload)?;
    require_version(
        EntityKind::Encounter,
        encounter_id,
        caller_version,
        stored_version,
    )?;

    if target == EncounterStatus::Finished {
        if let GuardVerdict::Blocked { breach } =
            check_encounter_discharge(state, encounter_id, payload.discharge_plan.as_ref())
        {
            return Err(breach_to_error(EntityKind::Encounter, breach));
        }
    }

    let now = Utc::now();
    let Some(enc) = state.encounters.get_mut(&encounter_id) else {
        return Err(not_found);
    };
    enc.status = target;
    enc.updated_at = now;
    enc.version += 1;
    match target {
        EncounterStatus::Arrived => enc.started_at = Some(now),
        EncounterStatus::Finished => {
            enc.disposition = payload.disposition;
            enc.ended_at = Some(now);
        }
        EncounterStatus::Cancelled => {
            enc.cancellation_reason = payload.reason.clone();
            enc.ended_at = Some(now);
        }
        _ => {}
    }
    let booking_id = enc.booking_id;
    let encounter = enc.clone();

    let mut events = vec![DomainEvent::transitioned(
        EntityKind::Encounter,
        encounter_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    )];

    // Finishing the visit closes out the linked booking.
    if target == EncounterStatus::Finished {
        if let Some(booking_id) = booking_id {
            if let Some(booking) = state.bookings.get_mut(&booking_id) {
                if booking.status == BookingStatus::Confirmed {
                    booking.status = BookingStatus::Completed;
                    booking.updated_at = now;
                    booking.version += 1;
                    events.push(DomainEvent::transitioned(
                        EntityKind::Booking,
                        booking_id,
                        BookingStatus::Confirmed.as_code(),
                        BookingStatus::Completed.as_code(),
                        actor,
                        now,
                    ));
                }
            }
        }
    }

    let capabilities = encounter_capabilities(state, &encounter);
    Ok(Committed::new(
        EncounterSnapshot {
            encounter,
            capabilities,
        },
        events,
    ))
}
