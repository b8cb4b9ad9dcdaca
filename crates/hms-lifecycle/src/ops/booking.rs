use chrono::Utc;
use uuid::Uuid;

use hms_consistency::encounter_capabilities;
use hms_schemas::{
    Actor, Booking, BookingSource, BookingStatus, DomainEvent, Encounter, EncounterSnapshot,
    EncounterStatus, EncounterType, EntityKind, TransitionPayload,
};
use hms_store::HospitalState;

use crate::engine::{require_edge, require_version, Committed};
use crate::error::TransitionError;

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub scheduled_at: chrono::DateTime<Utc>,
    pub source: BookingSource,
}

pub fn create_booking(state: &mut HospitalState, req: NewBooking, actor: Actor) -> Committed<Booking> {
    let now = Utc::now();
    let booking = Booking {
        id: Uuid::new_v4(),
        patient_id: req.patient_id,
        doctor_id: req.doctor_id,
        department_id: req.department_id,
        scheduled_at: req.scheduled_at,
        source: req.source,
        status: BookingStatus::Pending,
        cancellation_reason: None,
        encounter_id: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::Booking,
        booking.id,
        booking.status.as_code(),
        actor,
        now,
    );
    state.bookings.insert(booking.id, booking.clone());
    Committed::new(booking, vec![event])
}

// ---------------------------------------------------------------------------
// Confirmation — creates exactly one encounter
// ---------------------------------------------------------------------------

/// Result of a confirm call: the booking plus the encounter it references.
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub encounter: EncounterSnapshot,
}

/// Confirm a booking, creating its encounter exactly once.
///
/// Idempotent by booking id: confirming an already-confirmed booking is a
/// no-op that returns the existing encounter reference, with no version
/// bump and no events. The idempotent path runs before the version check —
/// a retried confirm must not surface a conflict.
pub fn confirm_booking(
    state: &mut HospitalState,
    booking_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<BookingConfirmation>, TransitionError> {
    let not_found = TransitionError::NotFound {
        kind: EntityKind::Booking,
        entity_id: booking_id,
    };
    let Some(booking) = state.bookings.get(&booking_id) else {
        return Err(not_found);
    };

    // Idempotent re-confirmation.
    if booking.status == BookingStatus::Confirmed {
        if let Some(encounter_id) = booking.encounter_id {
            if let Some(enc) = state.encounters.get(&encounter_id) {
                let snapshot = EncounterSnapshot {
                    encounter: enc.clone(),
                    capabilities: encounter_capabilities(state, enc),
                };
                return Ok(Committed::new(
                    BookingConfirmation {
                        booking: booking.clone(),
                        encounter: snapshot,
                    },
                    Vec::new(),
                ));
            }
        }
    }

    let payload = TransitionPayload::default();
    require_edge(
        booking_id,
        booking.status,
        BookingStatus::Confirmed,
        actor,
        &payload,
    )?;
    require_version(
        EntityKind::Booking,
        booking_id,
        caller_version,
        booking.version,
    )?;

    let now = Utc::now();
    let from_code = booking.status.as_code();

    let encounter = Encounter {
        id: Uuid::new_v4(),
        booking_id: Some(booking_id),
        patient_id: booking.patient_id,
        department_id: booking.department_id,
        encounter_type: EncounterType::Outpatient,
        status: EncounterStatus::Planned,
        disposition: None,
        cancellation_reason: None,
        started_at: None,
        ended_at: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };

    let Some(booking) = state.bookings.get_mut(&booking_id) else {
        return Err(not_found);
    };
    booking.status = BookingStatus::Confirmed;
    booking.encounter_id = Some(encounter.id);
    booking.updated_at = now;
    booking.version += 1;
    let booking = booking.clone();

    let events = vec![
        DomainEvent::transitioned(
            EntityKind::Booking,
            booking_id,
            from_code,
            BookingStatus::Confirmed.as_code(),
            actor,
            now,
        ),
        DomainEvent::created(
            EntityKind::Encounter,
            encounter.id,
            encounter.status.as_code(),
            actor,
            now,
        ),
    ];

    state.encounters.insert(encounter.id, encounter.clone());
    let capabilities = encounter_capabilities(state, &encounter);

    Ok(Committed::new(
        BookingConfirmation {
            booking,
            encounter: EncounterSnapshot {
                encounter,
                capabilities,
            },
        },
        events,
    ))
}

// ---------------------------------------------------------------------------
// Cancel / no-show / complete
// ---------------------------------------------------------------------------

pub fn cancel_booking(
    state: &mut HospitalState,
    booking_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<Booking>, TransitionError> {
    booking_transition(
        state,
        booking_id,
        BookingStatus::Cancelled,
        actor,
        caller_version,
        payload,
    )
}

pub fn mark_no_show(
    state: &mut HospitalState,
    booking_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<Booking>, TransitionError> {
    booking_transition(
        state,
        booking_id,
        BookingStatus::NoShow,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

pub fn complete_booking(
    state: &mut HospitalState,
    booking_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<Booking>, TransitionError> {
    booking_transition(
        state,
        booking_id,
        BookingStatus::Completed,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

fn booking_transition(
    state: &mut HospitalState,
    booking_id: Uuid,
    target: BookingStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<Booking>, TransitionError> {
    let Some(booking) = state.bookings.get_mut(&booking_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Booking,
            entity_id: booking_id,
        });
    };

    let from = booking.status;
    require_edge(booking_id, from, target, actor, payload)?;
    require_version(
        EntityKind::Booking,
        booking_id,
        caller_version,
        booking.version,
    )?;

    let now = Utc::now();
    booking.status = target;
    if target == BookingStatus::Cancelled {
        booking.cancellation_reason = payload.reason.clone();
    }
    booking.updated_at = now;
    booking.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::Booking,
        booking_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(booking.clone(), vec![event]))
}
