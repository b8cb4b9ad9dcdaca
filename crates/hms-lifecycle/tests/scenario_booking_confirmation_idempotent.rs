use chrono::Utc;
use hms_lifecycle::{confirm_booking, create_booking, NewBooking};
use hms_schemas::{Actor, BookingSource, BookingStatus, EncounterStatus, Role};
use hms_store::HospitalState;
use uuid::Uuid;

fn receptionist() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Receptionist)
}

fn new_booking() -> NewBooking {
    NewBooking {
        patient_id: Uuid::new_v4(),
        doctor_id: Uuid::new_v4(),
        department_id: Uuid::new_v4(),
        scheduled_at: Utc::now(),
        source: BookingSource::Online,
    }
}

#[test]
fn scenario_confirming_creates_exactly_one_encounter() {
    let mut state = HospitalState::new();
    let actor = receptionist();

    // GIVEN a pending booking
    let booking = create_booking(&mut state, new_booking(), actor).snapshot;
    assert_eq!(booking.status, BookingStatus::Pending);

    // WHEN it is confirmed
    let first = confirm_booking(&mut state, booking.id, actor, booking.version).unwrap();

    // THEN exactly one encounter exists, planned, referencing the booking
    assert_eq!(first.snapshot.booking.status, BookingStatus::Confirmed);
    let encounter = &first.snapshot.encounter.encounter;
    assert_eq!(encounter.status, EncounterStatus::Planned);
    assert_eq!(encounter.booking_id, Some(booking.id));
    assert_eq!(state.encounters.len(), 1);

    // AND the booking transition plus the encounter creation were emitted
    assert_eq!(first.events.len(), 2);
}

#[test]
fn scenario_reconfirmation_is_a_noop_returning_the_same_encounter() {
    let mut state = HospitalState::new();
    let actor = receptionist();
    let booking = create_booking(&mut state, new_booking(), actor).snapshot;

    let first = confirm_booking(&mut state, booking.id, actor, booking.version).unwrap();
    let encounter_id = first.snapshot.encounter.encounter.id;

    // WHEN confirmed again — even with a stale version, the idempotent
    // path answers before the version check
    let second = confirm_booking(&mut state, booking.id, actor, 999).unwrap();

    // THEN the same encounter reference comes back, nothing new is created
    // and no events are emitted
    assert_eq!(second.snapshot.encounter.encounter.id, encounter_id);
    assert!(second.events.is_empty());
    assert_eq!(state.encounters.len(), 1);
    assert_eq!(
        second.snapshot.booking.version,
        first.snapshot.booking.version,
        "re-confirmation must not bump the version"
    );
}
