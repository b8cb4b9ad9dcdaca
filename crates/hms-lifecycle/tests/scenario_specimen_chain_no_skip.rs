use hms_lifecycle::{
    collect_specimen, complete_result, create_walk_in, order_lab_test, receive_specimen,
    reject_specimen, start_processing, verify_result, NewLabOrder, NewWalkIn,
};
use hms_schemas::{
    Actor, EncounterType, LabTestOrderStatus, Role, TransitionPayload, UrgencyLevel,
};
use hms_store::HospitalState;
use uuid::Uuid;

fn seeded_lab_order(state: &mut HospitalState) -> Uuid {
    let nurse = Actor::new(Uuid::new_v4(), Role::Nurse);
    let encounter_id = create_walk_in(
        state,
        NewWalkIn {
            patient_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            encounter_type: EncounterType::Outpatient,
        },
        nurse,
    )
    .snapshot
    .encounter
    .id;

    order_lab_test(
        state,
        NewLabOrder {
            encounter_id,
            test_code: "CBC".into(),
            test_name: "complete blood count".into(),
            urgency: UrgencyLevel::Routine,
            reference_range: Some("4.5-11.0 x10^9/L".into()),
        },
        nurse,
    )
    .unwrap()
    .snapshot
    .id
}

#[test]
fn scenario_received_cannot_be_reached_without_collection() {
    let mut state = HospitalState::new();
    let order_id = seeded_lab_order(&mut state);
    let tech = Actor::new(Uuid::new_v4(), Role::LabTechnician);

    let err = receive_specimen(&mut state, order_id, tech, 0).unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
    assert_eq!(
        state.lab_orders[&order_id].status,
        LabTestOrderStatus::Ordered
    );

    collect_specimen(&mut state, order_id, tech, 0).unwrap();
    let received = receive_specimen(&mut state, order_id, tech, 1).unwrap().snapshot;
    assert_eq!(received.status, LabTestOrderStatus::Received);
    assert!(received.specimen_collected_at.is_some());
    assert!(received.specimen_received_at.is_some());
}

#[test]
fn scenario_full_chain_through_verification() {
    let mut state = HospitalState::new();
    let order_id = seeded_lab_order(&mut state);
    let tech = Actor::new(Uuid::new_v4(), Role::LabTechnician);
    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);

    collect_specimen(&mut state, order_id, tech, 0).unwrap();
    receive_specimen(&mut state, order_id, tech, 1).unwrap();
    start_processing(&mut state, order_id, tech, 2).unwrap();

    let mut payload = TransitionPayload::default();
    payload.result_value = Some("7.2 x10^9/L".into());
    complete_result(&mut state, order_id, tech, 3, &payload).unwrap();

    let verified = verify_result(&mut state, order_id, doctor, 4).unwrap().snapshot;
    assert_eq!(verified.status, LabTestOrderStatus::Verified);
    assert_eq!(verified.verified_by, Some(doctor.actor_id));
    assert_eq!(verified.result_value.as_deref(), Some("7.2 x10^9/L"));
}

#[test]
fn scenario_rejection_needs_a_reason_and_stops_at_completion() {
    let mut state = HospitalState::new();
    let order_id = seeded_lab_order(&mut state);
    let tech = Actor::new(Uuid::new_v4(), Role::LabTechnician);

    // Rejection without a reason fails closed.
    let err =
        reject_specimen(&mut state, order_id, tech, 0, &TransitionPayload::default()).unwrap_err();
    assert_eq!(err.code(), "MISSING_FIELD");

    // Rejection with a reason is legal from any pre-completion status.
    collect_specimen(&mut state, order_id, tech, 0).unwrap();
    let rejected = reject_specimen(
        &mut state,
        order_id,
        tech,
        1,
        &TransitionPayload::with_reason("hemolyzed sample"),
    )
    .unwrap()
    .snapshot;
    assert_eq!(rejected.status, LabTestOrderStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("hemolyzed sample"));

    // Rejected is terminal.
    let err = collect_specimen(&mut state, order_id, tech, 2).unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}

#[test]
fn scenario_completed_result_cannot_be_rejected() {
    let mut state = HospitalState::new();
    let order_id = seeded_lab_order(&mut state);
    let tech = Actor::new(Uuid::new_v4(), Role::LabTechnician);

    collect_specimen(&mut state, order_id, tech, 0).unwrap();
    receive_specimen(&mut state, order_id, tech, 1).unwrap();
    start_processing(&mut state, order_id, tech, 2).unwrap();
    let mut payload = TransitionPayload::default();
    payload.result_value = Some("140 mmol/L".into());
    complete_result(&mut state, order_id, tech, 3, &payload).unwrap();

    let err = reject_specimen(
        &mut state,
        order_id,
        tech,
        4,
        &TransitionPayload::with_reason("too late"),
    )
    .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}
