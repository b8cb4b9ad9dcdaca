use hms_lifecycle::{
    activate_order, create_walk_in, discontinue_order, hold_order, place_order_group,
    resume_order, NewMedicationOrder, NewOrderGroup, NewWalkIn,
};
use hms_schemas::{
    Actor, EncounterType, MedicationOrderStatus, Role, TransitionPayload,
};
use hms_store::HospitalState;
use uuid::Uuid;

fn seeded_order(state: &mut HospitalState) -> Uuid {
    let nurse = Actor::new(Uuid::new_v4(), Role::Nurse);
    let enc = create_walk_in(
        state,
        NewWalkIn {
            patient_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            encounter_type: EncounterType::Outpatient,
        },
        nurse,
    )
    .snapshot
    .encounter;

    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    let placed = place_order_group(
        state,
        NewOrderGroup {
            encounter_id: enc.id,
            stay_id: None,
            orders: vec![NewMedicationOrder {
                drug_name: "warfarin".into(),
                dose: "5 mg".into(),
                route: "oral".into(),
                frequency: "qd".into(),
            }],
        },
        doctor,
    )
    .unwrap();
    placed.snapshot.orders[0].id
}

#[test]
fn scenario_discontinued_order_rejects_every_further_transition() {
    let mut state = HospitalState::new();
    let order_id = seeded_order(&mut state);
    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);

    activate_order(&mut state, order_id, doctor, 0).unwrap();
    discontinue_order(
        &mut state,
        order_id,
        doctor,
        1,
        &TransitionPayload::with_reason("adverse reaction"),
    )
    .unwrap();
    assert_eq!(
        state.med_orders[&order_id].status,
        MedicationOrderStatus::Discontinued
    );
    let frozen_version = state.med_orders[&order_id].version;

    // Hold, resume and re-activation against the terminal order must all
    // fail as invalid transitions, whatever version the caller presents.
    let hold = hold_order(
        &mut state,
        order_id,
        doctor,
        frozen_version,
        &TransitionPayload::with_reason("try to pause"),
    )
    .unwrap_err();
    assert_eq!(hold.code(), "INVALID_TRANSITION");

    let resume = resume_order(&mut state, order_id, doctor, frozen_version).unwrap_err();
    assert_eq!(resume.code(), "INVALID_TRANSITION");

    let reactivate = activate_order(&mut state, order_id, doctor, frozen_version).unwrap_err();
    assert_eq!(reactivate.code(), "INVALID_TRANSITION");

    // And none of the rejected requests moved the stored record.
    let order = &state.med_orders[&order_id];
    assert_eq!(order.status, MedicationOrderStatus::Discontinued);
    assert_eq!(order.version, frozen_version);
    assert_eq!(order.discontinue_reason.as_deref(), Some("adverse reaction"));
}

#[test]
fn scenario_discontinue_without_reason_is_rejected_before_any_write() {
    let mut state = HospitalState::new();
    let order_id = seeded_order(&mut state);
    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    activate_order(&mut state, order_id, doctor, 0).unwrap();

    // A blank reason does not satisfy the edge's required field — the
    // engine never assumes a client confirmation dialog collected one.
    let err = discontinue_order(
        &mut state,
        order_id,
        doctor,
        1,
        &TransitionPayload::with_reason("   "),
    )
    .unwrap_err();
    assert_eq!(err.code(), "MISSING_FIELD");
    assert_eq!(
        state.med_orders[&order_id].status,
        MedicationOrderStatus::Active
    );
}
