use hms_lifecycle::{
    activate_order, create_walk_in, hold_order, place_order_group, NewMedicationOrder,
    NewOrderGroup, NewWalkIn, TransitionError,
};
use hms_schemas::{Actor, EncounterType, MedicationOrderStatus, Role, TransitionPayload};
use hms_store::HospitalState;
use uuid::Uuid;

#[test]
fn scenario_two_holds_against_one_version_have_exactly_one_winner() {
    let mut state = HospitalState::new();
    let nurse = Actor::new(Uuid::new_v4(), Role::Nurse);
    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);

    let enc = create_walk_in(
        &mut state,
        NewWalkIn {
            patient_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            encounter_type: EncounterType::Inpatient,
        },
        nurse,
    )
    .snapshot
    .encounter;

    let placed = place_order_group(
        &mut state,
        NewOrderGroup {
            encounter_id: enc.id,
            stay_id: None,
            orders: vec![NewMedicationOrder {
                drug_name: "insulin glargine".into(),
                dose: "10 IU".into(),
                route: "sc".into(),
                frequency: "qhs".into(),
            }],
        },
        doctor,
    )
    .unwrap();
    let order_id = placed.snapshot.orders[0].id;
    activate_order(&mut state, order_id, doctor, 0).unwrap();

    // Both callers read version 1 before either writes.
    let read_version = state.med_orders[&order_id].version;

    let first = hold_order(
        &mut state,
        order_id,
        nurse,
        read_version,
        &TransitionPayload::with_reason("pre-op fasting"),
    );
    assert!(first.is_ok());

    let second = hold_order(
        &mut state,
        order_id,
        doctor,
        read_version,
        &TransitionPayload::with_reason("duplicate request"),
    );
    match second {
        Err(TransitionError::VersionConflict {
            expected, actual, ..
        }) => {
            assert_eq!(expected, read_version);
            assert_eq!(actual, read_version + 1);
        }
        other => panic!("expected VersionConflict, got {other:?}"),
    }

    // The winner's write stands untouched.
    let order = &state.med_orders[&order_id];
    assert_eq!(order.status, MedicationOrderStatus::Held);
    assert_eq!(order.hold_reason.as_deref(), Some("pre-op fasting"));
}

#[test]
fn scenario_loser_succeeds_after_refetching() {
    let mut state = HospitalState::new();
    let nurse = Actor::new(Uuid::new_v4(), Role::Nurse);
    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);

    let enc = create_walk_in(
        &mut state,
        NewWalkIn {
            patient_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            encounter_type: EncounterType::Inpatient,
        },
        nurse,
    )
    .snapshot
    .encounter;
    let placed = place_order_group(
        &mut state,
        NewOrderGroup {
            encounter_id: enc.id,
            stay_id: None,
            orders: vec![NewMedicationOrder {
                drug_name: "ceftriaxone".into(),
                dose: "1 g".into(),
                route: "iv".into(),
                frequency: "qd".into(),
            }],
        },
        doctor,
    )
    .unwrap();
    let order_id = placed.snapshot.orders[0].id;
    activate_order(&mut state, order_id, doctor, 0).unwrap();

    let stale = state.med_orders[&order_id].version;
    hold_order(
        &mut state,
        order_id,
        nurse,
        stale,
        &TransitionPayload::with_reason("awaiting culture"),
    )
    .unwrap();

    // Conflict is recoverable: refetch, then retry the intended action.
    let err = hms_lifecycle::resume_order(&mut state, order_id, doctor, stale).unwrap_err();
    assert!(err.is_recoverable());

    let fresh = state.med_orders[&order_id].version;
    hms_lifecycle::resume_order(&mut state, order_id, doctor, fresh).unwrap();
    assert_eq!(
        state.med_orders[&order_id].status,
        MedicationOrderStatus::Active
    );
}
