//! Inpatient flow: admission, stay-scoped orders, discharge planning as
//! the documented override for the open-order guard.

use hms_lifecycle::{
    activate_order, admit, discharge_stay, file_discharge_plan, place_order_group, NewMedicationOrder,
    NewOrderGroup, NewStay, TransitionError,
};
use hms_schemas::{
    DischargePlan, FieldName, InpatientStayStatus, MedicationOrderStatus, TransitionPayload,
};
use hms_testkit::ScenarioWard;

fn plan() -> DischargePlan {
    DischargePlan {
        home_care_plan: "wound care twice daily".into(),
        medication_reconciliation: "enoxaparin bridged to warfarin".into(),
        follow_up: "anticoagulation clinic in 5 days".into(),
        readiness_assessment: "independent transfers, INR stable".into(),
    }
}

#[test]
fn scenario_stay_discharge_requires_plan_while_orders_open() {
    let mut ward = ScenarioWard::new();
    let encounter = ward.checked_in_encounter().unwrap();
    let doctor = ward.doctor;
    let nurse = ward.nurse;

    let stay = admit(
        &mut ward.state,
        NewStay {
            encounter_id: encounter.encounter.id,
            ward: "4 West".into(),
            bed: "12B".into(),
        },
        doctor,
    )
    .unwrap()
    .snapshot;
    assert_eq!(stay.status, InpatientStayStatus::Admitted);

    // Orders placed for the stay.
    let placed = place_order_group(
        &mut ward.state,
        NewOrderGroup {
            encounter_id: encounter.encounter.id,
            stay_id: Some(stay.id),
            orders: vec![NewMedicationOrder {
                drug_name: "vancomycin".into(),
                dose: "1 g".into(),
                route: "iv".into(),
                frequency: "q12h".into(),
            }],
        },
        doctor,
    )
    .unwrap()
    .snapshot;
    let order = &placed.orders[0];
    activate_order(&mut ward.state, order.id, doctor, order.version).unwrap();

    // Discharge without a plan: blocked.
    let err = discharge_stay(
        &mut ward.state,
        stay.id,
        doctor,
        stay.version,
        &TransitionPayload::default(),
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::OpenDependency { .. }));

    // Filing an incomplete plan is rejected outright.
    let mut partial = plan();
    partial.medication_reconciliation = String::new();
    let err =
        file_discharge_plan(&mut ward.state, stay.id, nurse, stay.version, partial).unwrap_err();
    assert!(matches!(
        err,
        TransitionError::MissingField {
            field: FieldName::DischargePlan
        }
    ));

    // A complete filed plan unlocks the discharge.
    let filed = file_discharge_plan(&mut ward.state, stay.id, nurse, stay.version, plan())
        .unwrap()
        .snapshot;
    let discharged = discharge_stay(
        &mut ward.state,
        stay.id,
        doctor,
        filed.version,
        &TransitionPayload::default(),
    )
    .unwrap()
    .snapshot;
    assert_eq!(discharged.status, InpatientStayStatus::Discharged);
    assert!(discharged.discharged_at.is_some());

    // The override documented continuing care; it did not touch the order.
    assert_eq!(
        ward.state.med_orders[&order.id].status,
        MedicationOrderStatus::Active
    );
}

#[test]
fn scenario_transfer_requires_reason_and_is_terminal() {
    let mut ward = ScenarioWard::new();
    let encounter = ward.checked_in_encounter().unwrap();
    let doctor = ward.doctor;

    let stay = admit(
        &mut ward.state,
        NewStay {
            encounter_id: encounter.encounter.id,
            ward: "ICU".into(),
            bed: "3".into(),
        },
        doctor,
    )
    .unwrap()
    .snapshot;

    let err = hms_lifecycle::transfer_stay(
        &mut ward.state,
        stay.id,
        doctor,
        stay.version,
        &TransitionPayload::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "MISSING_FIELD");

    let transferred = hms_lifecycle::transfer_stay(
        &mut ward.state,
        stay.id,
        doctor,
        stay.version,
        &TransitionPayload::with_reason("tertiary cardiac centre"),
    )
    .unwrap()
    .snapshot;
    assert_eq!(transferred.status, InpatientStayStatus::Transferred);

    // Terminal: no further stay transitions.
    let err = discharge_stay(
        &mut ward.state,
        stay.id,
        doctor,
        transferred.version,
        &TransitionPayload::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}
