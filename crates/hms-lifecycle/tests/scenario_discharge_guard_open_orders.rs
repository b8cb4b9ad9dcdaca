use hms_lifecycle::{
    activate_order, check_in, confirm_booking, create_booking, discharge, place_order_group,
    NewBooking, NewMedicationOrder, NewOrderGroup,
};
use hms_schemas::{
    Actor, BookingSource, DischargePlan, Disposition, MedicationOrderStatus, Role,
    TransitionPayload,
};
use hms_store::HospitalState;
use chrono::Utc;
use uuid::Uuid;

fn checked_in_encounter(state: &mut HospitalState) -> (Uuid, u64) {
    let desk = Actor::new(Uuid::new_v4(), Role::Receptionist);
    let booking = create_booking(
        state,
        NewBooking {
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            scheduled_at: Utc::now(),
            source: BookingSource::Phone,
        },
        desk,
    )
    .snapshot;
    let confirmed = confirm_booking(state, booking.id, desk, booking.version).unwrap();
    let enc = confirmed.snapshot.encounter.encounter;
    let arrived = check_in(state, enc.id, desk, enc.version).unwrap();
    let enc = arrived.snapshot.encounter;
    (enc.id, enc.version)
}

fn one_active_order(state: &mut HospitalState, encounter_id: Uuid) -> Uuid {
    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    let placed = place_order_group(
        state,
        NewOrderGroup {
            encounter_id,
            stay_id: None,
            orders: vec![NewMedicationOrder {
                drug_name: "heparin".into(),
                dose: "5000 IU".into(),
                route: "sc".into(),
                frequency: "bid".into(),
            }],
        },
        doctor,
    )
    .unwrap();
    let order = &placed.snapshot.orders[0];
    activate_order(state, order.id, doctor, order.version).unwrap();
    order.id
}

fn discharge_payload() -> TransitionPayload {
    TransitionPayload {
        disposition: Some(Disposition::Home),
        ..TransitionPayload::default()
    }
}

fn complete_plan() -> DischargePlan {
    DischargePlan {
        home_care_plan: "daily dressing change".into(),
        medication_reconciliation: "heparin continues at home".into(),
        follow_up: "surgical clinic in 10 days".into(),
        readiness_assessment: "mobile, pain controlled".into(),
    }
}

#[test]
fn scenario_discharge_blocked_while_order_is_active() {
    let mut state = HospitalState::new();
    let (enc_id, enc_version) = checked_in_encounter(&mut state);
    one_active_order(&mut state, enc_id);

    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    let err = discharge(&mut state, enc_id, doctor, enc_version, &discharge_payload()).unwrap_err();

    assert_eq!(err.code(), "OPEN_DEPENDENCY");
    assert!(err.is_recoverable());
    // The rejected request must not have touched the encounter.
    assert_eq!(state.encounters[&enc_id].version, enc_version);
}

#[test]
fn scenario_complete_plan_overrides_without_touching_orders() {
    let mut state = HospitalState::new();
    let (enc_id, enc_version) = checked_in_encounter(&mut state);
    let order_id = one_active_order(&mut state, enc_id);

    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    let mut payload = discharge_payload();
    payload.discharge_plan = Some(complete_plan());

    let committed = discharge(&mut state, enc_id, doctor, enc_version, &payload).unwrap();
    assert_eq!(
        committed.snapshot.encounter.status,
        hms_schemas::EncounterStatus::Finished
    );

    // Discharge must not silently discontinue the order.
    assert_eq!(
        state.med_orders[&order_id].status,
        MedicationOrderStatus::Active
    );
}

#[test]
fn scenario_incomplete_plan_is_not_an_override() {
    let mut state = HospitalState::new();
    let (enc_id, enc_version) = checked_in_encounter(&mut state);
    one_active_order(&mut state, enc_id);

    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    let mut plan = complete_plan();
    plan.readiness_assessment = String::new();
    let mut payload = discharge_payload();
    payload.discharge_plan = Some(plan);

    let err = discharge(&mut state, enc_id, doctor, enc_version, &payload).unwrap_err();
    assert_eq!(err.code(), "OPEN_DEPENDENCY");
}

#[test]
fn scenario_discharging_after_discontinuation_succeeds() {
    let mut state = HospitalState::new();
    let (enc_id, enc_version) = checked_in_encounter(&mut state);
    let order_id = one_active_order(&mut state, enc_id);

    let doctor = Actor::new(Uuid::new_v4(), Role::Doctor);
    let order_version = state.med_orders[&order_id].version;
    hms_lifecycle::discontinue_order(
        &mut state,
        order_id,
        doctor,
        order_version,
        &TransitionPayload::with_reason("adverse reaction"),
    )
    .unwrap();

    let committed = discharge(&mut state, enc_id, doctor, enc_version, &discharge_payload());
    assert!(committed.is_ok());
}
