//! Worklists, grouped medication orders and dashboard aggregates — all
//! read-only views over the same state the engine writes.

use hms_lifecycle::{hold_order, place_order_group, NewMedicationOrder, NewOrderGroup};
use hms_projection::{
    dashboard_summary, grouped_medication_orders, pending_bookings, pending_medication_orders,
};
use hms_schemas::{MedicationOrderStatus, TransitionPayload};
use hms_testkit::ScenarioWard;

#[test]
fn scenario_grouped_view_matches_placement() {
    let mut ward = ScenarioWard::new();
    let encounter = ward.checked_in_encounter().unwrap();
    let doctor = ward.doctor;

    let placed = place_order_group(
        &mut ward.state,
        NewOrderGroup {
            encounter_id: encounter.encounter.id,
            stay_id: None,
            orders: vec![
                NewMedicationOrder {
                    drug_name: "paracetamol".into(),
                    dose: "1 g".into(),
                    route: "oral".into(),
                    frequency: "qid".into(),
                },
                NewMedicationOrder {
                    drug_name: "ondansetron".into(),
                    dose: "4 mg".into(),
                    route: "iv".into(),
                    frequency: "prn".into(),
                },
            ],
        },
        doctor,
    )
    .unwrap()
    .snapshot;

    let grouped = grouped_medication_orders(&ward.state, encounter.encounter.id);
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].group.id, placed.group.id);
    assert_eq!(grouped[0].orders.len(), 2);
    // Both orders await pharmacist review.
    assert!(grouped[0]
        .orders
        .iter()
        .all(|o| o.status == MedicationOrderStatus::Pending));
    assert_eq!(pending_medication_orders(&ward.state).len(), 2);
}

#[test]
fn scenario_dashboard_counts_track_transitions() {
    let mut ward = ScenarioWard::new();

    // One pending booking plus one confirmed-and-checked-in visit.
    ward.pending_booking();
    let encounter = ward.checked_in_encounter().unwrap();
    let order = ward.active_order(encounter.encounter.id).unwrap();

    assert_eq!(pending_bookings(&ward.state).len(), 1);

    let before = dashboard_summary(&ward.state);
    assert_eq!(before.bookings_by_status.get("PENDING"), Some(&1));
    assert_eq!(before.bookings_by_status.get("CONFIRMED"), Some(&1));
    assert_eq!(before.encounters_by_status.get("ARRIVED"), Some(&1));
    assert_eq!(before.medication_orders_by_status.get("ACTIVE"), Some(&1));

    // Reading the dashboard never mutates: holds still go through the
    // engine, and the counts follow.
    let nurse = ward.nurse;
    hold_order(
        &mut ward.state,
        order.id,
        nurse,
        order.version,
        &TransitionPayload::with_reason("nil by mouth pre-op"),
    )
    .unwrap();

    let after = dashboard_summary(&ward.state);
    assert_eq!(after.medication_orders_by_status.get("ACTIVE"), None);
    assert_eq!(after.medication_orders_by_status.get("HELD"), Some(&1));
}
