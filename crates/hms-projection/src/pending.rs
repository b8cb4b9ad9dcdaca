use hms_schemas::{Booking, BookingStatus, LabTestOrder, LabTestOrderStatus, MedicationOrder,
    MedicationOrderStatus};
use hms_store::HospitalState;

/// Bookings awaiting confirmation, oldest scheduled first — the front
/// desk's worklist.
pub fn pending_bookings(state: &HospitalState) -> Vec<Booking> {
    let mut out: Vec<Booking> = state
        .bookings
        .values()
        .filter(|b| b.status == BookingStatus::Pending)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
    out
}

/// Medication orders awaiting pharmacist review.
pub fn pending_medication_orders(state: &HospitalState) -> Vec<MedicationOrder> {
    let mut out: Vec<MedicationOrder> = state
        .med_orders
        .values()
        .filter(|o| o.status == MedicationOrderStatus::Pending)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    out
}

/// Completed lab results awaiting verification.
pub fn pending_verification_lab_orders(state: &HospitalState) -> Vec<LabTestOrder> {
    let mut out: Vec<LabTestOrder> = state
        .lab_orders
        .values()
        .filter(|o| o.status == LabTestOrderStatus::Completed)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then(a.id.cmp(&b.id)));
    out
}
