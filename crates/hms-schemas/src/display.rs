//! Human-readable status labels.
//!
//! Presentation strings live here, away from the domain model — the engine
//! and registry only ever see the typed statuses.

use crate::status::{
    BookingStatus, EncounterStatus, InvoiceStatus, LabTestOrderStatus, MedicationOrderStatus,
    TriageCategory,
};

pub fn booking_status_label(s: BookingStatus) -> &'static str {
    match s {
        BookingStatus::Pending => "Awaiting confirmation",
        BookingStatus::Confirmed => "Confirmed",
        BookingStatus::Cancelled => "Cancelled",
        BookingStatus::NoShow => "No-show",
        BookingStatus::Completed => "Completed",
    }
}

pub fn encounter_status_label(s: EncounterStatus) -> &'static str {
    match s {
        EncounterStatus::Planned => "Planned",
        EncounterStatus::Arrived => "Checked in",
        EncounterStatus::InProgress => "In consultation",
        EncounterStatus::Finished => "Discharged",
        EncounterStatus::Cancelled => "Cancelled",
    }
}

pub fn medication_order_status_label(s: MedicationOrderStatus) -> &'static str {
    match s {
        MedicationOrderStatus::Pending => "Pending review",
        MedicationOrderStatus::Active => "Active",
        MedicationOrderStatus::Held => "On hold",
        MedicationOrderStatus::Discontinued => "Discontinued",
        MedicationOrderStatus::Completed => "Completed",
    }
}

pub fn invoice_status_label(s: InvoiceStatus) -> &'static str {
    match s {
        InvoiceStatus::Pending => "Unpaid",
        InvoiceStatus::Partial => "Partially paid",
        InvoiceStatus::Paid => "Paid",
        InvoiceStatus::Cancelled => "Cancelled",
    }
}

pub fn lab_status_label(s: LabTestOrderStatus) -> &'static str {
    match s {
        LabTestOrderStatus::Ordered => "Ordered",
        LabTestOrderStatus::Collected => "Specimen collected",
        LabTestOrderStatus::Received => "Specimen received",
        LabTestOrderStatus::InProgress => "In progress",
        LabTestOrderStatus::Completed => "Result entered",
        LabTestOrderStatus::Verified => "Verified",
        LabTestOrderStatus::Rejected => "Specimen rejected",
    }
}

pub fn triage_category_label(c: TriageCategory) -> &'static str {
    match c {
        TriageCategory::Resuscitation => "Resuscitation",
        TriageCategory::Emergent => "Emergent",
        TriageCategory::Urgent => "Urgent",
        TriageCategory::SemiUrgent => "Semi-urgent",
        TriageCategory::NonUrgent => "Non-urgent",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_differ_from_wire_codes() {
        // Labels are presentation strings, not the SCREAMING_SNAKE codes.
        assert_eq!(encounter_status_label(EncounterStatus::Arrived), "Checked in");
        assert_ne!(
            encounter_status_label(EncounterStatus::Arrived),
            EncounterStatus::Arrived.as_code()
        );
    }
}
