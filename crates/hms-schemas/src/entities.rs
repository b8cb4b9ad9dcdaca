use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::payload::Disposition;
use crate::status::{
    BookingStatus, DiagnosticOrderStatus, EncounterStatus, ImagingOrderStatus, InpatientStayStatus,
    InvoiceStatus, LabTestOrderStatus, MedicationOrderStatus, PrescriptionStatus, TriageCategory,
};

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingSource {
    Online,
    WalkIn,
    Phone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub source: BookingSource,
    pub status: BookingStatus,
    /// Required iff status == Cancelled.
    pub cancellation_reason: Option<String>,
    /// Set exactly once, when the booking is confirmed.
    pub encounter_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic version counter; incremented on every committed transition.
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Encounter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncounterType {
    Outpatient,
    Inpatient,
    Emergency,
    FollowUp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub id: Uuid,
    /// None for walk-in and emergency arrivals.
    pub booking_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub department_id: Uuid,
    pub encounter_type: EncounterType,
    pub status: EncounterStatus,
    /// Set only at Finished / Cancelled.
    pub disposition: Option<Disposition>,
    /// Required iff status == Cancelled.
    pub cancellation_reason: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Emergency extension
// ---------------------------------------------------------------------------

/// 1:1 extension of an emergency encounter, keyed by `encounter_id`.
/// The priority score is derived in the projection layer and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyDetails {
    pub encounter_id: Uuid,
    pub triage_category: TriageCategory,
    /// 0–10 self-reported pain score.
    pub pain_score: u8,
    pub life_threatening: bool,
    pub arrival_mode: String,
    pub arrived_at: DateTime<Utc>,
    pub assigned_staff_id: Option<Uuid>,
    /// Who performed the most recent triage assessment.
    pub triaged_by: Uuid,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Medication orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationOrderGroup {
    pub id: Uuid,
    pub encounter_id: Uuid,
    /// Set when the group was placed for an inpatient stay.
    pub stay_id: Option<Uuid>,
    pub patient_id: Uuid,
    pub ordered_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationOrder {
    pub id: Uuid,
    pub group_id: Uuid,
    pub drug_name: String,
    pub dose: String,
    pub route: String,
    pub frequency: String,
    pub status: MedicationOrderStatus,
    /// Required while Held.
    pub hold_reason: Option<String>,
    /// Optional planned resume time while Held.
    pub resume_at: Option<DateTime<Utc>>,
    /// Required once Discontinued. Discontinued is terminal.
    pub discontinue_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Inpatient stay
// ---------------------------------------------------------------------------

/// Continuing-care instructions that permit discharging an encounter or
/// stay while medication orders are still open. All four sections must be
/// non-blank for the plan to count as complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DischargePlan {
    pub home_care_plan: String,
    pub medication_reconciliation: String,
    pub follow_up: String,
    pub readiness_assessment: String,
}

impl DischargePlan {
    pub fn is_complete(&self) -> bool {
        !self.home_care_plan.trim().is_empty()
            && !self.medication_reconciliation.trim().is_empty()
            && !self.follow_up.trim().is_empty()
            && !self.readiness_assessment.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InpatientStay {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub ward: String,
    pub bed: String,
    pub status: InpatientStayStatus,
    pub admitted_at: DateTime<Utc>,
    pub discharged_at: Option<DateTime<Utc>>,
    /// Required once Transferred: destination and reason.
    pub transfer_reason: Option<String>,
    pub discharge_plan: Option<DischargePlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemKind {
    Medicine,
    Service,
    Material,
    Package,
}

/// One billable line. All money is integer cents; no float appears on the
/// billing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub kind: LineItemKind,
    pub description: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl InvoiceLineItem {
    pub fn total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity as i64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub line_items: Vec<InvoiceLineItem>,
    pub total_cents: i64,
    /// Insurance share of the total, per the coverage split at generation.
    pub insurer_share_cents: i64,
    pub patient_share_cents: i64,
    /// Payments recorded so far against the patient share.
    pub paid_cents: i64,
    pub status: InvoiceStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Lab / diagnostic / imaging orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Routine,
    Urgent,
    Stat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabTestOrder {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub test_code: String,
    pub test_name: String,
    pub urgency: UrgencyLevel,
    pub status: LabTestOrderStatus,
    pub specimen_collected_at: Option<DateTime<Utc>>,
    pub specimen_received_at: Option<DateTime<Utc>>,
    /// Recorded when the result completes.
    pub result_value: Option<String>,
    pub reference_range: Option<String>,
    /// Required once Rejected.
    pub rejection_reason: Option<String>,
    pub verified_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticOrder {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub procedure_name: String,
    pub urgency: UrgencyLevel,
    pub status: DiagnosticOrderStatus,
    pub findings: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagingOrder {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub modality: String,
    pub body_site: String,
    pub urgency: UrgencyLevel,
    pub status: ImagingOrderStatus,
    pub report_text: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Prescription
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionLine {
    pub drug_name: String,
    pub dose: String,
    pub duration_days: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub prescribed_by: Uuid,
    pub lines: Vec<PrescriptionLine>,
    pub status: PrescriptionStatus,
    pub cancellation_reason: Option<String>,
    pub dispensed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}
