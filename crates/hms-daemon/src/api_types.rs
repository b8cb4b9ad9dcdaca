//! Request and response types for all hms-daemon HTTP endpoints.
//!
//! `Serialize + Deserialize` so Axum can encode them and the scenario
//! tests can decode them. No business logic lives here. Every mutating
//! request names its actor explicitly — there is no ambient session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hms_schemas::{
    Booking, BookingSource, DischargePlan, Disposition, EmergencyDetails, EncounterSnapshot,
    EncounterType, InvoiceLineItem, MedicationOrder, MedicationOrderGroup, PrescriptionLine, Role,
    TriageCategory, UrgencyLevel,
};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Error body
// ---------------------------------------------------------------------------

/// Every domain-rule violation comes back with a stable `code` the caller
/// can branch on; `message` is for humans only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// True when the caller can refetch/resolve and retry.
    pub recoverable: bool,
}

// ---------------------------------------------------------------------------
// Actor + version envelope pieces
// ---------------------------------------------------------------------------

/// The acting staff member, required on every mutating request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActorBody {
    pub actor_id: Uuid,
    pub role: Role,
}

/// Actor plus the optimistic version the caller read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActionBody {
    pub actor_id: Uuid,
    pub role: Role,
    pub version: u64,
}

/// Action carrying a reason (cancel, hold, discontinue, reject…).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonBody {
    pub actor_id: Uuid,
    pub role: Role,
    pub version: u64,
    #[serde(default)]
    pub reason: Option<String>,
    /// Optional resume time for medication holds.
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    /// Optional result/report value for lab and imaging completion.
    #[serde(default)]
    pub result_value: Option<String>,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub department_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub source: BookingSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmBookingResponse {
    pub booking: Booking,
    pub encounter: EncounterSnapshot,
}

// ---------------------------------------------------------------------------
// Encounters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalkInRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub patient_id: Uuid,
    pub department_id: Uuid,
    pub encounter_type: EncounterType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DischargeRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub version: u64,
    pub disposition: Option<Disposition>,
    #[serde(default)]
    pub discharge_plan: Option<DischargePlan>,
}

// ---------------------------------------------------------------------------
// Emergency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyArrivalRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub patient_id: Uuid,
    pub department_id: Uuid,
    pub triage_category: TriageCategory,
    pub pain_score: u8,
    pub life_threatening: bool,
    pub arrival_mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetriageRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub version: u64,
    pub triage_category: TriageCategory,
    pub pain_score: u8,
    pub life_threatening: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyResponse {
    pub encounter: EncounterSnapshot,
    pub details: EmergencyDetails,
}

// ---------------------------------------------------------------------------
// Medication orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedicationOrderBody {
    pub drug_name: String,
    pub dose: String,
    pub route: String,
    pub frequency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOrderGroupRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub encounter_id: Uuid,
    #[serde(default)]
    pub stay_id: Option<Uuid>,
    pub orders: Vec<NewMedicationOrderBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderGroupResponse {
    pub group: MedicationOrderGroup,
    pub orders: Vec<MedicationOrder>,
}

// ---------------------------------------------------------------------------
// Inpatient stays
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmitRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub encounter_id: Uuid,
    pub ward: String,
    pub bed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DischargePlanRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub version: u64,
    pub home_care_plan: String,
    pub medication_reconciliation: String,
    pub follow_up: String,
    pub readiness_assessment: String,
}

// ---------------------------------------------------------------------------
// Billing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateInvoiceRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub line_items: Vec<InvoiceLineItem>,
    /// Insurance coverage in basis points (10_000 = fully covered).
    pub coverage_bps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub version: u64,
    pub amount_cents: i64,
}

// ---------------------------------------------------------------------------
// Lab orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLabOrderRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub encounter_id: Uuid,
    pub test_code: String,
    pub test_name: String,
    pub urgency: UrgencyLevel,
    #[serde(default)]
    pub reference_range: Option<String>,
}

// ---------------------------------------------------------------------------
// Diagnostic / imaging orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDiagnosticOrderRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub encounter_id: Uuid,
    pub procedure_name: String,
    pub urgency: UrgencyLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImagingOrderRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub encounter_id: Uuid,
    pub modality: String,
    pub body_site: String,
    pub urgency: UrgencyLevel,
}

// ---------------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPrescriptionRequest {
    pub actor_id: Uuid,
    pub role: Role,
    pub encounter_id: Uuid,
    pub lines: Vec<PrescriptionLine>,
}
