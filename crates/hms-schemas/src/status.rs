use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Every entity type the lifecycle engine manages. Used to key the status
/// registry and to tag domain events and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Booking,
    Encounter,
    MedicationOrder,
    InpatientStay,
    Invoice,
    LabTestOrder,
    DiagnosticOrder,
    ImagingOrder,
    Prescription,
}

impl EntityKind {
    pub fn as_code(&self) -> &'static str {
        match self {
            EntityKind::Booking => "BOOKING",
            EntityKind::Encounter => "ENCOUNTER",
            EntityKind::MedicationOrder => "MEDICATION_ORDER",
            EntityKind::InpatientStay => "INPATIENT_STAY",
            EntityKind::Invoice => "INVOICE",
            EntityKind::LabTestOrder => "LAB_TEST_ORDER",
            EntityKind::DiagnosticOrder => "DIAGNOSTIC_ORDER",
            EntityKind::ImagingOrder => "IMAGING_ORDER",
            EntityKind::Prescription => "PRESCRIPTION",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    NoShow,
    Completed,
}

impl BookingStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::NoShow => "NO_SHOW",
            BookingStatus::Completed => "COMPLETED",
        }
    }
}

// ---------------------------------------------------------------------------
// Encounter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncounterStatus {
    Planned,
    Arrived,
    InProgress,
    Finished,
    Cancelled,
}

impl EncounterStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            EncounterStatus::Planned => "PLANNED",
            EncounterStatus::Arrived => "ARRIVED",
            EncounterStatus::InProgress => "IN_PROGRESS",
            EncounterStatus::Finished => "FINISHED",
            EncounterStatus::Cancelled => "CANCELLED",
        }
    }
}

// ---------------------------------------------------------------------------
// Emergency triage
// ---------------------------------------------------------------------------

/// Triage acuity, most acute first. The discriminant order is meaningful:
/// a lower `acuity_rank` means the patient must be seen sooner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageCategory {
    Resuscitation,
    Emergent,
    Urgent,
    SemiUrgent,
    NonUrgent,
}

impl TriageCategory {
    pub fn as_code(&self) -> &'static str {
        match self {
            TriageCategory::Resuscitation => "RESUSCITATION",
            TriageCategory::Emergent => "EMERGENT",
            TriageCategory::Urgent => "URGENT",
            TriageCategory::SemiUrgent => "SEMI_URGENT",
            TriageCategory::NonUrgent => "NON_URGENT",
        }
    }

    /// 1 = most acute. Used by the ED queue projection.
    pub fn acuity_rank(&self) -> u8 {
        match self {
            TriageCategory::Resuscitation => 1,
            TriageCategory::Emergent => 2,
            TriageCategory::Urgent => 3,
            TriageCategory::SemiUrgent => 4,
            TriageCategory::NonUrgent => 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Medication orders
// ---------------------------------------------------------------------------

/// Monotone along the registry graph except the explicit Active↔Held pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicationOrderStatus {
    Pending,
    Active,
    Held,
    Discontinued,
    Completed,
}

impl MedicationOrderStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            MedicationOrderStatus::Pending => "PENDING",
            MedicationOrderStatus::Active => "ACTIVE",
            MedicationOrderStatus::Held => "HELD",
            MedicationOrderStatus::Discontinued => "DISCONTINUED",
            MedicationOrderStatus::Completed => "COMPLETED",
        }
    }

    /// An order in Pending or Active still requires clinical action and
    /// blocks encounter discharge (absent a complete discharge plan).
    pub fn requires_action(&self) -> bool {
        matches!(
            self,
            MedicationOrderStatus::Pending | MedicationOrderStatus::Active
        )
    }
}

// ---------------------------------------------------------------------------
// Inpatient stay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InpatientStayStatus {
    Admitted,
    Discharged,
    Transferred,
}

impl InpatientStayStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            InpatientStayStatus::Admitted => "ADMITTED",
            InpatientStayStatus::Discharged => "DISCHARGED",
            InpatientStayStatus::Transferred => "TRANSFERRED",
        }
    }
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,
    Partial,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Partial => "PARTIAL",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

// ---------------------------------------------------------------------------
// Lab test orders — specimen workflow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabTestOrderStatus {
    Ordered,
    Collected,
    Received,
    InProgress,
    Completed,
    Verified,
    Rejected,
}

impl LabTestOrderStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            LabTestOrderStatus::Ordered => "ORDERED",
            LabTestOrderStatus::Collected => "COLLECTED",
            LabTestOrderStatus::Received => "RECEIVED",
            LabTestOrderStatus::InProgress => "IN_PROGRESS",
            LabTestOrderStatus::Completed => "COMPLETED",
            LabTestOrderStatus::Verified => "VERIFIED",
            LabTestOrderStatus::Rejected => "REJECTED",
        }
    }

    /// Rejection is only reachable before the result is completed.
    pub fn pre_completed(&self) -> bool {
        matches!(
            self,
            LabTestOrderStatus::Ordered
                | LabTestOrderStatus::Collected
                | LabTestOrderStatus::Received
                | LabTestOrderStatus::InProgress
        )
    }
}

// ---------------------------------------------------------------------------
// Diagnostic / imaging orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticOrderStatus {
    Ordered,
    InProgress,
    Completed,
    Verified,
    Cancelled,
}

impl DiagnosticOrderStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            DiagnosticOrderStatus::Ordered => "ORDERED",
            DiagnosticOrderStatus::InProgress => "IN_PROGRESS",
            DiagnosticOrderStatus::Completed => "COMPLETED",
            DiagnosticOrderStatus::Verified => "VERIFIED",
            DiagnosticOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImagingOrderStatus {
    Ordered,
    InProgress,
    Reported,
    Verified,
    Cancelled,
}

impl ImagingOrderStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            ImagingOrderStatus::Ordered => "ORDERED",
            ImagingOrderStatus::InProgress => "IN_PROGRESS",
            ImagingOrderStatus::Reported => "REPORTED",
            ImagingOrderStatus::Verified => "VERIFIED",
            ImagingOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

// ---------------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Issued,
    Dispensed,
    Cancelled,
}

impl PrescriptionStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            PrescriptionStatus::Issued => "ISSUED",
            PrescriptionStatus::Dispensed => "DISPENSED",
            PrescriptionStatus::Cancelled => "CANCELLED",
        }
    }
}
