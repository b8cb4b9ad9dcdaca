//! Transition tables for every registered entity type.
//!
//! Role sets are shared consts so the same shorthand reads consistently
//! across tables. Field requirements are validated by the engine on every
//! request — a terminal transition always re-states its reason requirement
//! here even though the UI runs its own confirmation dialog.

use hms_schemas::{
    BookingStatus, DiagnosticOrderStatus, EncounterStatus, EntityKind, FieldName,
    ImagingOrderStatus, InpatientStayStatus, InvoiceStatus, LabTestOrderStatus,
    MedicationOrderStatus, PrescriptionStatus, Role,
};

use crate::{Lifecycle, TransitionEdge};

// ---------------------------------------------------------------------------
// Role-set shorthands
// ---------------------------------------------------------------------------

const FRONT_DESK: &[Role] = &[Role::Receptionist, Role::Admin];
const DESK_OR_DOCTOR: &[Role] = &[Role::Receptionist, Role::Doctor, Role::Admin];
const CLINICAL: &[Role] = &[Role::Doctor, Role::Nurse];
const DOCTOR_ONLY: &[Role] = &[Role::Doctor];
const PRESCRIBERS: &[Role] = &[Role::Doctor, Role::Pharmacist];
const MED_ADMIN: &[Role] = &[Role::Doctor, Role::Nurse, Role::Pharmacist];
const CASHIERS: &[Role] = &[Role::Cashier, Role::Receptionist, Role::Admin];
const BILLING_VOID: &[Role] = &[Role::Cashier, Role::Admin];
const LAB: &[Role] = &[Role::LabTechnician];
const LAB_INTAKE: &[Role] = &[Role::LabTechnician, Role::Nurse];
const LAB_VERIFY: &[Role] = &[Role::LabTechnician, Role::Doctor];
const RADIOLOGY: &[Role] = &[Role::Radiologist];
const RADIOLOGY_VERIFY: &[Role] = &[Role::Radiologist, Role::Doctor];
const RADIOLOGY_VOID: &[Role] = &[Role::Radiologist, Role::Doctor];

const NO_FIELDS: &[FieldName] = &[];
const REASON: &[FieldName] = &[FieldName::Reason];
const DISPOSITION: &[FieldName] = &[FieldName::Disposition];
const RESULT: &[FieldName] = &[FieldName::ResultValue];

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

impl Lifecycle for BookingStatus {
    const KIND: EntityKind = EntityKind::Booking;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            BookingStatus::Pending => &[
                TransitionEdge {
                    to: BookingStatus::Confirmed,
                    roles: FRONT_DESK,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: BookingStatus::Cancelled,
                    roles: FRONT_DESK,
                    required_fields: REASON,
                },
            ],
            BookingStatus::Confirmed => &[
                TransitionEdge {
                    to: BookingStatus::Cancelled,
                    roles: FRONT_DESK,
                    required_fields: REASON,
                },
                TransitionEdge {
                    to: BookingStatus::NoShow,
                    roles: FRONT_DESK,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: BookingStatus::Completed,
                    roles: DESK_OR_DOCTOR,
                    required_fields: NO_FIELDS,
                },
            ],
            BookingStatus::Cancelled | BookingStatus::NoShow | BookingStatus::Completed => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Encounter
// ---------------------------------------------------------------------------

impl Lifecycle for EncounterStatus {
    const KIND: EntityKind = EntityKind::Encounter;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            EncounterStatus::Planned => &[
                TransitionEdge {
                    to: EncounterStatus::Arrived,
                    roles: &[Role::Receptionist, Role::Nurse, Role::Admin],
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: EncounterStatus::Cancelled,
                    roles: DESK_OR_DOCTOR,
                    required_fields: REASON,
                },
            ],
            // Discharge straight from Arrived is legal: a short visit may
            // never pass through InProgress.
            EncounterStatus::Arrived => &[
                TransitionEdge {
                    to: EncounterStatus::InProgress,
                    roles: CLINICAL,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: EncounterStatus::Finished,
                    roles: DOCTOR_ONLY,
                    required_fields: DISPOSITION,
                },
                TransitionEdge {
                    to: EncounterStatus::Cancelled,
                    roles: DESK_OR_DOCTOR,
                    required_fields: REASON,
                },
            ],
            EncounterStatus::InProgress => &[
                TransitionEdge {
                    to: EncounterStatus::Finished,
                    roles: DOCTOR_ONLY,
                    required_fields: DISPOSITION,
                },
                TransitionEdge {
                    to: EncounterStatus::Cancelled,
                    roles: &[Role::Doctor, Role::Admin],
                    required_fields: REASON,
                },
            ],
            EncounterStatus::Finished | EncounterStatus::Cancelled => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Medication orders
// ---------------------------------------------------------------------------

impl Lifecycle for MedicationOrderStatus {
    const KIND: EntityKind = EntityKind::MedicationOrder;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            MedicationOrderStatus::Pending => &[
                TransitionEdge {
                    to: MedicationOrderStatus::Active,
                    roles: PRESCRIBERS,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: MedicationOrderStatus::Discontinued,
                    roles: PRESCRIBERS,
                    required_fields: REASON,
                },
            ],
            MedicationOrderStatus::Active => &[
                TransitionEdge {
                    to: MedicationOrderStatus::Held,
                    roles: MED_ADMIN,
                    required_fields: REASON,
                },
                TransitionEdge {
                    to: MedicationOrderStatus::Completed,
                    roles: CLINICAL,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: MedicationOrderStatus::Discontinued,
                    roles: PRESCRIBERS,
                    required_fields: REASON,
                },
            ],
            MedicationOrderStatus::Held => &[
                TransitionEdge {
                    to: MedicationOrderStatus::Active,
                    roles: MED_ADMIN,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: MedicationOrderStatus::Discontinued,
                    roles: PRESCRIBERS,
                    required_fields: REASON,
                },
            ],
            MedicationOrderStatus::Discontinued | MedicationOrderStatus::Completed => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Inpatient stay
// ---------------------------------------------------------------------------

impl Lifecycle for InpatientStayStatus {
    const KIND: EntityKind = EntityKind::InpatientStay;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            InpatientStayStatus::Admitted => &[
                TransitionEdge {
                    to: InpatientStayStatus::Discharged,
                    roles: DOCTOR_ONLY,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: InpatientStayStatus::Transferred,
                    roles: DOCTOR_ONLY,
                    required_fields: REASON,
                },
            ],
            InpatientStayStatus::Discharged | InpatientStayStatus::Transferred => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Invoice
// ---------------------------------------------------------------------------

impl Lifecycle for InvoiceStatus {
    const KIND: EntityKind = EntityKind::Invoice;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            InvoiceStatus::Pending => &[
                TransitionEdge {
                    to: InvoiceStatus::Partial,
                    roles: CASHIERS,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: InvoiceStatus::Paid,
                    roles: CASHIERS,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: InvoiceStatus::Cancelled,
                    roles: BILLING_VOID,
                    required_fields: REASON,
                },
            ],
            InvoiceStatus::Partial => &[
                TransitionEdge {
                    to: InvoiceStatus::Paid,
                    roles: CASHIERS,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: InvoiceStatus::Cancelled,
                    roles: BILLING_VOID,
                    required_fields: REASON,
                },
            ],
            InvoiceStatus::Paid | InvoiceStatus::Cancelled => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Lab test orders — specimen workflow
// ---------------------------------------------------------------------------

impl Lifecycle for LabTestOrderStatus {
    const KIND: EntityKind = EntityKind::LabTestOrder;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            LabTestOrderStatus::Ordered => &[
                TransitionEdge {
                    to: LabTestOrderStatus::Collected,
                    roles: LAB_INTAKE,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: LabTestOrderStatus::Rejected,
                    roles: LAB,
                    required_fields: REASON,
                },
            ],
            // Received strictly follows Collected — there is no
            // Ordered -> Received shortcut.
            LabTestOrderStatus::Collected => &[
                TransitionEdge {
                    to: LabTestOrderStatus::Received,
                    roles: LAB,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: LabTestOrderStatus::Rejected,
                    roles: LAB,
                    required_fields: REASON,
                },
            ],
            LabTestOrderStatus::Received => &[
                TransitionEdge {
                    to: LabTestOrderStatus::InProgress,
                    roles: LAB,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: LabTestOrderStatus::Rejected,
                    roles: LAB,
                    required_fields: REASON,
                },
            ],
            LabTestOrderStatus::InProgress => &[
                TransitionEdge {
                    to: LabTestOrderStatus::Completed,
                    roles: LAB,
                    required_fields: RESULT,
                },
                TransitionEdge {
                    to: LabTestOrderStatus::Rejected,
                    roles: LAB,
                    required_fields: REASON,
                },
            ],
            LabTestOrderStatus::Completed => &[TransitionEdge {
                to: LabTestOrderStatus::Verified,
                roles: LAB_VERIFY,
                required_fields: NO_FIELDS,
            }],
            LabTestOrderStatus::Verified | LabTestOrderStatus::Rejected => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Diagnostic orders
// ---------------------------------------------------------------------------

impl Lifecycle for DiagnosticOrderStatus {
    const KIND: EntityKind = EntityKind::DiagnosticOrder;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            DiagnosticOrderStatus::Ordered => &[
                TransitionEdge {
                    to: DiagnosticOrderStatus::InProgress,
                    roles: LAB_INTAKE,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: DiagnosticOrderStatus::Cancelled,
                    roles: DOCTOR_ONLY,
                    required_fields: REASON,
                },
            ],
            DiagnosticOrderStatus::InProgress => &[
                TransitionEdge {
                    to: DiagnosticOrderStatus::Completed,
                    roles: LAB_VERIFY,
                    required_fields: RESULT,
                },
                TransitionEdge {
                    to: DiagnosticOrderStatus::Cancelled,
                    roles: DOCTOR_ONLY,
                    required_fields: REASON,
                },
            ],
            DiagnosticOrderStatus::Completed => &[TransitionEdge {
                to: DiagnosticOrderStatus::Verified,
                roles: DOCTOR_ONLY,
                required_fields: NO_FIELDS,
            }],
            DiagnosticOrderStatus::Verified | DiagnosticOrderStatus::Cancelled => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Imaging orders
// ---------------------------------------------------------------------------

impl Lifecycle for ImagingOrderStatus {
    const KIND: EntityKind = EntityKind::ImagingOrder;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            ImagingOrderStatus::Ordered => &[
                TransitionEdge {
                    to: ImagingOrderStatus::InProgress,
                    roles: RADIOLOGY,
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: ImagingOrderStatus::Cancelled,
                    roles: RADIOLOGY_VOID,
                    required_fields: REASON,
                },
            ],
            ImagingOrderStatus::InProgress => &[
                TransitionEdge {
                    to: ImagingOrderStatus::Reported,
                    roles: RADIOLOGY,
                    required_fields: RESULT,
                },
                TransitionEdge {
                    to: ImagingOrderStatus::Cancelled,
                    roles: RADIOLOGY_VOID,
                    required_fields: REASON,
                },
            ],
            ImagingOrderStatus::Reported => &[TransitionEdge {
                to: ImagingOrderStatus::Verified,
                roles: RADIOLOGY_VERIFY,
                required_fields: NO_FIELDS,
            }],
            ImagingOrderStatus::Verified | ImagingOrderStatus::Cancelled => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Prescriptions
// ---------------------------------------------------------------------------

impl Lifecycle for PrescriptionStatus {
    const KIND: EntityKind = EntityKind::Prescription;

    fn code(self) -> &'static str {
        self.as_code()
    }

    fn edges(self) -> &'static [TransitionEdge<Self>] {
        match self {
            PrescriptionStatus::Issued => &[
                TransitionEdge {
                    to: PrescriptionStatus::Dispensed,
                    roles: &[Role::Pharmacist],
                    required_fields: NO_FIELDS,
                },
                TransitionEdge {
                    to: PrescriptionStatus::Cancelled,
                    roles: DOCTOR_ONLY,
                    required_fields: REASON,
                },
            ],
            PrescriptionStatus::Dispensed | PrescriptionStatus::Cancelled => &[],
        }
    }
}
