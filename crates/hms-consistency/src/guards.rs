use uuid::Uuid;

use hms_schemas::DischargePlan;
use hms_store::HospitalState;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Result of a cross-entity guard check.
///
/// The transition may not commit unless [`GuardVerdict::Permitted`] is
/// returned. A block is recoverable: the caller resolves the dependency or
/// supplies the documented override and retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Permitted,
    Blocked { breach: GuardBreach },
}

impl GuardVerdict {
    pub fn is_permitted(&self) -> bool {
        matches!(self, GuardVerdict::Permitted)
    }

    fn blocked(breach: GuardBreach) -> Self {
        GuardVerdict::Blocked { breach }
    }
}

/// Evidence for a blocked guard, carried into the error surface and the
/// audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardBreach {
    /// Medication orders still in Pending/Active block the discharge.
    OpenMedicationOrders { entity_id: Uuid, open_count: usize },
    /// A discharge plan was supplied as an override but one or more of its
    /// four mandatory sections is blank.
    IncompleteDischargePlan { entity_id: Uuid },
    /// A non-cancelled invoice already exists for the encounter.
    DuplicateInvoice { existing_invoice_id: Uuid },
}

// ---------------------------------------------------------------------------
// Discharge guards
// ---------------------------------------------------------------------------

/// Guard for Encounter→Finished.
///
/// Blocked while any linked medication order still requires action, unless
/// a complete discharge plan is supplied. The override never touches the
/// orders themselves — discharge must not silently discontinue anything.
pub fn check_encounter_discharge(
    state: &HospitalState,
    encounter_id: Uuid,
    override_plan: Option<&DischargePlan>,
) -> GuardVerdict {
    let open_count = state
        .med_orders_for_encounter(encounter_id)
        .iter()
        .filter(|o| o.status.requires_action())
        .count();

    discharge_verdict(encounter_id, open_count, override_plan)
}

/// Guard for InpatientStay→Discharged.
///
/// Same rule as the encounter guard, over the orders placed for the stay.
/// A plan already filed via discharge planning counts; a plan supplied
/// inline with the discharge request also counts.
pub fn check_stay_discharge(
    state: &HospitalState,
    stay_id: Uuid,
    inline_plan: Option<&DischargePlan>,
) -> GuardVerdict {
    let open_count = state
        .med_orders_for_stay(stay_id)
        .iter()
        .filter(|o| o.status.requires_action())
        .count();

    let filed_plan = state
        .stays
        .get(&stay_id)
        .and_then(|s| s.discharge_plan.as_ref());

    discharge_verdict(stay_id, open_count, inline_plan.or(filed_plan))
}

fn discharge_verdict(
    entity_id: Uuid,
    open_count: usize,
    plan: Option<&DischargePlan>,
) -> GuardVerdict {
    if open_count == 0 {
        return GuardVerdict::Permitted;
    }
    match plan {
        None => GuardVerdict::blocked(GuardBreach::OpenMedicationOrders {
            entity_id,
            open_count,
        }),
        Some(p) if !p.is_complete() => {
            GuardVerdict::blocked(GuardBreach::IncompleteDischargePlan { entity_id })
        }
        Some(_) => GuardVerdict::Permitted,
    }
}

// ---------------------------------------------------------------------------
// Invoice generation guard
// ---------------------------------------------------------------------------

/// At most one non-cancelled invoice per encounter. Regeneration is legal
/// only after the previous invoice was cancelled; the cancelled record is
/// preserved for audit.
pub fn check_invoice_generation(state: &HospitalState, encounter_id: Uuid) -> GuardVerdict {
    match state.open_invoice_for_encounter(encounter_id) {
        Some(existing) => GuardVerdict::blocked(GuardBreach::DuplicateInvoice {
            existing_invoice_id: existing.id,
        }),
        None => GuardVerdict::Permitted,
    }
}
