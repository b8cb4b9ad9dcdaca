use chrono::Utc;
use uuid::Uuid;

use hms_consistency::{check_stay_discharge, GuardVerdict};
use hms_schemas::{
    Actor, DischargePlan, DomainEvent, EncounterStatus, EntityKind, FieldName, InpatientStay,
    InpatientStayStatus, Role, TransitionPayload,
};
use hms_store::HospitalState;

use crate::engine::{breach_to_error, require_edge, require_version, Committed};
use crate::error::TransitionError;

/// Roles that may admit patients and file discharge plans.
const WARD_STAFF: &[Role] = &[Role::Doctor, Role::Nurse];

// ---------------------------------------------------------------------------
// Admission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewStay {
    pub encounter_id: Uuid,
    pub ward: String,
    pub bed: String,
}

/// Admit a patient. The encounter must be checked in and still open, and
/// an encounter can carry at most one stay.
pub fn admit(
    state: &mut HospitalState,
    req: NewStay,
    actor: Actor,
) -> Result<Committed<InpatientStay>, TransitionError> {
    if !WARD_STAFF.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::InpatientStay,
            entity_id: req.encounter_id,
            required: WARD_STAFF,
            actual: actor.role,
        });
    }

    let Some(encounter) = state.encounters.get(&req.encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
        });
    };
    if !matches!(
        encounter.status,
        EncounterStatus::Arrived | EncounterStatus::InProgress
    ) {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
            detail: format!(
                "encounter is {}; admission requires a checked-in encounter",
                encounter.status.as_code()
            ),
        });
    }
    if let Some(existing) = state.stay_for_encounter(req.encounter_id) {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::InpatientStay,
            entity_id: existing.id,
            detail: "encounter already has an inpatient stay".to_string(),
        });
    }

    let now = Utc::now();
    let stay = InpatientStay {
        id: Uuid::new_v4(),
        encounter_id: req.encounter_id,
        patient_id: encounter.patient_id,
        ward: req.ward,
        bed: req.bed,
        status: InpatientStayStatus::Admitted,
        admitted_at: now,
        discharged_at: None,
        transfer_reason: None,
        discharge_plan: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::InpatientStay,
        stay.id,
        stay.status.as_code(),
        actor,
        now,
    );
    state.stays.insert(stay.id, stay.clone());
    Ok(Committed::new(stay, vec![event]))
}

// ---------------------------------------------------------------------------
// Discharge planning
// ---------------------------------------------------------------------------

/// File (or replace) the discharge plan for an admitted stay. All four
/// sections are mandatory — an incomplete plan is rejected outright rather
/// than stored partially.
pub fn file_discharge_plan(
    state: &mut HospitalState,
    stay_id: Uuid,
    actor: Actor,
    caller_version: u64,
    plan: DischargePlan,
) -> Result<Committed<InpatientStay>, TransitionError> {
    if !WARD_STAFF.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::InpatientStay,
            entity_id: stay_id,
            required: WARD_STAFF,
            actual: actor.role,
        });
    }
    if !plan.is_complete() {
        return Err(TransitionError::MissingField {
            field: FieldName::DischargePlan,
        });
    }

    let Some(stay) = state.stays.get_mut(&stay_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::InpatientStay,
            entity_id: stay_id,
        });
    };
    if stay.status != InpatientStayStatus::Admitted {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::InpatientStay,
            entity_id: stay_id,
            detail: format!(
                "stay is {}; discharge planning applies to admitted stays",
                stay.status.as_code()
            ),
        });
    }
    require_version(EntityKind::InpatientStay, stay_id, caller_version, stay.version)?;

    stay.discharge_plan = Some(plan);
    stay.updated_at = Utc::now();
    stay.version += 1;

    Ok(Committed::new(stay.clone(), Vec::new()))
}

// ---------------------------------------------------------------------------
// Discharge / transfer
// ---------------------------------------------------------------------------

/// Discharge a stay. Open medication orders placed for the stay block the
/// discharge unless a complete plan was filed (or supplied inline).
pub fn discharge_stay(
    state: &mut HospitalState,
    stay_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<InpatientStay>, TransitionError> {
    let not_found = TransitionError::NotFound {
        kind: EntityKind::InpatientStay,
        entity_id: stay_id,
    };
    let (from, stored_version) = match state.stays.get(&stay_id) {
        Some(s) => (s.status, s.version),
        None => return Err(not_found),
    };

    require_edge(
        stay_id,
        from,
        InpatientStayStatus::Discharged,
        actor,
        payload,
    )?;
    require_version(
        EntityKind::InpatientStay,
        stay_id,
        caller_version,
        stored_version,
    )?;

    if let GuardVerdict::Blocked { breach } =
        check_stay_discharge(state, stay_id, payload.discharge_plan.as_ref())
    {
        return Err(breach_to_error(EntityKind::InpatientStay, breach));
    }

    let now = Utc::now();
    let Some(stay) = state.stays.get_mut(&stay_id) else {
        return Err(not_found);
    };
    stay.status = InpatientStayStatus::Discharged;
    stay.discharged_at = Some(now);
    if stay.discharge_plan.is_none() {
        // An inline override plan becomes the stay's plan of record.
        stay.discharge_plan = payload.discharge_plan.clone();
    }
    stay.updated_at = now;
    stay.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::InpatientStay,
        stay_id,
        from.as_code(),
        InpatientStayStatus::Discharged.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(stay.clone(), vec![event]))
}

pub fn transfer_stay(
    state: &mut HospitalState,
    stay_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<InpatientStay>, TransitionError> {
    let Some(stay) = state.stays.get_mut(&stay_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::InpatientStay,
            entity_id: stay_id,
        });
    };

    let from = stay.status;
    require_edge(
        stay_id,
        from,
        InpatientStayStatus::Transferred,
        actor,
        payload,
    )?;
    require_version(EntityKind::InpatientStay, stay_id, caller_version, stay.version)?;

    let now = Utc::now();
    stay.status = InpatientStayStatus::Transferred;
    stay.transfer_reason = payload.reason.clone();
    stay.discharged_at = Some(now);
    stay.updated_at = now;
    stay.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::InpatientStay,
        stay_id,
        from.as_code(),
        InpatientStayStatus::Transferred.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(stay.clone(), vec![event]))
}
