use chrono::Utc;
use uuid::Uuid;

use hms_consistency::encounter_capabilities;
use hms_schemas::{
    Actor, DomainEvent, EmergencyDetails, Encounter, EncounterSnapshot, EncounterStatus,
    EncounterType, EntityKind, Role, TriageCategory,
};
use hms_store::HospitalState;

use crate::engine::{require_version, Committed};
use crate::error::TransitionError;

const ED_INTAKE: &[Role] = &[Role::Nurse, Role::Receptionist, Role::Doctor, Role::Admin];
const TRIAGE_STAFF: &[Role] = &[Role::Nurse, Role::Doctor];

// ---------------------------------------------------------------------------
// Arrival
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewEmergency {
    pub patient_id: Uuid,
    pub department_id: Uuid,
    pub triage_category: TriageCategory,
    /// Clamped to the 0–10 scale.
    pub pain_score: u8,
    pub life_threatening: bool,
    pub arrival_mode: String,
}

/// The emergency encounter plus its triage extension.
#[derive(Debug, Clone)]
pub struct EmergencyArrival {
    pub encounter: EncounterSnapshot,
    pub details: EmergencyDetails,
}

/// Register an ED arrival: an Emergency encounter (already Arrived — the
/// patient is physically present) plus its 1:1 triage extension.
pub fn emergency_arrival(
    state: &mut HospitalState,
    req: NewEmergency,
    actor: Actor,
) -> Result<Committed<EmergencyArrival>, TransitionError> {
    if !ED_INTAKE.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::Encounter,
            entity_id: req.patient_id,
            required: ED_INTAKE,
            actual: actor.role,
        });
    }

    let now = Utc::now();
    let encounter = Encounter {
        id: Uuid::new_v4(),
        booking_id: None,
        patient_id: req.patient_id,
        department_id: req.department_id,
        encounter_type: EncounterType::Emergency,
        status: EncounterStatus::Arrived,
        disposition: None,
        cancellation_reason: None,
        started_at: Some(now),
        ended_at: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let details = EmergencyDetails {
        encounter_id: encounter.id,
        triage_category: req.triage_category,
        pain_score: req.pain_score.min(10),
        life_threatening: req.life_threatening,
        arrival_mode: req.arrival_mode,
        arrived_at: now,
        assigned_staff_id: None,
        triaged_by: actor.actor_id,
        updated_at: now,
    };

    let event = DomainEvent::created(
        EntityKind::Encounter,
        encounter.id,
        encounter.status.as_code(),
        actor,
        now,
    );
    state.encounters.insert(encounter.id, encounter.clone());
    state.emergency.insert(encounter.id, details.clone());

    let capabilities = encounter_capabilities(state, &encounter);
    Ok(Committed::new(
        EmergencyArrival {
            encounter: EncounterSnapshot {
                encounter,
                capabilities,
            },
            details,
        },
        vec![event],
    ))
}

// ---------------------------------------------------------------------------
// Re-triage / assignment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Retriage {
    pub triage_category: TriageCategory,
    pub pain_score: u8,
    pub life_threatening: bool,
}

/// Update the triage assessment. Not a registry transition — triage is a
/// clinical reassessment, attributed via `triaged_by` — but it still takes
/// the encounter version so concurrent reassessments cannot clobber each
/// other.
pub fn retriage(
    state: &mut HospitalState,
    encounter_id: Uuid,
    actor: Actor,
    caller_version: u64,
    req: Retriage,
) -> Result<Committed<EmergencyDetails>, TransitionError> {
    if !TRIAGE_STAFF.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
            required: TRIAGE_STAFF,
            actual: actor.role,
        });
    }

    let (status, stored_version) = match state.encounters.get(&encounter_id) {
        Some(e) => (e.status, e.version),
        None => {
            return Err(TransitionError::NotFound {
                kind: EntityKind::Encounter,
                entity_id: encounter_id,
            })
        }
    };
    if matches!(
        status,
        EncounterStatus::Finished | EncounterStatus::Cancelled
    ) {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
            detail: format!("encounter is {}; triage is closed", status.as_code()),
        });
    }
    require_version(
        EntityKind::Encounter,
        encounter_id,
        caller_version,
        stored_version,
    )?;

    let Some(details) = state.emergency.get_mut(&encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
        });
    };
    let now = Utc::now();
    details.triage_category = req.triage_category;
    details.pain_score = req.pain_score.min(10);
    details.life_threatening = req.life_threatening;
    details.triaged_by = actor.actor_id;
    details.updated_at = now;
    let details = details.clone();

    if let Some(enc) = state.encounters.get_mut(&encounter_id) {
        enc.updated_at = now;
        enc.version += 1;
    }

    Ok(Committed::new(details, Vec::new()))
}

/// Assign (or reassign) the responsible staff member.
pub fn assign_staff(
    state: &mut HospitalState,
    encounter_id: Uuid,
    actor: Actor,
    staff_id: Uuid,
) -> Result<Committed<EmergencyDetails>, TransitionError> {
    if !TRIAGE_STAFF.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
            required: TRIAGE_STAFF,
            actual: actor.role,
        });
    }
    let Some(details) = state.emergency.get_mut(&encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
        });
    };
    details.assigned_staff_id = Some(staff_id);
    details.updated_at = Utc::now();
    Ok(Committed::new(details.clone(), Vec::new()))
}
