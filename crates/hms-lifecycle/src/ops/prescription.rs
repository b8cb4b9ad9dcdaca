use chrono::Utc;
use uuid::Uuid;

use hms_schemas::{
    Actor, DomainEvent, EncounterStatus, EntityKind, Prescription, PrescriptionLine,
    PrescriptionStatus, Role, TransitionPayload,
};
use hms_store::HospitalState;

use crate::engine::{require_edge, require_version, Committed};
use crate::error::TransitionError;

const PRESCRIBERS: &[Role] = &[Role::Doctor];

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub encounter_id: Uuid,
    pub lines: Vec<PrescriptionLine>,
}

pub fn issue_prescription(
    state: &mut HospitalState,
    req: NewPrescription,
    actor: Actor,
) -> Result<Committed<Prescription>, TransitionError> {
    if !PRESCRIBERS.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::Prescription,
            entity_id: req.encounter_id,
            required: PRESCRIBERS,
            actual: actor.role,
        });
    }
    let Some(encounter) = state.encounters.get(&req.encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
        });
    };
    if encounter.status == EncounterStatus::Cancelled {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
            detail: "encounter is CANCELLED; prescriptions cannot be issued".to_string(),
        });
    }

    let now = Utc::now();
    let prescription = Prescription {
        id: Uuid::new_v4(),
        encounter_id: req.encounter_id,
        patient_id: encounter.patient_id,
        prescribed_by: actor.actor_id,
        lines: req.lines,
        status: PrescriptionStatus::Issued,
        cancellation_reason: None,
        dispensed_by: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::Prescription,
        prescription.id,
        prescription.status.as_code(),
        actor,
        now,
    );
    state.prescriptions.insert(prescription.id, prescription.clone());
    Ok(Committed::new(prescription, vec![event]))
}

pub fn dispense_prescription(
    state: &mut HospitalState,
    prescription_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<Prescription>, TransitionError> {
    prescription_transition(
        state,
        prescription_id,
        PrescriptionStatus::Dispensed,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

pub fn cancel_prescription(
    state: &mut HospitalState,
    prescription_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<Prescription>, TransitionError> {
    prescription_transition(
        state,
        prescription_id,
        PrescriptionStatus::Cancelled,
        actor,
        caller_version,
        payload,
    )
}

fn prescription_transition(
    state: &mut HospitalState,
    prescription_id: Uuid,
    target: PrescriptionStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<Prescription>, TransitionError> {
    let Some(rx) = state.prescriptions.get_mut(&prescription_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Prescription,
            entity_id: prescription_id,
        });
    };

    let from = rx.status;
    require_edge(prescription_id, from, target, actor, payload)?;
    require_version(
        EntityKind::Prescription,
        prescription_id,
        caller_version,
        rx.version,
    )?;

    let now = Utc::now();
    rx.status = target;
    match target {
        PrescriptionStatus::Dispensed => rx.dispensed_by = Some(actor.actor_id),
        PrescriptionStatus::Cancelled => rx.cancellation_reason = payload.reason.clone(),
        _ => {}
    }
    rx.updated_at = now;
    rx.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::Prescription,
        prescription_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(rx.clone(), vec![event]))
}
