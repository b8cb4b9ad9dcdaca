use chrono::Utc;
use uuid::Uuid;

use hms_schemas::{
    Actor, DomainEvent, EncounterStatus, EntityKind, LabTestOrder, LabTestOrderStatus,
    TransitionPayload, UrgencyLevel,
};
use hms_store::HospitalState;

use crate::engine::{require_edge, require_version, Committed};
use crate::error::TransitionError;

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewLabOrder {
    pub encounter_id: Uuid,
    pub test_code: String,
    pub test_name: String,
    pub urgency: UrgencyLevel,
    pub reference_range: Option<String>,
}

pub fn order_lab_test(
    state: &mut HospitalState,
    req: NewLabOrder,
    actor: Actor,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    let Some(encounter) = state.encounters.get(&req.encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
        });
    };
    if matches!(
        encounter.status,
        EncounterStatus::Finished | EncounterStatus::Cancelled
    ) {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
            detail: format!(
                "encounter is {}; lab tests cannot be ordered",
                encounter.status.as_code()
            ),
        });
    }

    let now = Utc::now();
    let order = LabTestOrder {
        id: Uuid::new_v4(),
        encounter_id: req.encounter_id,
        patient_id: encounter.patient_id,
        test_code: req.test_code,
        test_name: req.test_name,
        urgency: req.urgency,
        status: LabTestOrderStatus::Ordered,
        specimen_collected_at: None,
        specimen_received_at: None,
        result_value: None,
        reference_range: req.reference_range,
        rejection_reason: None,
        verified_by: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::LabTestOrder,
        order.id,
        order.status.as_code(),
        actor,
        now,
    );
    state.lab_orders.insert(order.id, order.clone());
    Ok(Committed::new(order, vec![event]))
}

// ---------------------------------------------------------------------------
// Specimen workflow
// ---------------------------------------------------------------------------

pub fn collect_specimen(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    lab_transition(
        state,
        order_id,
        LabTestOrderStatus::Collected,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

pub fn receive_specimen(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    lab_transition(
        state,
        order_id,
        LabTestOrderStatus::Received,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

pub fn start_processing(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    lab_transition(
        state,
        order_id,
        LabTestOrderStatus::InProgress,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

/// Enter the result. Requires a result value.
pub fn complete_result(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    lab_transition(
        state,
        order_id,
        LabTestOrderStatus::Completed,
        actor,
        caller_version,
        payload,
    )
}

pub fn verify_result(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    lab_transition(
        state,
        order_id,
        LabTestOrderStatus::Verified,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

/// Reject the specimen. Legal from any pre-completion status and always
/// requires a reason.
pub fn reject_specimen(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    lab_transition(
        state,
        order_id,
        LabTestOrderStatus::Rejected,
        actor,
        caller_version,
        payload,
    )
}

fn lab_transition(
    state: &mut HospitalState,
    order_id: Uuid,
    target: LabTestOrderStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<LabTestOrder>, TransitionError> {
    let Some(order) = state.lab_orders.get_mut(&order_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::LabTestOrder,
            entity_id: order_id,
        });
    };

    let from = order.status;
    require_edge(order_id, from, target, actor, payload)?;
    require_version(
        EntityKind::LabTestOrder,
        order_id,
        caller_version,
        order.version,
    )?;

    let now = Utc::now();
    order.status = target;
    match target {
        LabTestOrderStatus::Collected => order.specimen_collected_at = Some(now),
        LabTestOrderStatus::Received => order.specimen_received_at = Some(now),
        LabTestOrderStatus::Completed => order.result_value = payload.result_value.clone(),
        LabTestOrderStatus::Verified => order.verified_by = Some(actor.actor_id),
        LabTestOrderStatus::Rejected => order.rejection_reason = payload.reason.clone(),
        _ => {}
    }
    order.updated_at = now;
    order.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::LabTestOrder,
        order_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(order.clone(), vec![event]))
}
