//! Diagnostic and imaging orders — the narrower instances of the
//! ordered → in-progress → completed/reported → verified pattern.

use chrono::Utc;
use uuid::Uuid;

use hms_schemas::{
    Actor, DiagnosticOrder, DiagnosticOrderStatus, DomainEvent, EncounterStatus, EntityKind,
    ImagingOrder, ImagingOrderStatus, TransitionPayload, UrgencyLevel,
};
use hms_store::HospitalState;

use crate::engine::{require_edge, require_version, Committed};
use crate::error::TransitionError;

fn require_open_encounter(
    state: &HospitalState,
    encounter_id: Uuid,
    what: &str,
) -> Result<Uuid, TransitionError> {
    let Some(encounter) = state.encounters.get(&encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
        });
    };
    if matches!(
        encounter.status,
        EncounterStatus::Finished | EncounterStatus::Cancelled
    ) {
        return Err(TransitionError::OpenDependency {
            kind: EntityKind::Encounter,
            entity_id: encounter_id,
            detail: format!(
                "encounter is {}; {what} cannot be ordered",
                encounter.status.as_code()
            ),
        });
    }
    Ok(encounter.patient_id)
}

// ---------------------------------------------------------------------------
// Diagnostic orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewDiagnosticOrder {
    pub encounter_id: Uuid,
    pub procedure_name: String,
    pub urgency: UrgencyLevel,
}

pub fn order_diagnostic(
    state: &mut HospitalState,
    req: NewDiagnosticOrder,
    actor: Actor,
) -> Result<Committed<DiagnosticOrder>, TransitionError> {
    let patient_id = require_open_encounter(state, req.encounter_id, "diagnostics")?;

    let now = Utc::now();
    let order = DiagnosticOrder {
        id: Uuid::new_v4(),
        encounter_id: req.encounter_id,
        patient_id,
        procedure_name: req.procedure_name,
        urgency: req.urgency,
        status: DiagnosticOrderStatus::Ordered,
        findings: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::DiagnosticOrder,
        order.id,
        order.status.as_code(),
        actor,
        now,
    );
    state.diagnostic_orders.insert(order.id, order.clone());
    Ok(Committed::new(order, vec![event]))
}

pub fn diagnostic_transition(
    state: &mut HospitalState,
    order_id: Uuid,
    target: DiagnosticOrderStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<DiagnosticOrder>, TransitionError> {
    let Some(order) = state.diagnostic_orders.get_mut(&order_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::DiagnosticOrder,
            entity_id: order_id,
        });
    };

    let from = order.status;
    require_edge(order_id, from, target, actor, payload)?;
    require_version(
        EntityKind::DiagnosticOrder,
        order_id,
        caller_version,
        order.version,
    )?;

    let now = Utc::now();
    order.status = target;
    match target {
        DiagnosticOrderStatus::Completed => order.findings = payload.result_value.clone(),
        DiagnosticOrderStatus::Cancelled => order.cancellation_reason = payload.reason.clone(),
        _ => {}
    }
    order.updated_at = now;
    order.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::DiagnosticOrder,
        order_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(order.clone(), vec![event]))
}

// ---------------------------------------------------------------------------
// Imaging orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewImagingOrder {
    pub encounter_id: Uuid,
    pub modality: String,
    pub body_site: String,
    pub urgency: UrgencyLevel,
}

pub fn order_imaging(
    state: &mut HospitalState,
    req: NewImagingOrder,
    actor: Actor,
) -> Result<Committed<ImagingOrder>, TransitionError> {
    let patient_id = require_open_encounter(state, req.encounter_id, "imaging")?;

    let now = Utc::now();
    let order = ImagingOrder {
        id: Uuid::new_v4(),
        encounter_id: req.encounter_id,
        patient_id,
        modality: req.modality,
        body_site: req.body_site,
        urgency: req.urgency,
        status: ImagingOrderStatus::Ordered,
        report_text: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        version: 0,
    };
    let event = DomainEvent::created(
        EntityKind::ImagingOrder,
        order.id,
        order.status.as_code(),
        actor,
        now,
    );
    state.imaging_orders.insert(order.id, order.clone());
    Ok(Committed::new(order, vec![event]))
}

pub fn imaging_transition(
    state: &mut HospitalState,
    order_id: Uuid,
    target: ImagingOrderStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<ImagingOrder>, TransitionError> {
    let Some(order) = state.imaging_orders.get_mut(&order_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::ImagingOrder,
            entity_id: order_id,
        });
    };

    let from = order.status;
    require_edge(order_id, from, target, actor, payload)?;
    require_version(
        EntityKind::ImagingOrder,
        order_id,
        caller_version,
        order.version,
    )?;

    let now = Utc::now();
    order.status = target;
    match target {
        ImagingOrderStatus::Reported => order.report_text = payload.result_value.clone(),
        ImagingOrderStatus::Cancelled => order.cancellation_reason = payload.reason.clone(),
        _ => {}
    }
    order.updated_at = now;
    order.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::ImagingOrder,
        order_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(order.clone(), vec![event]))
}
