use chrono::Utc;
use uuid::Uuid;

use hms_schemas::{
    Actor, DomainEvent, EncounterStatus, EntityKind, MedicationOrder, MedicationOrderGroup,
    MedicationOrderStatus, TransitionPayload,
};
use hms_store::HospitalState;

use crate::engine::{require_edge, require_version, Committed};
use crate::error::TransitionError;

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewMedicationOrder {
    pub drug_name: String,
    pub dose: String,
    pub route: String,
    pub frequency: String,
}

#[derive(Debug, Clone)]
pub struct NewOrderGroup {
    pub encounter_id: Uuid,
    pub stay_id: Option<Uuid>,
    pub orders: Vec<NewMedicationOrder>,
}

/// The group plus its orders, as placed.
#[derive(Debug, Clone)]
pub struct PlacedOrderGroup {
    pub group: MedicationOrderGroup,
    pub orders: Vec<MedicationOrder>,
}

/// Place a medication order group. Orders start Pending.
///
/// The encounter must still be open — placing orders against a finished or
/// cancelled encounter is a cross-entity violation, not a not-found.
pub fn place_order_group(
    state: &mut HospitalState,
    req: NewOrderGroup,
    actor: Actor,
) -> Result<Committed<PlacedOrderGroup>, TransitionError> {
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
                "encounter is {}; medication orders cannot be placed",
                encounter.status.as_code()
            ),
        });
    }

    let now = Utc::now();
    let group = MedicationOrderGroup {
        id: Uuid::new_v4(),
        encounter_id: req.encounter_id,
        stay_id: req.stay_id,
        patient_id: encounter.patient_id,
        ordered_by: actor.actor_id,
        created_at: now,
    };

    let mut orders = Vec::with_capacity(req.orders.len());
    let mut events = Vec::with_capacity(req.orders.len());
    for item in req.orders {
        let order = MedicationOrder {
            id: Uuid::new_v4(),
            group_id: group.id,
            drug_name: item.drug_name,
            dose: item.dose,
            route: item.route,
            frequency: item.frequency,
            status: MedicationOrderStatus::Pending,
            hold_reason: None,
            resume_at: None,
            discontinue_reason: None,
            created_at: now,
            updated_at: now,
            version: 0,
        };
        events.push(DomainEvent::created(
            EntityKind::MedicationOrder,
            order.id,
            order.status.as_code(),
            actor,
            now,
        ));
        orders.push(order);
    }

    state.med_order_groups.insert(group.id, group.clone());
    for order in &orders {
        state.med_orders.insert(order.id, order.clone());
    }

    Ok(Committed::new(PlacedOrderGroup { group, orders }, events))
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

pub fn activate_order(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<MedicationOrder>, TransitionError> {
    order_transition(
        state,
        order_id,
        MedicationOrderStatus::Active,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

/// Hold an active order. Requires a reason; `resume_at` is optional.
pub fn hold_order(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<MedicationOrder>, TransitionError> {
    order_transition(
        state,
        order_id,
        MedicationOrderStatus::Held,
        actor,
        caller_version,
        payload,
    )
}

/// Resume a held order. The only legal back-transition in the graph.
pub fn resume_order(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<MedicationOrder>, TransitionError> {
    order_transition(
        state,
        order_id,
        MedicationOrderStatus::Active,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

/// Discontinue an order. Terminal; requires a reason.
pub fn discontinue_order(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<MedicationOrder>, TransitionError> {
    order_transition(
        state,
        order_id,
        MedicationOrderStatus::Discontinued,
        actor,
        caller_version,
        payload,
    )
}

pub fn complete_order(
    state: &mut HospitalState,
    order_id: Uuid,
    actor: Actor,
    caller_version: u64,
) -> Result<Committed<MedicationOrder>, TransitionError> {
    order_transition(
        state,
        order_id,
        MedicationOrderStatus::Completed,
        actor,
        caller_version,
        &TransitionPayload::default(),
    )
}

fn order_transition(
    state: &mut HospitalState,
    order_id: Uuid,
    target: MedicationOrderStatus,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<MedicationOrder>, TransitionError> {
    let Some(order) = state.med_orders.get_mut(&order_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::MedicationOrder,
            entity_id: order_id,
        });
    };

    let from = order.status;
    require_edge(order_id, from, target, actor, payload)?;
    require_version(
        EntityKind::MedicationOrder,
        order_id,
        caller_version,
        order.version,
    )?;

    let now = Utc::now();
    order.status = target;
    match target {
        MedicationOrderStatus::Held => {
            order.hold_reason = payload.reason.clone();
            order.resume_at = payload.resume_at;
        }
        MedicationOrderStatus::Active => {
            // Resuming (or first activation) clears any hold bookkeeping.
            order.hold_reason = None;
            order.resume_at = None;
        }
        MedicationOrderStatus::Discontinued => {
            order.discontinue_reason = payload.reason.clone();
        }
        _ => {}
    }
    order.updated_at = now;
    order.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::MedicationOrder,
        order_id,
        from.as_code(),
        target.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(order.clone(), vec![event]))
}
