//! Shared transition machinery.
//!
//! Every named operation in [`crate::ops`] funnels through the checks here,
//! in a fixed order: existence → (idempotency, where documented) → edge
//! membership → role authorization → required fields → optimistic version →
//! cross-entity guards. Only after the full chain passes does an op write
//! anything, so a failed request leaves the store untouched.

use hms_registry::{Lifecycle, TransitionEdge};
use hms_schemas::{Actor, DomainEvent, EntityKind, TransitionPayload};
use uuid::Uuid;

use hms_consistency::GuardBreach;

use crate::error::TransitionError;

// ---------------------------------------------------------------------------
// Committed
// ---------------------------------------------------------------------------

/// A successfully committed operation: the full updated snapshot plus the
/// domain events it produced (one per transition, one per creation).
#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub snapshot: T,
    pub events: Vec<DomainEvent>,
}

impl<T> Committed<T> {
    pub fn new(snapshot: T, events: Vec<DomainEvent>) -> Self {
        Self { snapshot, events }
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Resolve the registry edge for `current -> target`, then authorize the
/// actor and validate the payload against the edge's required fields.
pub(crate) fn require_edge<S: Lifecycle>(
    entity_id: Uuid,
    current: S,
    target: S,
    actor: Actor,
    payload: &TransitionPayload,
) -> Result<&'static TransitionEdge<S>, TransitionError> {
    let Some(edge) = current.edge_to(target) else {
        return Err(TransitionError::InvalidTransition {
            kind: S::KIND,
            entity_id,
            from: current.code().to_string(),
            to: target.code().to_string(),
        });
    };

    if !edge.permits(actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: S::KIND,
            entity_id,
            required: edge.roles,
            actual: actor.role,
        });
    }

    for field in edge.required_fields {
        if !payload.supplies(*field) {
            return Err(TransitionError::MissingField { field: *field });
        }
    }

    Ok(edge)
}

/// Optimistic version check: the caller must have read the version it is
/// transitioning from.
pub(crate) fn require_version(
    kind: EntityKind,
    entity_id: Uuid,
    caller_read: u64,
    stored: u64,
) -> Result<(), TransitionError> {
    hms_store::check_version(caller_read, stored).map_err(|(expected, actual)| {
        TransitionError::VersionConflict {
            kind,
            entity_id,
            expected,
            actual,
        }
    })
}

/// Translate a blocked consistency guard into the error surface.
pub(crate) fn breach_to_error(kind: EntityKind, breach: GuardBreach) -> TransitionError {
    match breach {
        GuardBreach::OpenMedicationOrders {
            entity_id,
            open_count,
        } => TransitionError::OpenDependency {
            kind,
            entity_id,
            detail: format!("{open_count} medication order(s) still require action"),
        },
        GuardBreach::IncompleteDischargePlan { entity_id } => TransitionError::OpenDependency {
            kind,
            entity_id,
            detail: "supplied discharge plan is incomplete".to_string(),
        },
        GuardBreach::DuplicateInvoice {
            existing_invoice_id,
        } => TransitionError::DuplicateInvoice {
            existing_invoice_id,
        },
    }
}
