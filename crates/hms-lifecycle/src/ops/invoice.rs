use chrono::Utc;
use uuid::Uuid;

use hms_billing::payment_status;
use hms_consistency::{check_invoice_generation, GuardVerdict};
use hms_schemas::{
    Actor, DomainEvent, EntityKind, FieldName, Invoice, InvoiceLineItem, InvoiceStatus, Role,
    TransitionPayload,
};
use hms_store::HospitalState;

use crate::engine::{breach_to_error, require_edge, require_version, Committed};
use crate::error::TransitionError;

/// Roles that may generate invoices and record payments.
const BILLING_STAFF: &[Role] = &[Role::Cashier, Role::Receptionist, Role::Admin];

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GenerateInvoice {
    pub encounter_id: Uuid,
    pub line_items: Vec<InvoiceLineItem>,
    /// Insurance coverage in basis points (10_000 = fully covered).
    pub coverage_bps: u32,
}

/// Generate the invoice for an encounter.
///
/// At most one non-cancelled invoice may exist per encounter; regeneration
/// after a cancellation creates a fresh id and leaves the cancelled record
/// in place for audit.
pub fn generate_invoice(
    state: &mut HospitalState,
    req: GenerateInvoice,
    actor: Actor,
) -> Result<Committed<Invoice>, TransitionError> {
    if !BILLING_STAFF.contains(&actor.role) {
        return Err(TransitionError::Unauthorized {
            kind: EntityKind::Invoice,
            entity_id: req.encounter_id,
            required: BILLING_STAFF,
            actual: actor.role,
        });
    }

    let Some(encounter) = state.encounters.get(&req.encounter_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Encounter,
            entity_id: req.encounter_id,
        });
    };
    let patient_id = encounter.patient_id;

    if let GuardVerdict::Blocked { breach } = check_invoice_generation(state, req.encounter_id) {
        return Err(breach_to_error(EntityKind::Invoice, breach));
    }

    let now = Utc::now();
    let invoice = hms_billing::build_invoice(
        req.encounter_id,
        patient_id,
        req.line_items,
        req.coverage_bps,
        now,
    );
    let event = DomainEvent::created(
        EntityKind::Invoice,
        invoice.id,
        invoice.status.as_code(),
        actor,
        now,
    );
    state.invoices.insert(invoice.id, invoice.clone());
    Ok(Committed::new(invoice, vec![event]))
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// Record a payment against the patient share.
///
/// The resulting status is derived from payments-to-date; a payment that
/// leaves the invoice Partial records the cash without emitting a
/// transition event (no status changed).
pub fn record_payment(
    state: &mut HospitalState,
    invoice_id: Uuid,
    actor: Actor,
    caller_version: u64,
    amount_cents: i64,
) -> Result<Committed<Invoice>, TransitionError> {
    if amount_cents <= 0 {
        return Err(TransitionError::MissingField {
            field: FieldName::Amount,
        });
    }

    let Some(invoice) = state.invoices.get_mut(&invoice_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Invoice,
            entity_id: invoice_id,
        });
    };

    let from = invoice.status;
    let new_paid = invoice.paid_cents.saturating_add(amount_cents);
    let target = payment_status(invoice.patient_share_cents, new_paid);

    if target != from {
        require_edge(
            invoice_id,
            from,
            target,
            actor,
            &TransitionPayload::default(),
        )?;
    } else {
        // Only a Partial invoice can absorb a payment without changing
        // status; a fully paid invoice takes no further payments.
        if from != InvoiceStatus::Partial {
            return Err(TransitionError::InvalidTransition {
                kind: EntityKind::Invoice,
                entity_id: invoice_id,
                from: from.as_code().to_string(),
                to: target.as_code().to_string(),
            });
        }
        if !BILLING_STAFF.contains(&actor.role) {
            return Err(TransitionError::Unauthorized {
                kind: EntityKind::Invoice,
                entity_id: invoice_id,
                required: BILLING_STAFF,
                actual: actor.role,
            });
        }
    }
    require_version(EntityKind::Invoice, invoice_id, caller_version, invoice.version)?;

    let now = Utc::now();
    invoice.paid_cents = new_paid;
    invoice.status = target;
    invoice.updated_at = now;
    invoice.version += 1;

    let events = if target != from {
        vec![DomainEvent::transitioned(
            EntityKind::Invoice,
            invoice_id,
            from.as_code(),
            target.as_code(),
            actor,
            now,
        )]
    } else {
        Vec::new()
    };
    Ok(Committed::new(invoice.clone(), events))
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

pub fn cancel_invoice(
    state: &mut HospitalState,
    invoice_id: Uuid,
    actor: Actor,
    caller_version: u64,
    payload: &TransitionPayload,
) -> Result<Committed<Invoice>, TransitionError> {
    let Some(invoice) = state.invoices.get_mut(&invoice_id) else {
        return Err(TransitionError::NotFound {
            kind: EntityKind::Invoice,
            entity_id: invoice_id,
        });
    };

    let from = invoice.status;
    require_edge(invoice_id, from, InvoiceStatus::Cancelled, actor, payload)?;
    require_version(EntityKind::Invoice, invoice_id, caller_version, invoice.version)?;

    let now = Utc::now();
    invoice.status = InvoiceStatus::Cancelled;
    invoice.cancellation_reason = payload.reason.clone();
    invoice.updated_at = now;
    invoice.version += 1;

    let event = DomainEvent::transitioned(
        EntityKind::Invoice,
        invoice_id,
        from.as_code(),
        InvoiceStatus::Cancelled.as_code(),
        actor,
        now,
    );
    Ok(Committed::new(invoice.clone(), vec![event]))
}
