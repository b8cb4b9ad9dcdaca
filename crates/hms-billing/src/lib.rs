//! hms-billing
//!
//! Invoice aggregation: line-item totals, insurance coverage split and
//! payment-status derivation. Pure deterministic logic, no IO.
//!
//! All money is integer cents (`i64`). Intermediate sums run in `i128`
//! and clamp on the way back down so a pathological line item cannot wrap
//! a total. Coverage is expressed in basis points (10_000 = 100%) so the
//! split never touches floating point.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hms_schemas::{Invoice, InvoiceLineItem, InvoiceStatus};

/// 100% coverage in basis points.
pub const FULL_COVERAGE_BPS: u32 = 10_000;

fn i128_to_i64_clamp(x: i128) -> i64 {
    if x > i64::MAX as i128 {
        i64::MAX
    } else if x < i64::MIN as i128 {
        i64::MIN
    } else {
        x as i64
    }
}

// ---------------------------------------------------------------------------
// Totals and split
// ---------------------------------------------------------------------------

/// Sum of all line items in cents.
pub fn total_cents(items: &[InvoiceLineItem]) -> i64 {
    let sum: i128 = items
        .iter()
        .map(|it| (it.unit_price_cents as i128) * (it.quantity as i128))
        .sum();
    i128_to_i64_clamp(sum)
}

/// Split a total between insurer and patient at `coverage_bps` basis
/// points. The insurer share floors; the patient share absorbs the
/// remainder so the two always sum to `total`.
pub fn coverage_split(total: i64, coverage_bps: u32) -> (i64, i64) {
    let bps = coverage_bps.min(FULL_COVERAGE_BPS) as i128;
    let insurer = (total as i128) * bps / FULL_COVERAGE_BPS as i128;
    let insurer = i128_to_i64_clamp(insurer);
    (insurer, total - insurer)
}

/// Payment status implied by payments-to-date against the patient share.
///
/// A zero patient share (full coverage) is Paid immediately.
pub fn payment_status(patient_share_cents: i64, paid_cents: i64) -> InvoiceStatus {
    if paid_cents >= patient_share_cents {
        InvoiceStatus::Paid
    } else if paid_cents > 0 {
        InvoiceStatus::Partial
    } else {
        InvoiceStatus::Pending
    }
}

// ---------------------------------------------------------------------------
// Invoice construction
// ---------------------------------------------------------------------------

/// Build a fresh invoice record for an encounter. Uniqueness against any
/// existing non-cancelled invoice is the consistency coordinator's check,
/// not this function's.
pub fn build_invoice(
    encounter_id: Uuid,
    patient_id: Uuid,
    line_items: Vec<InvoiceLineItem>,
    coverage_bps: u32,
    now: DateTime<Utc>,
) -> Invoice {
    let total = total_cents(&line_items);
    let (insurer_share_cents, patient_share_cents) = coverage_split(total, coverage_bps);
    let status = payment_status(patient_share_cents, 0);
    Invoice {
        id: Uuid::new_v4(),
        encounter_id,
        patient_id,
        line_items,
        total_cents: total,
        insurer_share_cents,
        patient_share_cents,
        paid_cents: 0,
        status,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        version: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hms_schemas::LineItemKind;

    fn item(kind: LineItemKind, qty: u32, unit: i64) -> InvoiceLineItem {
        InvoiceLineItem {
            kind,
            description: "test".into(),
            quantity: qty,
            unit_price_cents: unit,
        }
    }

    #[test]
    fn totals_sum_across_kinds() {
        let items = vec![
            item(LineItemKind::Medicine, 2, 1_250),
            item(LineItemKind::Service, 1, 15_000),
            item(LineItemKind::Material, 3, 400),
        ];
        assert_eq!(total_cents(&items), 2 * 1_250 + 15_000 + 3 * 400);
    }

    #[test]
    fn split_shares_always_sum_to_total() {
        // 1/3 coverage does not divide evenly; the patient absorbs the
        // rounding remainder.
        let (insurer, patient) = coverage_split(10_001, 3_333);
        assert_eq!(insurer + patient, 10_001);
        assert_eq!(insurer, 10_001 * 3_333 / 10_000);
    }

    #[test]
    fn coverage_is_clamped_at_full() {
        let (insurer, patient) = coverage_split(5_000, 12_000);
        assert_eq!(insurer, 5_000);
        assert_eq!(patient, 0);
    }

    #[test]
    fn payment_status_thresholds() {
        assert_eq!(payment_status(10_000, 0), InvoiceStatus::Pending);
        assert_eq!(payment_status(10_000, 1), InvoiceStatus::Partial);
        assert_eq!(payment_status(10_000, 9_999), InvoiceStatus::Partial);
        assert_eq!(payment_status(10_000, 10_000), InvoiceStatus::Paid);
    }

    #[test]
    fn fully_covered_invoice_starts_paid() {
        let inv = build_invoice(
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec![item(LineItemKind::Package, 1, 50_000)],
            FULL_COVERAGE_BPS,
            Utc::now(),
        );
        assert_eq!(inv.patient_share_cents, 0);
        assert_eq!(inv.status, InvoiceStatus::Paid);
    }

    #[test]
    fn oversized_line_item_clamps_instead_of_wrapping() {
        let items = vec![item(LineItemKind::Service, u32::MAX, i64::MAX)];
        assert_eq!(total_cents(&items), i64::MAX);
    }
}
