use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hms_schemas::LabTestOrderStatus;
use hms_store::HospitalState;

/// Counts by status code per entity family, plus the two turnaround
/// averages the dashboards chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub bookings_by_status: BTreeMap<String, usize>,
    pub encounters_by_status: BTreeMap<String, usize>,
    pub medication_orders_by_status: BTreeMap<String, usize>,
    pub invoices_by_status: BTreeMap<String, usize>,
    pub lab_orders_by_status: BTreeMap<String, usize>,
    /// Mean minutes from scheduled time to check-in, over encounters that
    /// originated from a booking and have checked in. None with no data.
    pub avg_wait_minutes: Option<i64>,
    /// Mean minutes from lab order creation to verification. None with no
    /// verified orders.
    pub avg_lab_turnaround_minutes: Option<i64>,
}

pub fn dashboard_summary(state: &HospitalState) -> DashboardSummary {
    let mut bookings_by_status = BTreeMap::new();
    for b in state.bookings.values() {
        *bookings_by_status
            .entry(b.status.as_code().to_string())
            .or_insert(0) += 1;
    }

    let mut encounters_by_status = BTreeMap::new();
    for e in state.encounters.values() {
        *encounters_by_status
            .entry(e.status.as_code().to_string())
            .or_insert(0) += 1;
    }

    let mut medication_orders_by_status = BTreeMap::new();
    for o in state.med_orders.values() {
        *medication_orders_by_status
            .entry(o.status.as_code().to_string())
            .or_insert(0) += 1;
    }

    let mut invoices_by_status = BTreeMap::new();
    for i in state.invoices.values() {
        *invoices_by_status
            .entry(i.status.as_code().to_string())
            .or_insert(0) += 1;
    }

    let mut lab_orders_by_status = BTreeMap::new();
    for o in state.lab_orders.values() {
        *lab_orders_by_status
            .entry(o.status.as_code().to_string())
            .or_insert(0) += 1;
    }

    // Booking-to-check-in wait. Early arrivals contribute zero rather
    // than a negative wait.
    let waits: Vec<i64> = state
        .encounters
        .values()
        .filter(|e| e.booking_id.is_some())
        .filter_map(|e| {
            let booking = state.bookings.get(&e.booking_id?)?;
            let started = e.started_at?;
            Some((started - booking.scheduled_at).num_minutes().max(0))
        })
        .collect();
    let avg_wait_minutes = mean(&waits);

    let turnarounds: Vec<i64> = state
        .lab_orders
        .values()
        .filter(|o| o.status == LabTestOrderStatus::Verified)
        .map(|o| (o.updated_at - o.created_at).num_minutes().max(0))
        .collect();
    let avg_lab_turnaround_minutes = mean(&turnarounds);

    DashboardSummary {
        bookings_by_status,
        encounters_by_status,
        medication_orders_by_status,
        invoices_by_status,
        lab_orders_by_status,
        avg_wait_minutes,
        avg_lab_turnaround_minutes,
    }
}

fn mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<i64>() / values.len() as i64)
}
