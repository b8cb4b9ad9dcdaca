use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hms_schemas::{EmergencyDetails, EncounterStatus, TriageCategory};
use hms_store::HospitalState;

/// Points per acuity band. Category dominates the score; the other terms
/// reorder within a band, not across bands.
fn category_points(c: TriageCategory) -> i64 {
    match c {
        TriageCategory::Resuscitation => 10_000,
        TriageCategory::Emergent => 8_000,
        TriageCategory::Urgent => 6_000,
        TriageCategory::SemiUrgent => 4_000,
        TriageCategory::NonUrgent => 2_000,
    }
}

/// Waiting time contribution is capped so a long-waiting NON_URGENT can
/// rise within its band but never outrank an EMERGENT arrival.
const MAX_WAIT_POINTS: i64 = 480;

/// Derived ED priority: triage category + waiting time + pain score +
/// life-threatening flag. Deterministic for a fixed `now`; never stored.
pub fn priority_score(details: &EmergencyDetails, now: DateTime<Utc>) -> i64 {
    let waited_minutes = (now - details.arrived_at).num_minutes().clamp(0, MAX_WAIT_POINTS);
    let pain = (details.pain_score.min(10) as i64) * 20;
    let life = if details.life_threatening { 1_000 } else { 0 };
    category_points(details.triage_category) + waited_minutes + pain + life
}

/// One row of the ED queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyQueueEntry {
    pub encounter_id: Uuid,
    pub patient_id: Uuid,
    pub triage_category: TriageCategory,
    pub pain_score: u8,
    pub life_threatening: bool,
    pub arrived_at: DateTime<Utc>,
    pub waiting_minutes: i64,
    pub priority: i64,
}

/// Patients waiting to be seen, highest priority first. Ties break on
/// earlier arrival, then id, so two reads of the same state always agree.
pub fn emergency_queue(state: &HospitalState, now: DateTime<Utc>) -> Vec<EmergencyQueueEntry> {
    let mut queue: Vec<EmergencyQueueEntry> = state
        .emergency
        .values()
        .filter(|d| {
            state
                .encounters
                .get(&d.encounter_id)
                .map(|e| e.status == EncounterStatus::Arrived)
                .unwrap_or(false)
        })
        .map(|d| {
            let patient_id = state
                .encounters
                .get(&d.encounter_id)
                .map(|e| e.patient_id)
                .unwrap_or_default();
            EmergencyQueueEntry {
                encounter_id: d.encounter_id,
                patient_id,
                triage_category: d.triage_category,
                pain_score: d.pain_score,
                life_threatening: d.life_threatening,
                arrived_at: d.arrived_at,
                waiting_minutes: (now - d.arrived_at).num_minutes().max(0),
                priority: priority_score(d, now),
            }
        })
        .collect();

    queue.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(a.arrived_at.cmp(&b.arrived_at))
            .then(a.encounter_id.cmp(&b.encounter_id))
    });
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn details(
        category: TriageCategory,
        pain: u8,
        life: bool,
        arrived: DateTime<Utc>,
    ) -> EmergencyDetails {
        EmergencyDetails {
            encounter_id: Uuid::new_v4(),
            triage_category: category,
            pain_score: pain,
            life_threatening: life,
            arrival_mode: "walk-in".into(),
            arrived_at: arrived,
            assigned_staff_id: None,
            triaged_by: Uuid::new_v4(),
            updated_at: arrived,
        }
    }

    #[test]
    fn category_dominates_wait_and_pain() {
        let now = Utc::now();
        // NON_URGENT with max wait and max pain vs fresh EMERGENT.
        let non_urgent = details(
            TriageCategory::NonUrgent,
            10,
            false,
            now - Duration::hours(8),
        );
        let emergent = details(TriageCategory::Emergent, 0, false, now);
        assert!(priority_score(&emergent, now) > priority_score(&non_urgent, now));
    }

    #[test]
    fn waiting_raises_priority_within_a_band() {
        let now = Utc::now();
        let waited = details(TriageCategory::Urgent, 3, false, now - Duration::minutes(90));
        let fresh = details(TriageCategory::Urgent, 3, false, now);
        assert!(priority_score(&waited, now) > priority_score(&fresh, now));
    }

    #[test]
    fn life_threatening_flag_outweighs_pain() {
        let now = Utc::now();
        let flagged = details(TriageCategory::Urgent, 0, true, now);
        let painful = details(TriageCategory::Urgent, 10, false, now);
        assert!(priority_score(&flagged, now) > priority_score(&painful, now));
    }
}
