use hms_registry::Lifecycle;
use hms_schemas::{CapabilityFlags, Encounter, EncounterStatus};
use hms_store::HospitalState;

/// Recompute an encounter's capability flags from its status and its
/// dependents. Called on every snapshot the engine returns, so the caller
/// never re-derives transition legality locally.
///
/// `can_discharge` reports the unguarded path: it is false while open
/// medication orders exist even though a complete discharge plan would
/// still be accepted as an override.
pub fn encounter_capabilities(state: &HospitalState, encounter: &Encounter) -> CapabilityFlags {
    let open_orders = state
        .med_orders_for_encounter(encounter.id)
        .iter()
        .filter(|o| o.status.requires_action())
        .count();

    let dischargeable_status = matches!(
        encounter.status,
        EncounterStatus::Arrived | EncounterStatus::InProgress
    );

    CapabilityFlags {
        can_check_in: encounter.status == EncounterStatus::Planned,
        can_discharge: dischargeable_status && open_orders == 0,
        can_cancel: !encounter.status.is_terminal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hms_schemas::EncounterType;
    use uuid::Uuid;

    fn encounter(status: EncounterStatus) -> Encounter {
        Encounter {
            id: Uuid::new_v4(),
            booking_id: None,
            patient_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            encounter_type: EncounterType::Outpatient,
            status,
            disposition: None,
            cancellation_reason: None,
            started_at: None,
            ended_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn planned_encounter_can_only_check_in_or_cancel() {
        let state = HospitalState::new();
        let flags = encounter_capabilities(&state, &encounter(EncounterStatus::Planned));
        assert!(flags.can_check_in);
        assert!(!flags.can_discharge);
        assert!(flags.can_cancel);
    }

    #[test]
    fn arrived_encounter_without_orders_can_discharge() {
        let state = HospitalState::new();
        let flags = encounter_capabilities(&state, &encounter(EncounterStatus::Arrived));
        assert!(!flags.can_check_in);
        assert!(flags.can_discharge);
    }

    #[test]
    fn finished_encounter_has_no_capabilities() {
        let state = HospitalState::new();
        let flags = encounter_capabilities(&state, &encounter(EncounterStatus::Finished));
        assert!(!flags.can_check_in);
        assert!(!flags.can_discharge);
        assert!(!flags.can_cancel);
    }
}
