use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hms_schemas::{MedicationOrder, MedicationOrderGroup};
use hms_store::HospitalState;

/// A medication order group with its orders, the shape the medication
/// worklists render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedMedicationOrders {
    pub group: MedicationOrderGroup,
    pub orders: Vec<MedicationOrder>,
}

/// All order groups for an encounter, each with its orders attached.
/// Groups come back oldest first; orders within a group by creation time.
pub fn grouped_medication_orders(
    state: &HospitalState,
    encounter_id: Uuid,
) -> Vec<GroupedMedicationOrders> {
    let mut groups: Vec<&MedicationOrderGroup> = state
        .med_order_groups
        .values()
        .filter(|g| g.encounter_id == encounter_id)
        .collect();
    groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    groups
        .into_iter()
        .map(|group| {
            let mut orders: Vec<MedicationOrder> = state
                .med_orders
                .values()
                .filter(|o| o.group_id == group.id)
                .cloned()
                .collect();
            orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            GroupedMedicationOrders {
                group: group.clone(),
                orders,
            }
        })
        .collect()
}
