use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Staff role attached to every transition request. Transition edges in the
/// registry name the role set permitted to take them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Receptionist,
    Doctor,
    Nurse,
    Pharmacist,
    LabTechnician,
    Radiologist,
    Cashier,
    Admin,
}

impl Role {
    pub fn as_code(&self) -> &'static str {
        match self {
            Role::Receptionist => "RECEPTIONIST",
            Role::Doctor => "DOCTOR",
            Role::Nurse => "NURSE",
            Role::Pharmacist => "PHARMACIST",
            Role::LabTechnician => "LAB_TECHNICIAN",
            Role::Radiologist => "RADIOLOGIST",
            Role::Cashier => "CASHIER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The staff member performing a transition. Explicit on every request —
/// the engine has no ambient session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(actor_id: Uuid, role: Role) -> Self {
        Self { actor_id, role }
    }
}
