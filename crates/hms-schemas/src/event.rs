use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::Actor;
use crate::status::EntityKind;

/// Emitted exactly once per successful transition (and once per entity
/// creation, with `from_status: None`). Consumed by the audit log, the SSE
/// stream and the projection layer; never by the engine itself — writes
/// only go through registered transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: Uuid,
    pub entity_kind: EntityKind,
    pub entity_id: Uuid,
    /// None for entity creation.
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_id: Uuid,
    pub role: String,
    pub ts_utc: DateTime<Utc>,
}

impl DomainEvent {
    pub fn transitioned(
        entity_kind: EntityKind,
        entity_id: Uuid,
        from_status: &str,
        to_status: &str,
        actor: Actor,
        ts_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            entity_kind,
            entity_id,
            from_status: Some(from_status.to_string()),
            to_status: to_status.to_string(),
            actor_id: actor.actor_id,
            role: actor.role.as_code().to_string(),
            ts_utc,
        }
    }

    pub fn created(
        entity_kind: EntityKind,
        entity_id: Uuid,
        initial_status: &str,
        actor: Actor,
        ts_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            entity_kind,
            entity_id,
            from_status: None,
            to_status: initial_status.to_string(),
            actor_id: actor.actor_id,
            role: actor.role.as_code().to_string(),
            ts_utc,
        }
    }
}
