use hms_schemas::{EntityKind, FieldName, Role};
use uuid::Uuid;

/// Returned when a transition request cannot be applied.
///
/// Every variant carries a stable machine code (see [`TransitionError::code`])
/// so callers branch on codes, never on message text. `VersionConflict`,
/// `OpenDependency` and `DuplicateInvoice` are recoverable: refetch and
/// retry, resolve the dependency, or fetch the existing record. A failed
/// request never mutates stored state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The (from, to) pair is not registered for this entity type.
    InvalidTransition {
        kind: EntityKind,
        entity_id: Uuid,
        from: String,
        to: String,
    },
    /// The actor's role is not in the edge's permitted set.
    Unauthorized {
        kind: EntityKind,
        entity_id: Uuid,
        required: &'static [Role],
        actual: Role,
    },
    /// The payload is missing a field the edge declares mandatory.
    MissingField { field: FieldName },
    /// The caller's read is stale. Refetch and retry.
    VersionConflict {
        kind: EntityKind,
        entity_id: Uuid,
        expected: u64,
        actual: u64,
    },
    /// A cross-entity precondition blocks the transition.
    OpenDependency {
        kind: EntityKind,
        entity_id: Uuid,
        detail: String,
    },
    /// A non-cancelled invoice already exists for the encounter.
    DuplicateInvoice { existing_invoice_id: Uuid },
    /// No entity of this type with this id.
    NotFound { kind: EntityKind, entity_id: Uuid },
}

impl TransitionError {
    /// Stable machine code for programmatic branching.
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::InvalidTransition { .. } => "INVALID_TRANSITION",
            TransitionError::Unauthorized { .. } => "UNAUTHORIZED",
            TransitionError::MissingField { .. } => "MISSING_FIELD",
            TransitionError::VersionConflict { .. } => "VERSION_CONFLICT",
            TransitionError::OpenDependency { .. } => "OPEN_DEPENDENCY",
            TransitionError::DuplicateInvoice { .. } => "DUPLICATE_INVOICE",
            TransitionError::NotFound { .. } => "NOT_FOUND",
        }
    }

    /// True when the caller can recover by refetching / resolving rather
    /// than treating the failure as final.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TransitionError::VersionConflict { .. }
                | TransitionError::OpenDependency { .. }
                | TransitionError::DuplicateInvoice { .. }
        )
    }
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::InvalidTransition {
                kind,
                entity_id,
                from,
                to,
            } => write!(
                f,
                "no registered transition {from} -> {to} for {kind} {entity_id}"
            ),
            TransitionError::Unauthorized {
                kind,
                entity_id,
                required,
                actual,
            } => {
                let roles: Vec<&str> = required.iter().map(|r| r.as_code()).collect();
                write!(
                    f,
                    "role {actual} may not transition {kind} {entity_id}; requires one of {}",
                    roles.join(", ")
                )
            }
            TransitionError::MissingField { field } => {
                write!(f, "required field {field} not supplied")
            }
            TransitionError::VersionConflict {
                kind,
                entity_id,
                expected,
                actual,
            } => write!(
                f,
                "stale version for {kind} {entity_id}: request read v{expected}, store is at v{actual}"
            ),
            TransitionError::OpenDependency {
                kind,
                entity_id,
                detail,
            } => write!(f, "{kind} {entity_id} has an open dependency: {detail}"),
            TransitionError::DuplicateInvoice {
                existing_invoice_id,
            } => write!(
                f,
                "a non-cancelled invoice {existing_invoice_id} already exists for this encounter"
            ),
            TransitionError::NotFound { kind, entity_id } => {
                write!(f, "{kind} {entity_id} not found")
            }
        }
    }
}

impl std::error::Error for TransitionError {}
