//! hms-registry
//!
//! The status registry: per-entity-type transition tables. Pure lookup, no
//! side effects, no IO — the same inputs always produce the same answer.
//!
//! Each edge names the target status, the role set permitted to take it
//! and the payload fields it declares mandatory. A status with no outgoing
//! edges is terminal; asking for its edges returns the empty slice, which
//! is a normal condition rather than an error.
//!
//! Adding an entity type means implementing [`Lifecycle`] for its status
//! enum; the engine in `hms-lifecycle` is generic over the table.

mod tables;

use hms_schemas::{EntityKind, FieldName, Role};

// ---------------------------------------------------------------------------
// TransitionEdge
// ---------------------------------------------------------------------------

/// A registered (from, to) pair: who may take it and what the payload must
/// supply. `from` is implicit — edges are returned from a source status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEdge<S: 'static> {
    pub to: S,
    pub roles: &'static [Role],
    pub required_fields: &'static [FieldName],
}

impl<S: Copy + Eq> TransitionEdge<S> {
    /// True when `role` may take this edge.
    pub fn permits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// A status enum with a registered transition graph.
pub trait Lifecycle: Copy + Eq + Sized + 'static {
    const KIND: EntityKind;

    /// Wire code for this status ("PENDING", "ACTIVE", ...).
    fn code(self) -> &'static str;

    /// All outgoing edges from this status. Empty for terminal statuses.
    fn edges(self) -> &'static [TransitionEdge<Self>];

    /// A terminal status has no outgoing edges and is immutable.
    fn is_terminal(self) -> bool {
        self.edges().is_empty()
    }

    /// The registered edge to `to`, if one exists.
    fn edge_to(self, to: Self) -> Option<&'static TransitionEdge<Self>> {
        self.edges().iter().find(|e| e.to == to)
    }
}

/// Registry contract from the component design: the full edge set out of
/// `from`. Provided as a free function so call sites read like the
/// contract; identical to calling `from.edges()`.
pub fn allowed_transitions<S: Lifecycle>(from: S) -> &'static [TransitionEdge<S>] {
    from.edges()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hms_schemas::{BookingStatus, MedicationOrderStatus};

    #[test]
    fn terminal_statuses_have_no_edges() {
        assert!(allowed_transitions(BookingStatus::Cancelled).is_empty());
        assert!(allowed_transitions(BookingStatus::NoShow).is_empty());
        assert!(allowed_transitions(MedicationOrderStatus::Discontinued).is_empty());
        assert!(allowed_transitions(MedicationOrderStatus::Completed).is_empty());
    }

    #[test]
    fn edge_lookup_finds_registered_pair_only() {
        let edge = BookingStatus::Pending.edge_to(BookingStatus::Confirmed);
        assert!(edge.is_some());
        assert!(BookingStatus::Pending
            .edge_to(BookingStatus::Completed)
            .is_none());
    }

    #[test]
    fn active_held_is_the_only_back_edge_pair() {
        // Held -> Active is the one legal "backwards" move in the whole
        // medication graph.
        assert!(MedicationOrderStatus::Held
            .edge_to(MedicationOrderStatus::Active)
            .is_some());
        assert!(MedicationOrderStatus::Active
            .edge_to(MedicationOrderStatus::Pending)
            .is_none());
        assert!(MedicationOrderStatus::Completed
            .edge_to(MedicationOrderStatus::Active)
            .is_none());
    }
}
