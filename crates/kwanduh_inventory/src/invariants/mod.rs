//! First-class invariants for the challenge inventory.
//!
//! Each invariant is a logical property of a [`ChallengeInventory`] that
//! must hold between operations. The inventory checks the full set after
//! every mutation; tests check them directly.

use crate::inventory::ChallengeInventory;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implementations are provided for tuples of two and three invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

fn into_result(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        check::<S, I3>(state, &mut violations);
        into_result(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check::<S, I1>(state, &mut violations);
        check::<S, I2>(state, &mut violations);
        into_result(violations)
    }
}

pub mod index_partition;
pub mod status_sync;
pub mod topic_counts;

pub use index_partition::IndexPartitionInvariant;
pub use status_sync::StatusSyncInvariant;
pub use topic_counts::TopicCountsInvariant;

/// All inventory invariants as a composable set.
pub type InventoryInvariants = (
    TopicCountsInvariant,
    StatusSyncInvariant,
    IndexPartitionInvariant,
);

/// Runs every inventory invariant, returning the violations (empty when consistent).
pub fn verify(inventory: &ChallengeInventory) -> Vec<InvariantViolation> {
    InventoryInvariants::check_all(inventory).err().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_play_data;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_invariant_set_holds_for_fresh_inventory() {
        let inventory = ChallengeInventory::new(&seed_play_data(&["A", "B"], 5));
        assert!(InventoryInvariants::check_all(&inventory).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_allocation() {
        let mut inventory = ChallengeInventory::new(&seed_play_data(&["A", "B"], 5));
        let mut rng = StdRng::seed_from_u64(3);
        inventory
            .allocate(&["A".to_string()], 4, &mut rng)
            .unwrap();
        assert!(verify(&inventory).is_empty());
    }

    #[test]
    fn test_two_invariants_as_set() {
        let inventory = ChallengeInventory::new(&seed_play_data(&["A"], 2));
        type TwoInvariants = (TopicCountsInvariant, StatusSyncInvariant);
        assert!(TwoInvariants::check_all(&inventory).is_ok());
    }
}
