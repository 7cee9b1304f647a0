//! Topic counters agree with the status array.

use super::Invariant;
use crate::inventory::ChallengeInventory;
use crate::status::ChallengeStatus;
use strum::IntoEnumIterator;

/// Invariant: every topic counter equals the number of that topic's indices with the
/// matching status. Summed over topics this also makes the global tallies agree with
/// the status array restricted to tracked indices.
pub struct StatusSyncInvariant;

impl Invariant<ChallengeInventory> for StatusSyncInvariant {
    fn holds(inventory: &ChallengeInventory) -> bool {
        let statuses = inventory.statuses();
        inventory.topics().all(|info| {
            ChallengeStatus::iter().all(|status| {
                let actual = info
                    .challenge_indices()
                    .iter()
                    .filter(|&&i| statuses.get(i) == Some(&status))
                    .count();
                actual == info.count_of(status)
            })
        })
    }

    fn description() -> &'static str {
        "Topic counters match the challenge status array"
    }
}
