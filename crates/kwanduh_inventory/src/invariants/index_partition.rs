//! Topic index lists partition the tracked challenges.

use super::Invariant;
use crate::inventory::ChallengeInventory;
use std::collections::HashSet;

/// Invariant: every topic index is in range and belongs to a challenge of that topic,
/// no index is listed twice, and every challenge of a tracked topic is listed.
pub struct IndexPartitionInvariant;

impl Invariant<ChallengeInventory> for IndexPartitionInvariant {
    fn holds(inventory: &ChallengeInventory) -> bool {
        let challenges = inventory.challenges();
        let mut seen = HashSet::new();

        for info in inventory.topics() {
            for &index in info.challenge_indices() {
                let Some(challenge) = challenges.get(index) else {
                    return false;
                };
                if &challenge.topic != info.name() || !seen.insert(index) {
                    return false;
                }
            }
        }

        challenges
            .iter()
            .enumerate()
            .filter(|(_, c)| inventory.topic_info(&c.topic).is_some())
            .all(|(index, _)| seen.contains(&index))
    }

    fn description() -> &'static str {
        "Topic index lists partition the tracked challenges"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_play_data;

    #[test]
    fn test_untracked_topic_is_ignored() {
        let mut data = seed_play_data(&["A", "B"], 3);
        data.topic_data.topics.retain(|t| t.name == "A");
        let inventory = ChallengeInventory::new(&data);
        assert!(IndexPartitionInvariant::holds(&inventory));
        assert!(inventory.topic_info("B").is_none());
    }
}
