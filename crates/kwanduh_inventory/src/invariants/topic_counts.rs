//! Topic counters sum to the topic's size.

use super::Invariant;
use crate::inventory::ChallengeInventory;

/// Invariant: for every topic, `alloc + free + replaced + right + wrong == |indices|`.
pub struct TopicCountsInvariant;

impl Invariant<ChallengeInventory> for TopicCountsInvariant {
    fn holds(inventory: &ChallengeInventory) -> bool {
        inventory
            .topics()
            .all(|info| info.counted() == info.challenge_indices().len())
    }

    fn description() -> &'static str {
        "Topic counters sum to the number of challenges in the topic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_play_data;

    #[test]
    fn test_fresh_inventory_holds() {
        let inventory = ChallengeInventory::new(&seed_play_data(&["A", "B", "C"], 4));
        assert!(TopicCountsInvariant::holds(&inventory));
    }

    #[test]
    fn test_empty_topic_holds() {
        let mut data = seed_play_data(&["A"], 3);
        data.topic_data
            .topics
            .push(crate::content::BasicTopic::new("Empty".to_string()));
        let inventory = ChallengeInventory::new(&data);
        assert!(TopicCountsInvariant::holds(&inventory));
    }
}
