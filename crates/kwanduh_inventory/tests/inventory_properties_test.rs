//! Randomized operation sequences checked against the inventory invariants.

use kwanduh_inventory::{
    AnswerDetails, ChallengeInventory, ChallengeStatus, DEFAULT_TOPICS, seed_play_data,
};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use std::time::Duration;
use strum::IntoEnumIterator;

fn assert_tallies_match(inventory: &ChallengeInventory) {
    assert!(inventory.verify().is_empty(), "{:?}", inventory.verify());
    for status in ChallengeStatus::iter() {
        let summed: usize = inventory.topics().map(|info| info.count_of(status)).sum();
        assert_eq!(summed, inventory.count(status), "{}", status);
    }
    for info in inventory.topics() {
        assert_eq!(info.counted(), info.challenge_indices().len());
    }
}

fn allocated(inventory: &ChallengeInventory) -> Vec<usize> {
    (0..inventory.len())
        .filter(|&i| inventory.status(i) == Some(ChallengeStatus::Allocated))
        .collect()
}

#[test]
fn test_random_operations_keep_inventory_consistent() {
    let data = seed_play_data(&DEFAULT_TOPICS, 15);
    let all_topics: Vec<String> = DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect();

    for seed in 0..40 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut inventory = ChallengeInventory::new(&data);

        for step in 0..60 {
            match rng.random_range(0..4) {
                0 => {
                    let k = rng.random_range(1..=all_topics.len());
                    let chosen: Vec<String> =
                        all_topics.choose_multiple(&mut rng, k).cloned().collect();
                    let count = rng.random_range(0..=20);
                    let before = inventory.snapshot();
                    if inventory.allocate(&chosen, count, &mut rng).is_err() {
                        assert_eq!(inventory.snapshot(), before, "seed {} step {}", seed, step);
                    }
                }
                1 => {
                    let mut live = allocated(&inventory);
                    live.shuffle(&mut rng);
                    let k = rng.random_range(0..=live.len());
                    inventory.deallocate(&live[..k]).unwrap();
                }
                2 => {
                    if let Some(&index) = allocated(&inventory).choose(&mut rng) {
                        let _ = inventory.replace(index);
                    }
                }
                _ => {
                    if let Some(&index) = allocated(&inventory).choose(&mut rng) {
                        let details = AnswerDetails::new(
                            "guess".into(),
                            Duration::from_secs(rng.random_range(1..30)),
                            seed as usize,
                            step,
                            0,
                            0,
                        );
                        let correct = rng.random_bool(0.5);
                        inventory.mark_answered(index, correct, details).unwrap();
                    }
                }
            }
            assert_tallies_match(&inventory);
        }
    }
}

#[test]
fn test_same_seed_allocates_same_indices() {
    let data = seed_play_data(&DEFAULT_TOPICS, 10);
    let request: Vec<String> = vec!["History".into(), "Music".into()];

    let mut a = ChallengeInventory::new(&data);
    let mut b = ChallengeInventory::new(&data);
    let picked_a = a
        .allocate(&request, 9, &mut StdRng::seed_from_u64(77))
        .unwrap();
    let picked_b = b
        .allocate(&request, 9, &mut StdRng::seed_from_u64(77))
        .unwrap();
    assert_eq!(picked_a, picked_b);
}
