//! Scenario tests for allocation, replacement and deallocation.

use kwanduh_inventory::{
    AllocationError, ChallengeInventory, ChallengeStatus, PlayData, seed_play_data,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn topics(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// History has 3 challenges, Science has 20.
fn lopsided_content() -> PlayData {
    let mut data = seed_play_data(&["History", "Science"], 20);
    data.game_datum[0].challenges.truncate(3);
    data
}

#[test]
fn test_allocation_caps_short_topic_and_tops_up_from_the_other() {
    let mut inventory = ChallengeInventory::new(&lopsided_content());
    let mut rng = StdRng::seed_from_u64(42);

    let picked = inventory
        .allocate(&topics(&["History", "Science"]), 10, &mut rng)
        .expect("allocation should succeed");

    assert_eq!(picked.len(), 10);
    let history = inventory.topic_info("History").unwrap();
    let science = inventory.topic_info("Science").unwrap();
    assert_eq!(*history.free_count(), 0);
    assert_eq!(*history.alloc_count(), 3);
    assert_eq!(*science.alloc_count(), 7);
    assert_eq!(*science.free_count(), 13);

    for &index in &picked {
        assert_eq!(inventory.status(index), Some(ChallengeStatus::Allocated));
    }
    assert!(inventory.verify().is_empty());
}

#[test]
fn test_replace_fails_when_topic_is_exhausted() {
    let mut inventory = ChallengeInventory::new(&lopsided_content());
    let mut rng = StdRng::seed_from_u64(1);
    let picked = inventory
        .allocate(&topics(&["History"]), 3, &mut rng)
        .unwrap();
    let before = inventory.snapshot();

    let result = inventory.replace(picked[0]);

    assert_eq!(result, Err(AllocationError::InsufficientChallenges(1)));
    assert_eq!(inventory.snapshot(), before);
}

#[test]
fn test_replace_never_crosses_topics() {
    let mut inventory = ChallengeInventory::new(&lopsided_content());
    let mut rng = StdRng::seed_from_u64(2);
    let picked = inventory
        .allocate(&topics(&["History"]), 2, &mut rng)
        .unwrap();

    let replacement = inventory.replace(picked[0]).unwrap();
    assert_eq!(inventory.challenge(replacement).unwrap().topic, "History");

    // The last History challenge is now in play; Science still has plenty.
    assert_eq!(
        inventory.replace(picked[1]),
        Err(AllocationError::InsufficientChallenges(1))
    );
}

#[test]
fn test_duplicate_deallocation_is_rejected_without_mutation() {
    let mut inventory = ChallengeInventory::new(&seed_play_data(&["A", "B"], 10));
    let mut rng = StdRng::seed_from_u64(3);
    let picked = inventory
        .allocate(&topics(&["A", "B"]), 8, &mut rng)
        .unwrap();
    let before = inventory.snapshot();

    let index = picked[0];
    assert_eq!(
        inventory.deallocate(&[index, index]),
        Err(AllocationError::InvalidDeallocIndices(vec![index]))
    );
    assert_eq!(inventory.snapshot(), before);
}

#[test]
fn test_reserve_and_out_of_range_indices_are_all_reported() {
    let mut inventory = ChallengeInventory::new(&seed_play_data(&["A"], 5));
    let mut rng = StdRng::seed_from_u64(4);
    let picked = inventory.allocate(&topics(&["A"]), 2, &mut rng).unwrap();
    let reserve = (0..5)
        .find(|&i| inventory.status(i) == Some(ChallengeStatus::InReserve))
        .unwrap();
    let before = inventory.snapshot();

    let result = inventory.deallocate(&[picked[0], 500, reserve]);

    let mut expected = vec![reserve, 500];
    expected.sort_unstable();
    assert_eq!(result, Err(AllocationError::InvalidDeallocIndices(expected)));
    assert_eq!(inventory.snapshot(), before);
}

#[test]
fn test_allocate_then_deallocate_restores_counts() {
    let mut inventory = ChallengeInventory::new(&seed_play_data(&["A", "B", "C"], 7));
    let mut rng = StdRng::seed_from_u64(5);
    let counts = |inv: &ChallengeInventory| {
        inv.topics()
            .map(|info| (*info.free_count(), *info.alloc_count()))
            .collect::<Vec<_>>()
    };
    let before = counts(&inventory);

    let picked = inventory
        .allocate(&topics(&["A", "C"]), 9, &mut rng)
        .unwrap();
    assert_ne!(counts(&inventory), before);
    inventory.deallocate(&picked).unwrap();

    assert_eq!(counts(&inventory), before);
    assert_eq!(inventory.count(ChallengeStatus::InReserve), 21);
}

#[test]
fn test_freed_indices_move_to_end_of_topic() {
    let mut inventory = ChallengeInventory::new(&seed_play_data(&["A"], 6));
    let mut rng = StdRng::seed_from_u64(6);
    let picked = inventory.allocate(&topics(&["A"]), 1, &mut rng).unwrap();

    inventory.deallocate(&picked).unwrap();

    let indices = inventory.topic_info("A").unwrap().challenge_indices();
    assert_eq!(indices.last(), Some(&picked[0]));
}
