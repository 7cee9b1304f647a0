//! Per-topic aggregate counters.

use crate::status::ChallengeStatus;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Counters and membership for one topic.
///
/// The five counters always sum to `challenge_indices.len()`. They are only
/// changed by [`crate::ChallengeInventory`], together with the matching
/// status flips.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TopicInfo {
    /// Topic name.
    name: String,
    /// Challenges currently on a board.
    alloc_count: usize,
    /// Challenges in reserve.
    free_count: usize,
    /// Challenges abandoned through replacement.
    replaced_count: usize,
    /// Challenges answered correctly.
    right_count: usize,
    /// Challenges answered incorrectly.
    wrong_count: usize,
    /// Challenge indices in this topic; recently freed ones sit at the end.
    challenge_indices: Vec<usize>,
}

impl TopicInfo {
    /// A topic whose challenges are all in reserve.
    pub fn new(name: impl Into<String>, challenge_indices: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            alloc_count: 0,
            free_count: challenge_indices.len(),
            replaced_count: 0,
            right_count: 0,
            wrong_count: 0,
            challenge_indices,
        }
    }

    /// Sum of every counter.
    pub fn counted(&self) -> usize {
        self.alloc_count + self.free_count + self.replaced_count + self.right_count + self.wrong_count
    }

    /// The counter tracking `status`.
    pub fn count_of(&self, status: ChallengeStatus) -> usize {
        match status {
            ChallengeStatus::InReserve => self.free_count,
            ChallengeStatus::Allocated => self.alloc_count,
            ChallengeStatus::PlayedCorrectly => self.right_count,
            ChallengeStatus::PlayedIncorrectly => self.wrong_count,
            ChallengeStatus::Abandoned => self.replaced_count,
        }
    }

    pub(crate) fn record_allocated(&mut self, k: usize) {
        self.free_count = self.free_count.saturating_sub(k);
        self.alloc_count += k;
    }

    /// Returns `index` to reserve and moves it to the end of the index list.
    pub(crate) fn record_released(&mut self, index: usize) {
        self.alloc_count = self.alloc_count.saturating_sub(1);
        self.free_count += 1;
        if let Some(pos) = self.challenge_indices.iter().position(|&i| i == index) {
            let moved = self.challenge_indices.remove(pos);
            self.challenge_indices.push(moved);
        }
    }

    pub(crate) fn record_replaced(&mut self) {
        self.replaced_count += 1;
        self.free_count = self.free_count.saturating_sub(1);
    }

    pub(crate) fn record_answer(&mut self, correct: bool) {
        if correct {
            self.right_count += 1;
        } else {
            self.wrong_count += 1;
        }
        self.alloc_count = self.alloc_count.saturating_sub(1);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(std::mem::take(&mut self.name), std::mem::take(&mut self.challenge_indices));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_topic_is_all_free() {
        let info = TopicInfo::new("History", vec![0, 1, 2]);
        assert_eq!(*info.free_count(), 3);
        assert_eq!(info.counted(), 3);
    }

    #[test]
    fn test_counts_stay_balanced() {
        let mut info = TopicInfo::new("History", vec![0, 1, 2, 3]);
        info.record_allocated(3);
        info.record_answer(true);
        info.record_answer(false);
        info.record_replaced();
        info.record_released(0);
        assert_eq!(info.counted(), 4);
        assert_eq!(*info.right_count(), 1);
        assert_eq!(*info.wrong_count(), 1);
        assert_eq!(*info.replaced_count(), 1);
        assert_eq!(*info.alloc_count(), 0);
        assert_eq!(*info.free_count(), 1);
    }

    #[test]
    fn test_released_index_moves_to_end() {
        let mut info = TopicInfo::new("History", vec![4, 5, 6]);
        info.record_allocated(1);
        info.record_released(4);
        assert_eq!(info.challenge_indices(), &vec![5, 6, 4]);
    }

    #[test]
    fn test_reset_keeps_membership() {
        let mut info = TopicInfo::new("History", vec![4, 5, 6]);
        info.record_allocated(2);
        info.record_answer(true);
        info.reset();
        assert_eq!(info, TopicInfo::new("History", vec![4, 5, 6]));
    }
}
