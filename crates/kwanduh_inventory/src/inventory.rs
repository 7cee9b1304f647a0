//! The challenge inventory: which challenges are free, in play, or spent.
//!
//! Every mutating operation validates its input completely before touching
//! any state, then flips challenge statuses and the owning topics' counters
//! together. After each mutation the full invariant set is checked; a
//! violation is logged at `error` level and panics in debug builds.

use crate::answered::{AnswerDetails, AnsweredRecord};
use crate::content::{Challenge, PlayData};
use crate::error::{AllocationError, SnapshotError};
use crate::invariants::{self, InvariantViolation};
use crate::snapshot::InventorySnapshot;
use crate::status::ChallengeStatus;
use crate::topic_info::TopicInfo;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error, info, instrument, warn};

/// Position of a challenge in the flattened content pool.
pub type ChallengeIndex = usize;

/// Owns the challenge pool, per-challenge status, per-topic counters and the answer log.
#[derive(Debug, Clone)]
pub struct ChallengeInventory {
    challenges: Vec<Challenge>,
    status: Vec<ChallengeStatus>,
    topic_info: BTreeMap<String, TopicInfo>,
    answered: BTreeMap<String, AnsweredRecord>,
}

impl ChallengeInventory {
    /// Builds an inventory with every challenge in reserve.
    ///
    /// Only topics listed in the content catalog are tracked; challenges whose
    /// topic is not in the catalog stay in the pool but are never allocated.
    #[instrument(skip(play_data), fields(play_data_id = %play_data.play_data_id))]
    pub fn new(play_data: &PlayData) -> Self {
        let challenges = play_data.every_challenge();
        let status = vec![ChallengeStatus::InReserve; challenges.len()];
        let topic_info: BTreeMap<String, TopicInfo> = play_data
            .all_topics()
            .into_iter()
            .map(|name| {
                let indices = challenges
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.topic == name)
                    .map(|(i, _)| i)
                    .collect();
                (name.clone(), TopicInfo::new(name, indices))
            })
            .collect();

        info!(
            challenges = challenges.len(),
            topics = topic_info.len(),
            "Inventory created"
        );

        Self {
            challenges,
            status,
            topic_info,
            answered: BTreeMap::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Mutations
    // ─────────────────────────────────────────────────────────────

    /// Allocates `count` free challenges drawn from `topics`.
    ///
    /// The request is split as evenly as possible across the (deduplicated)
    /// topics; topics that run short are topped up from the other requested
    /// topics, and as a last resort from topics outside the request. The
    /// returned indices are shuffled. Nothing is mutated on error.
    #[instrument(skip(self, rng))]
    pub fn allocate<R: Rng + ?Sized>(
        &mut self,
        topics: &[String],
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<ChallengeIndex>, AllocationError> {
        if topics.is_empty() {
            warn!("Allocation requested without topics");
            return Err(AllocationError::EmptyTopics);
        }

        let mut requested: Vec<&str> = Vec::with_capacity(topics.len());
        for topic in topics {
            if !requested.contains(&topic.as_str()) {
                requested.push(topic.as_str());
            }
        }

        let unknown: Vec<String> = requested
            .iter()
            .filter(|t| !self.topic_info.contains_key(**t as &str))
            .map(|t| t.to_string())
            .collect();
        if !unknown.is_empty() {
            warn!(?unknown, "Allocation requested unknown topics");
            return Err(AllocationError::InvalidTopics(unknown));
        }

        let available = self.free_count_for(topics);
        if available < count {
            warn!(available, count, "Not enough free challenges");
            return Err(AllocationError::InsufficientChallenges(available));
        }

        let mut pools: Vec<Vec<ChallengeIndex>> = requested
            .iter()
            .map(|topic| {
                let mut free = self.free_indices(topic);
                free.shuffle(rng);
                free
            })
            .collect();
        let mut drawn: Vec<ChallengeIndex> = Vec::with_capacity(count);

        // Even split; the first `count % k` topics that have anything left take one extra.
        let share = count / requested.len();
        let mut extra = count % requested.len();
        for pool in pools.iter_mut().filter(|pool| !pool.is_empty()) {
            let want = share + usize::from(extra > 0);
            extra = extra.saturating_sub(1);
            let take = want.min(pool.len());
            drawn.extend(pool.drain(..take));
        }
        debug!(drawn = drawn.len(), share, "Even split drawn");

        for pool in pools.iter_mut() {
            if drawn.len() >= count {
                break;
            }
            let take = (count - drawn.len()).min(pool.len());
            drawn.extend(pool.drain(..take));
        }

        if drawn.len() < count {
            let mut outside: Vec<ChallengeIndex> = self
                .topic_info
                .values()
                .filter(|info| !requested.contains(&info.name().as_str()))
                .flat_map(|info| info.challenge_indices().iter().copied())
                .filter(|&i| self.status[i] == ChallengeStatus::InReserve)
                .collect();
            outside.shuffle(rng);
            let take = (count - drawn.len()).min(outside.len());
            warn!(take, "Drawing from topics outside the request");
            drawn.extend(outside.drain(..take));
        }

        if drawn.len() < count {
            return Err(AllocationError::InsufficientChallenges(drawn.len()));
        }

        let mut per_topic: BTreeMap<String, usize> = BTreeMap::new();
        for &index in &drawn {
            self.status[index] = ChallengeStatus::Allocated;
            *per_topic
                .entry(self.challenges[index].topic.clone())
                .or_default() += 1;
        }
        for (topic, k) in &per_topic {
            if let Some(info) = self.topic_info.get_mut(topic) {
                info.record_allocated(*k);
            }
        }

        drawn.shuffle(rng);
        self.assert_consistent("allocate");
        info!(count, ?per_topic, "Challenges allocated");
        Ok(drawn)
    }

    /// Returns allocated challenges to reserve.
    ///
    /// Every index must be in range, currently `Allocated`, and listed once;
    /// otherwise all offending indices are reported and nothing changes.
    /// Freed indices move to the end of their topic's index list.
    #[instrument(skip(self), fields(count = indices.len()))]
    pub fn deallocate(&mut self, indices: &[ChallengeIndex]) -> Result<(), AllocationError> {
        let mut seen = HashSet::new();
        let mut invalid: Vec<ChallengeIndex> = indices
            .iter()
            .copied()
            .filter(|&i| !seen.insert(i) || self.status(i) != Some(ChallengeStatus::Allocated))
            .collect();
        if !invalid.is_empty() {
            invalid.sort_unstable();
            invalid.dedup();
            warn!(?invalid, "Rejected deallocation");
            return Err(AllocationError::InvalidDeallocIndices(invalid));
        }

        for &index in indices {
            self.status[index] = ChallengeStatus::InReserve;
            let topic = &self.challenges[index].topic;
            if let Some(info) = self.topic_info.get_mut(topic) {
                info.record_released(index);
            }
        }

        self.assert_consistent("deallocate");
        debug!("Challenges returned to reserve");
        Ok(())
    }

    /// Swaps an allocated challenge for a reserve challenge of the same topic.
    ///
    /// The replacement is the last reserve challenge in the topic's index list.
    /// The original becomes `Abandoned`. There is no cross-topic fallback:
    /// an exhausted topic fails with `InsufficientChallenges(1)`.
    #[instrument(skip(self))]
    pub fn replace(&mut self, index: ChallengeIndex) -> Result<ChallengeIndex, AllocationError> {
        if self.status(index) != Some(ChallengeStatus::Allocated) {
            warn!("Replacement requested for unallocated challenge");
            return Err(AllocationError::InvalidIndex(index));
        }

        let topic = self.challenges[index].topic.clone();
        let replacement = self.topic_info.get(&topic).and_then(|info| {
            info.challenge_indices()
                .iter()
                .rev()
                .copied()
                .find(|&i| self.status[i] == ChallengeStatus::InReserve)
        });
        let Some(replacement) = replacement else {
            warn!(%topic, "No reserve challenge left in topic");
            return Err(AllocationError::InsufficientChallenges(1));
        };

        self.status[index] = ChallengeStatus::Abandoned;
        self.status[replacement] = ChallengeStatus::Allocated;
        if let Some(info) = self.topic_info.get_mut(&topic) {
            info.record_replaced();
        }

        self.assert_consistent("replace");
        info!(%topic, replacement, "Challenge replaced");
        Ok(replacement)
    }

    /// Records an answer for an allocated challenge.
    #[instrument(skip(self, details))]
    pub fn mark_answered(
        &mut self,
        index: ChallengeIndex,
        correct: bool,
        details: AnswerDetails,
    ) -> Result<&AnsweredRecord, AllocationError> {
        if self.status(index) != Some(ChallengeStatus::Allocated) {
            warn!("Answer recorded for unallocated challenge");
            return Err(AllocationError::InvalidIndex(index));
        }

        let outcome = if correct {
            ChallengeStatus::PlayedCorrectly
        } else {
            ChallengeStatus::PlayedIncorrectly
        };
        let (topic, id) = {
            let challenge = &self.challenges[index];
            (challenge.topic.clone(), challenge.id.clone())
        };

        self.status[index] = outcome;
        if let Some(info) = self.topic_info.get_mut(&topic) {
            info.record_answer(correct);
        }
        let record = AnsweredRecord::from_details(id.clone(), outcome, details);

        self.assert_consistent("mark_answered");
        debug!(%topic, %id, %outcome, "Answer recorded");

        let slot = match self.answered.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(record);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(record),
        };
        Ok(slot)
    }

    /// Puts every challenge back in reserve and clears the answer log.
    #[instrument(skip(self))]
    pub fn reset_all(&mut self) {
        self.status.fill(ChallengeStatus::InReserve);
        self.topic_info.values_mut().for_each(TopicInfo::reset);
        self.answered.clear();
        self.assert_consistent("reset_all");
        info!("Inventory reset");
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Number of challenges in the pool.
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    /// True if the pool holds no challenges.
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    /// The challenge at `index`.
    pub fn challenge(&self, index: ChallengeIndex) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    /// All challenges, by index.
    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    /// Status of the challenge at `index`.
    pub fn status(&self, index: ChallengeIndex) -> Option<ChallengeStatus> {
        self.status.get(index).copied()
    }

    /// All statuses, by index.
    pub fn statuses(&self) -> &[ChallengeStatus] {
        &self.status
    }

    /// Number of challenges with `status`, across the whole pool.
    pub fn count(&self, status: ChallengeStatus) -> usize {
        self.status.iter().filter(|&&s| s == status).count()
    }

    /// The counter for `status` in `topic`, if the topic is tracked.
    pub fn count_for_topic(&self, topic: &str, status: ChallengeStatus) -> Option<usize> {
        self.topic_info.get(topic).map(|info| info.count_of(status))
    }

    /// Free challenges across `topics`, counting each distinct known topic once.
    pub fn free_count_for(&self, topics: &[String]) -> usize {
        let distinct: HashSet<&str> = topics.iter().map(String::as_str).collect();
        distinct
            .into_iter()
            .filter_map(|t| self.topic_info.get(t))
            .map(|info| *info.free_count())
            .sum()
    }

    /// Counters for `topic`.
    pub fn topic_info(&self, topic: &str) -> Option<&TopicInfo> {
        self.topic_info.get(topic)
    }

    /// All tracked topics, in name order.
    pub fn topics(&self) -> impl Iterator<Item = &TopicInfo> {
        self.topic_info.values()
    }

    /// Names of all tracked topics, in name order.
    pub fn topic_names(&self) -> Vec<String> {
        self.topic_info.keys().cloned().collect()
    }

    /// The logged answer for challenge `id`.
    pub fn answered(&self, id: &str) -> Option<&AnsweredRecord> {
        self.answered.get(id)
    }

    /// The whole answer log, keyed by challenge id.
    pub fn answered_log(&self) -> &BTreeMap<String, AnsweredRecord> {
        &self.answered
    }

    fn free_indices(&self, topic: &str) -> Vec<ChallengeIndex> {
        self.topic_info
            .get(topic)
            .map(|info| {
                info.challenge_indices()
                    .iter()
                    .copied()
                    .filter(|&i| self.status[i] == ChallengeStatus::InReserve)
                    .collect()
            })
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────
    //  Consistency and persistence
    // ─────────────────────────────────────────────────────────────

    /// Runs every invariant; an empty result means the inventory is consistent.
    pub fn verify(&self) -> Vec<InvariantViolation> {
        invariants::verify(self)
    }

    fn assert_consistent(&self, operation: &'static str) {
        let violations = self.verify();
        if violations.is_empty() {
            return;
        }
        for violation in &violations {
            error!(operation, violation = %violation.description, "Inventory invariant violated");
        }
        debug_assert!(
            violations.is_empty(),
            "inventory inconsistent after {}: {:?}",
            operation,
            violations
        );
    }

    /// Plain serializable copy of the mutable state.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            statuses: self.status.clone(),
            topic_info: self.topic_info.clone(),
            answered: self.answered.clone(),
        }
    }

    /// Rebuilds an inventory from content plus a previously taken snapshot.
    #[instrument(skip(play_data, snapshot))]
    pub fn from_snapshot(
        play_data: &PlayData,
        snapshot: InventorySnapshot,
    ) -> Result<Self, SnapshotError> {
        let mut inventory = Self::new(play_data);

        if snapshot.statuses.len() != inventory.challenges.len() {
            return Err(SnapshotError::StatusCount {
                expected: inventory.challenges.len(),
                found: snapshot.statuses.len(),
            });
        }
        let expected = inventory.topic_names();
        let found: Vec<String> = snapshot.topic_info.keys().cloned().collect();
        if expected != found {
            return Err(SnapshotError::TopicMismatch { expected, found });
        }

        inventory.status = snapshot.statuses;
        inventory.topic_info = snapshot.topic_info;
        inventory.answered = snapshot.answered;

        let violations = inventory.verify();
        if !violations.is_empty() {
            warn!(count = violations.len(), "Snapshot rejected");
            return Err(SnapshotError::Inconsistent(
                violations.into_iter().map(|v| v.description).collect(),
            ));
        }

        info!(
            allocated = inventory.count(ChallengeStatus::Allocated),
            answered = inventory.answered.len(),
            "Inventory restored"
        );
        Ok(inventory)
    }
}
