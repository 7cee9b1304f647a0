//! Serializable inventory state.

use crate::answered::AnsweredRecord;
use crate::status::ChallengeStatus;
use crate::topic_info::TopicInfo;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The mutable part of a [`crate::ChallengeInventory`]; content is reloaded separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Status per challenge index.
    pub statuses: Vec<ChallengeStatus>,
    /// Counters per topic.
    pub topic_info: BTreeMap<String, TopicInfo>,
    /// Answer log keyed by challenge id.
    pub answered: BTreeMap<String, AnsweredRecord>,
}
