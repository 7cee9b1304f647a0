//! Content model: the immutable pool of challenges loaded at startup.
//!
//! The JSON layout uses camelCase keys so content files produced by the
//! authoring tools load without translation.

use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// A single trivia question. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// Question text.
    pub question: String,
    /// Topic name this challenge belongs to.
    pub topic: String,
    /// Hint shown on request.
    pub hint: String,
    /// Answer choices.
    pub answers: Vec<String>,
    /// The correct choice, verbatim from `answers`.
    pub correct: String,
    /// Optional explanation shown after answering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Stable identifier.
    pub id: String,
    /// Creation time.
    pub date: DateTime<Utc>,
    /// Who or what generated the challenge.
    #[serde(rename = "aisource")]
    pub ai_source: String,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Challenge {
    /// True if `answer` matches the correct choice.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct == answer
    }
}

/// Catalog entry for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct BasicTopic {
    /// Topic name, the key challenges refer to.
    pub name: String,
    /// Broader subject.
    #[new(default)]
    #[serde(default)]
    pub subject: String,
    /// Artwork name.
    #[new(default)]
    #[serde(default)]
    pub pic: String,
    /// Notes.
    #[new(default)]
    #[serde(default)]
    pub notes: String,
    /// Subtopics.
    #[new(default)]
    #[serde(default)]
    pub subtopics: Vec<String>,
}

/// The topic catalog with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicGroup {
    /// Catalog description.
    pub description: String,
    /// Catalog version.
    pub version: String,
    /// Catalog author.
    pub author: String,
    /// Catalog date, as authored.
    pub date: String,
    /// Topics in display order.
    pub topics: Vec<BasicTopic>,
}

/// A batch of challenges generated for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    /// Batch identifier.
    pub id: String,
    /// Topic of every challenge in the batch.
    pub topic: String,
    /// The challenges.
    pub challenges: Vec<Challenge>,
    /// Generation time.
    pub generated: DateTime<Utc>,
    /// Artwork name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    /// Commentary from the generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

/// Everything the game needs to play: the catalog and all challenge batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayData {
    /// Topic catalog.
    pub topic_data: TopicGroup,
    /// Challenge batches.
    pub game_datum: Vec<GameData>,
    /// Identifier of this blend of content.
    pub play_data_id: String,
    /// When the blend was produced.
    pub blend_date: DateTime<Utc>,
    /// Artwork name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
}

impl PlayData {
    /// All challenges flattened in batch order. Positions in this list are challenge indices.
    pub fn every_challenge(&self) -> Vec<Challenge> {
        self.game_datum
            .iter()
            .flat_map(|batch| batch.challenges.iter().cloned())
            .collect()
    }

    /// Topic names from the catalog, in catalog order.
    pub fn all_topics(&self) -> Vec<String> {
        self.topic_data
            .topics
            .iter()
            .map(|topic| topic.name.clone())
            .collect()
    }

    /// Parses content from JSON text.
    #[instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let data: Self = serde_json::from_str(json)
            .map_err(|e| ContentError::new(format!("Failed to parse content: {}", e)))?;
        debug!(
            play_data_id = %data.play_data_id,
            topics = data.topic_data.topics.len(),
            batches = data.game_datum.len(),
            "Content parsed"
        );
        Ok(data)
    }

    /// Loads content from a JSON file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ContentError::new(format!("Failed to read content file: {}", e)))?;
        let data = Self::from_json(&json)?;
        info!(play_data_id = %data.play_data_id, "Content loaded");
        Ok(data)
    }
}

/// Content loading error.
#[derive(Debug, Clone, Display, Error)]
#[display("Content error: {} at {}:{}", message, file, line)]
pub struct ContentError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ContentError {
    /// Creates a new content error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::seed_play_data;
    use std::io::Write;

    #[test]
    fn test_json_uses_camel_case_keys() {
        let data = seed_play_data(&["History"], 1);
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"topicData\""));
        assert!(json.contains("\"gameDatum\""));
        assert!(json.contains("\"aisource\""));

        let back = PlayData::from_json(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_every_challenge_flattens_in_order() {
        let data = seed_play_data(&["History", "Science"], 3);
        let all = data.every_challenge();
        assert_eq!(all.len(), 6);
        assert!(all[..3].iter().all(|c| c.topic == "History"));
        assert!(all[3..].iter().all(|c| c.topic == "Science"));
        assert_eq!(data.all_topics(), vec!["History", "Science"]);
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = PlayData::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("Failed to parse content"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = PlayData::from_file("/nonexistent/kwanduh/content.json").unwrap_err();
        assert!(err.message.contains("Failed to read content file"));
    }
}
