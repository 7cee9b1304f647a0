//! Built-in placeholder content.
//!
//! Lets the game run (and the tests exercise real inventories) without an
//! authored content file.

use crate::content::{BasicTopic, Challenge, GameData, PlayData, TopicGroup};
use chrono::{DateTime, Utc};
use tracing::instrument;

/// Topics used when no content file is configured.
pub const DEFAULT_TOPICS: [&str; 4] = ["History", "Science", "Geography", "Music"];

/// Fixed timestamp so seed content is identical across runs.
fn seed_date() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default()
}

/// Builds content with `per_topic` placeholder challenges for each of `topics`.
///
/// Challenge ids are `"<topic>-<n>"`, and the correct answer is always the
/// first choice.
#[instrument]
pub fn seed_play_data(topics: &[&str], per_topic: usize) -> PlayData {
    let date = seed_date();
    let game_datum = topics
        .iter()
        .map(|&topic| GameData {
            id: format!("seed-{}", topic.to_lowercase()),
            topic: topic.to_string(),
            challenges: (0..per_topic)
                .map(|n| seed_challenge(topic, n, date))
                .collect(),
            generated: date,
            pic: None,
            commentary: Some("placeholder content".into()),
        })
        .collect();

    PlayData {
        topic_data: TopicGroup {
            description: "Placeholder topics".into(),
            version: "0.1.0".into(),
            author: "kwanduh".into(),
            date: date.format("%Y-%m-%d").to_string(),
            topics: topics
                .iter()
                .map(|&name| BasicTopic::new(name.to_string()))
                .collect(),
        },
        game_datum,
        play_data_id: "seed".into(),
        blend_date: date,
        pic: None,
    }
}

fn seed_challenge(topic: &str, n: usize, date: DateTime<Utc>) -> Challenge {
    let answers: Vec<String> = (1..=4)
        .map(|choice| format!("{} answer {}.{}", topic, n, choice))
        .collect();
    Challenge {
        question: format!("{} question #{}?", topic, n),
        topic: topic.to_string(),
        hint: format!("Think about {}.", topic.to_lowercase()),
        correct: answers[0].clone(),
        answers,
        explanation: None,
        id: format!("{}-{}", topic.to_lowercase(), n),
        date,
        ai_source: "seed".into(),
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_ids_are_unique() {
        let data = seed_play_data(&DEFAULT_TOPICS, 10);
        let mut ids: Vec<_> = data.every_challenge().into_iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 40);
    }

    #[test]
    fn test_seed_correct_answer_is_a_choice() {
        let data = seed_play_data(&["Music"], 2);
        for challenge in data.every_challenge() {
            assert!(challenge.answers.contains(&challenge.correct));
            assert!(challenge.is_correct(&challenge.answers[0]));
            assert!(!challenge.is_correct(&challenge.answers[1]));
        }
    }
}
