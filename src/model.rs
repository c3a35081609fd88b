//! Data model shared with the remote scoring API
//!
//! Everything in this module mirrors a JSON document that is either received
//! from the server or sent to it. The client never mutates an [`Outcome`] or a
//! [`Summary`]; it only stores and displays them.

use garde::Validate;
use heck::ToTitleCase;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::constants::player::{MAX_NAME_LENGTH, MAX_SUBJECT_KEY_LENGTH};

/// Opaque token identifying a server-held quiz session
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Returns the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a single generated question
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Returns the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A question as delivered by the server
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier echoed back on submission
    pub id: QuestionId,
    /// Subject key the question belongs to
    pub subject: String,
    /// The question text
    pub prompt: String,
    /// Optional pre-rendered diagram fragment
    #[serde(default)]
    pub diagram_html: Option<String>,
}

/// Running statistics of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Points earned so far
    pub score: u32,
    /// Lives left before the session ends
    pub lives: i32,
    /// One-based index of the question being played
    pub current_question: u32,
    /// Number of questions planned for the session
    pub total_questions: u32,
    /// Answers that were wrong or timed out
    #[serde(default)]
    pub mistakes: u32,
    /// Mean seconds spent per answered question
    pub average_time_seconds: f64,
}

/// Server verdict on a single submitted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the answer was accepted
    pub correct: bool,
    /// Whether the question ran out of time
    pub timed_out: bool,
    /// The answer as the server recorded it
    #[serde(default)]
    pub your_answer: String,
    /// Canonical form of the expected answer
    pub correct_answer: String,
    /// Short explanation of the expected answer
    pub explanation: String,
}

/// One row of the per-question review in a [`Summary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// One-based question number
    pub question_no: u32,
    /// Subject key of the question
    pub subject: String,
    /// The question text
    pub prompt: String,
    /// What the player submitted, possibly empty
    pub your_answer: String,
    /// Canonical form of the expected answer
    pub correct_answer: String,
    /// Whether the answer was accepted
    pub correct: bool,
    /// Short explanation of the expected answer
    pub explanation: String,
    /// Seconds the server charged for the answer
    pub elapsed_seconds: f64,
    /// Whether the question ran out of time
    pub timed_out: bool,
}

/// A ranked row of the historical leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    /// One-based rank
    pub rank: u32,
    /// Player name
    pub name: String,
    /// Player age
    pub age: u32,
    /// School grade derived by the server
    pub grade: String,
    /// Final score
    pub score: u32,
    /// Number of questions in that session
    pub total_questions: u32,
    /// Mean seconds per question
    pub avg_time_seconds: f64,
    /// Comma separated subject list
    pub subjects: String,
}

/// Terminal report produced when a session ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Final score
    pub score: u32,
    /// Number of questions in the session
    pub total_questions: u32,
    /// Answers that were wrong or timed out
    pub mistakes: u32,
    /// Mean seconds per answered question
    pub average_time_seconds: f64,
    /// Per-question review
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    /// Leaderboard snapshot taken when the session ended
    #[serde(default)]
    pub leaderboard: Vec<ScoreboardEntry>,
}

impl Summary {
    /// Builds a summary out of the final statistics
    ///
    /// Used when a finished response arrives without a summary, so the results
    /// screen still shows the final score.
    pub fn from_stats(stats: &Stats) -> Self {
        Self {
            score: stats.score,
            total_questions: stats.total_questions,
            mistakes: stats.mistakes,
            average_time_seconds: stats.average_time_seconds,
            answers: Vec::new(),
            leaderboard: Vec::new(),
        }
    }
}

/// A subject offered by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInfo {
    /// Key sent back when starting a session
    pub key: String,
    /// Human readable label
    #[serde(default)]
    pub label: String,
}

impl SubjectInfo {
    /// Returns the label, or the title-cased key when the server sent none
    pub fn display_label(&self) -> String {
        if self.label.trim().is_empty() {
            self.key.to_title_case()
        } else {
            self.label.clone()
        }
    }
}

/// Body of `GET /subjects`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectList {
    /// Offered subjects in display order
    #[serde(default)]
    pub subjects: Vec<SubjectInfo>,
}

/// Body of `POST /sessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    /// Trimmed player name
    #[garde(length(chars, min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    /// Player age, range checked by the server
    #[garde(skip)]
    pub age: i64,
    /// Selected subject keys
    #[garde(length(min = 1), inner(length(chars, min = 1, max = MAX_SUBJECT_KEY_LENGTH)))]
    pub subjects: Vec<String>,
}

/// Response of `POST /sessions`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartSessionResponse {
    /// Token for the new session
    pub session_id: SessionId,
    /// Initial statistics
    pub stats: Stats,
    /// First question
    pub question: Question,
    /// Name as the server stored it
    #[serde(default)]
    pub player_name: Option<String>,
    /// Grade derived from the age
    #[serde(default)]
    pub grade: Option<String>,
}

/// Body of `POST /sessions/{id}/answer`
///
/// Built exactly once per question and sent at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    /// The question being answered
    pub question_id: QuestionId,
    /// Raw answer text, empty on timeout
    pub answer: String,
    /// Whole seconds spent, clamped to the ceiling
    pub elapsed_seconds: u64,
}

/// Response of `POST /sessions/{id}/answer`
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Whether the session ended with this answer
    pub finished: bool,
    /// Verdict on the answer
    pub outcome: Outcome,
    /// Refreshed statistics
    pub stats: Stats,
    /// Next question, present while the session continues
    #[serde(default)]
    pub next_question: Option<Question>,
    /// Terminal report, present once the session ended
    #[serde(default)]
    pub summary: Option<Summary>,
}
