//! Screen descriptions
//!
//! [`render`] is a pure function from controller state to what the host
//! should display. It performs no I/O and never changes the controller, so
//! the same state always yields the same screen.

use itertools::Itertools;
use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::{
    controller::{Controller, Round, State},
    feedback::{Feedback, FeedbackKind, Verdict},
    model::{AnswerRecord, ScoreboardEntry, Stats, Summary},
    timer::{format_seconds, format_time},
};

/// One of the three screens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Screen {
    /// Player form and leaderboard
    Start(StartScreen),
    /// Question, countdown and feedback
    Playing(PlayingScreen),
    /// Final score, answer review and leaderboard
    Results(ResultsScreen),
}

/// A checkbox on the start screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectOption {
    /// Value submitted with the form
    pub key: String,
    /// Visible label
    pub label: String,
    /// Whether the box starts ticked
    pub checked: bool,
}

/// A leaderboard row ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardRow {
    /// Rank
    pub rank: u32,
    /// Player name
    pub name: String,
    /// Player age
    pub age: u32,
    /// School grade
    pub grade: String,
    /// `score/total`
    pub score: String,
    /// Average time as `m:ss`
    pub average: String,
    /// Subject list
    pub subjects: String,
}

impl From<&ScoreboardEntry> for ScoreboardRow {
    fn from(entry: &ScoreboardEntry) -> Self {
        Self {
            rank: entry.rank,
            name: entry.name.clone(),
            age: entry.age,
            grade: entry.grade.clone(),
            score: format!("{}/{}", entry.score, entry.total_questions),
            average: format_time(entry.avg_time_seconds),
            subjects: entry.subjects.clone(),
        }
    }
}

/// Start screen
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartScreen {
    /// Subject checkboxes
    pub subjects: Vec<SubjectOption>,
    /// Leaderboard, empty until loaded
    pub scoreboard: Vec<ScoreboardRow>,
    /// Inline error under the form
    pub error: Option<String>,
}

/// The stats bar above the question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsLine {
    /// `current/total`
    pub question: String,
    /// Score
    pub score: String,
    /// Lives left
    pub lives: String,
    /// Countdown as `m:ss`
    pub timer: String,
    /// Average time as `m:ss`
    pub average: String,
}

impl StatsLine {
    fn new(stats: &Stats, timer_seconds: u64) -> Self {
        Self {
            question: format!("{}/{}", stats.current_question, stats.total_questions),
            score: stats.score.to_string(),
            lives: stats.lives.to_string(),
            timer: format_seconds(timer_seconds),
            average: format_time(stats.average_time_seconds),
        }
    }
}

/// The feedback box
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackView {
    /// Colour of the box
    pub kind: FeedbackKind,
    /// Verdict, absent for errors
    pub verdict: Option<Verdict>,
    /// Expected answer, shown for wrong and timed out answers
    pub correct_answer: Option<String>,
    /// Explanation, or the error message
    pub detail: String,
    /// The whole line as plain text
    pub message: String,
}

impl From<&Feedback> for FeedbackView {
    fn from(feedback: &Feedback) -> Self {
        let (correct_answer, detail) = match feedback {
            Feedback::Outcome(outcome) if outcome.correct => (None, outcome.explanation.clone()),
            Feedback::Outcome(outcome) => (
                Some(outcome.correct_answer.clone()),
                outcome.explanation.clone(),
            ),
            Feedback::Error(message) => (None, message.clone()),
        };
        Self {
            kind: feedback.kind(),
            verdict: feedback.verdict(),
            correct_answer,
            detail,
            message: feedback.message(),
        }
    }
}

/// Game screen
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayingScreen {
    /// Stats bar
    pub stats: StatsLine,
    /// Upper-cased subject tag
    pub subject: String,
    /// Question text
    pub prompt: String,
    /// Diagram fragment, inserted as is
    pub diagram_html: Option<String>,
    /// Whether the answer input accepts text
    pub answer_enabled: bool,
    /// Whether an answer is in flight
    pub submitting: bool,
    /// Feedback for the last submission
    pub feedback: Option<FeedbackView>,
    /// Whether the "next question" control is shown
    pub show_next: bool,
}

/// A row of the answer review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerReviewRow {
    /// Question number
    pub question_no: u32,
    /// Subject key
    pub subject: String,
    /// Question text
    pub prompt: String,
    /// Submitted answer, `-` when empty
    pub your_answer: String,
    /// Expected answer
    pub correct_answer: String,
    /// Whether the answer was accepted
    pub correct: bool,
    /// Explanation, prefixed when the question timed out
    pub note: String,
}

impl From<&AnswerRecord> for AnswerReviewRow {
    fn from(record: &AnswerRecord) -> Self {
        let your_answer = if record.your_answer.is_empty() {
            "-".to_owned()
        } else {
            record.your_answer.clone()
        };
        let prefix = if record.timed_out { "Timed out. " } else { "" };
        Self {
            question_no: record.question_no,
            subject: record.subject.clone(),
            prompt: record.prompt.clone(),
            your_answer,
            correct_answer: record.correct_answer.clone(),
            correct: record.correct,
            note: format!("{prefix}{}", record.explanation),
        }
    }
}

/// Results screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsScreen {
    /// `Final score: S / T`
    pub headline: String,
    /// `Mistakes: M, average time: m:ss`
    pub meta: String,
    /// Per-question review
    pub answers: Vec<AnswerReviewRow>,
    /// Leaderboard snapshot from the summary
    pub leaderboard: Vec<ScoreboardRow>,
}

impl From<&Summary> for ResultsScreen {
    fn from(summary: &Summary) -> Self {
        Self {
            headline: format!(
                "Final score: {} / {}",
                summary.score, summary.total_questions
            ),
            meta: format!(
                "Mistakes: {}, average time: {}",
                summary.mistakes,
                format_time(summary.average_time_seconds)
            ),
            answers: summary.answers.iter().map_into().collect_vec(),
            leaderboard: summary.leaderboard.iter().map_into().collect_vec(),
        }
    }
}

/// Describes what the host should show for the controller's state
pub fn render<A, C>(controller: &Controller<A, C>) -> Screen
where
    A: crate::api::QuizApi,
    C: crate::clock::Clock,
{
    let feedback = controller.feedback().map(FeedbackView::from);
    let playing = |round: &Round, answer_enabled, submitting, show_next| {
        let question = round.question();
        Screen::Playing(PlayingScreen {
            stats: StatsLine::new(round.stats(), controller.timer_seconds()),
            subject: question.subject.to_uppercase(),
            prompt: question.prompt.clone(),
            diagram_html: question.diagram_html.clone(),
            answer_enabled,
            submitting,
            feedback: feedback.clone(),
            show_next,
        })
    };

    match controller.state() {
        State::Idle => {
            let selected = controller.default_selection();
            Screen::Start(StartScreen {
                subjects: controller
                    .subjects()
                    .iter()
                    .map(|subject| SubjectOption {
                        key: subject.key.clone(),
                        label: subject.display_label(),
                        checked: selected.contains(&subject.key),
                    })
                    .collect_vec(),
                scoreboard: controller.scoreboard().iter().map_into().collect_vec(),
                error: controller.start_error().map(str::to_owned),
            })
        }
        State::AwaitingAnswer(round) => playing(round, true, false, false),
        State::Submitting(round) => playing(round, false, true, false),
        State::AwaitingNext { round, next } => playing(round, false, false, next.is_some()),
        State::Finished { summary, .. } => Screen::Results(ResultsScreen::from(summary)),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn record(your_answer: &str, timed_out: bool) -> AnswerRecord {
        AnswerRecord {
            question_no: 2,
            subject: "maths".to_owned(),
            prompt: "7 x 6".to_owned(),
            your_answer: your_answer.to_owned(),
            correct_answer: "42".to_owned(),
            correct: false,
            explanation: "Times tables.".to_owned(),
            elapsed_seconds: 180.,
            timed_out,
        }
    }

    #[test]
    fn test_review_row_for_timeout() {
        let row = AnswerReviewRow::from(&record("", true));

        assert_eq!(row.your_answer, "-");
        assert_eq!(row.note, "Timed out. Times tables.");
    }

    #[test]
    fn test_review_row_for_wrong_answer() {
        let row = AnswerReviewRow::from(&record("41", false));

        assert_eq!(row.your_answer, "41");
        assert_eq!(row.note, "Times tables.");
    }

    #[test]
    fn test_results_screen_text() {
        let summary = Summary {
            score: 8,
            total_questions: 10,
            mistakes: 2,
            average_time_seconds: 65.4,
            answers: vec![record("", true)],
            leaderboard: vec![ScoreboardEntry {
                rank: 1,
                name: "Ada".to_owned(),
                age: 12,
                grade: "7".to_owned(),
                score: 8,
                total_questions: 10,
                avg_time_seconds: 65.4,
                subjects: "maths".to_owned(),
            }],
        };

        let screen = ResultsScreen::from(&summary);

        assert_eq!(screen.headline, "Final score: 8 / 10");
        assert_eq!(screen.meta, "Mistakes: 2, average time: 1:05");
        assert_eq!(screen.answers.len(), 1);
        assert_eq!(screen.leaderboard[0].score, "8/10");
        assert_eq!(screen.leaderboard[0].average, "1:05");
    }

    #[test]
    fn test_feedback_view_for_wrong_answer() {
        let feedback = Feedback::Outcome(crate::model::Outcome {
            correct: false,
            timed_out: false,
            your_answer: "41".to_owned(),
            correct_answer: "42".to_owned(),
            explanation: "Times tables.".to_owned(),
        });

        let view = FeedbackView::from(&feedback);

        assert_eq!(view.kind, FeedbackKind::Bad);
        assert_eq!(view.verdict, Some(Verdict::Wrong));
        assert_eq!(view.correct_answer.as_deref(), Some("42"));
        assert_eq!(view.message, "Wrong. Correct answer: 42. Times tables.");
    }
}
