//! Feedback shown under the answer input

use serde::Serialize;

use crate::model::Outcome;

/// How the server judged an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The answer was accepted
    Correct,
    /// The question ran out of time
    TimeUp,
    /// The answer was rejected
    Wrong,
}

impl Verdict {
    /// Classifies an outcome; a timeout wins over a plain wrong answer
    pub fn of(outcome: &Outcome) -> Self {
        if outcome.correct {
            Self::Correct
        } else if outcome.timed_out {
            Self::TimeUp
        } else {
            Self::Wrong
        }
    }

    /// Leading word of the feedback line
    pub fn headline(self) -> &'static str {
        match self {
            Self::Correct => "Correct.",
            Self::TimeUp => "Time up.",
            Self::Wrong => "Wrong.",
        }
    }
}

/// Styling hint for the feedback box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackKind {
    /// Green
    Good,
    /// Red
    Bad,
}

/// What the controller wants to tell the player after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    /// The server judged the answer
    Outcome(Outcome),
    /// The submission failed; the message comes from the error
    Error(String),
}

impl Feedback {
    /// Green for correct answers, red for everything else
    pub fn kind(&self) -> FeedbackKind {
        match self {
            Self::Outcome(outcome) if outcome.correct => FeedbackKind::Good,
            Self::Outcome(_) | Self::Error(_) => FeedbackKind::Bad,
        }
    }

    /// The verdict, when the server produced one
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::Outcome(outcome) => Some(Verdict::of(outcome)),
            Self::Error(_) => None,
        }
    }

    /// Plain-text feedback line
    pub fn message(&self) -> String {
        match self {
            Self::Outcome(outcome) => match Verdict::of(outcome) {
                Verdict::Correct => format!("Correct. {}", outcome.explanation),
                verdict => format!(
                    "{} Correct answer: {}. {}",
                    verdict.headline(),
                    outcome.correct_answer,
                    outcome.explanation
                ),
            },
            Self::Error(message) => message.clone(),
        }
    }
}
