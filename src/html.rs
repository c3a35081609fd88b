//! HTML fragments for DOM hosts
//!
//! Hosts that paint the screens with `innerHTML` can use these helpers
//! instead of building markup by hand. Every string coming from the server
//! or the player is escaped; only the diagram fragment of a question is
//! passed through untouched, and that one is not rendered here.

use std::fmt::Write as _;

use html_escape::encode_double_quoted_attribute as escape;
use itertools::Itertools;

use crate::{
    feedback::{FeedbackKind, Verdict},
    view::{AnswerReviewRow, FeedbackView, ScoreboardRow, SubjectOption},
};

/// Class name used for good/bad styling
fn class_of(kind: FeedbackKind) -> &'static str {
    match kind {
        FeedbackKind::Good => "good",
        FeedbackKind::Bad => "bad",
    }
}

/// Leaderboard table, or a placeholder when there are no rows
pub fn scoreboard_table(rows: &[ScoreboardRow]) -> String {
    if rows.is_empty() {
        return "<p class='muted'>No scores yet.</p>".to_owned();
    }

    let body = rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.rank,
                escape(&row.name),
                row.age,
                escape(&row.grade),
                escape(&row.score),
                escape(&row.average),
                escape(&row.subjects),
            )
        })
        .join("");

    format!(
        "<table><thead><tr><th>#</th><th>Name</th><th>Age</th><th>Grade</th><th>Score</th><th>Avg</th><th>Subjects</th></tr></thead><tbody>{body}</tbody></table>"
    )
}

/// Per-question review, or a placeholder when nothing was answered
pub fn answer_review(rows: &[AnswerReviewRow]) -> String {
    if rows.is_empty() {
        return "<p class='muted'>No answers recorded.</p>".to_owned();
    }

    rows.iter().fold(String::new(), |mut out, row| {
        let class = if row.correct { "good" } else { "bad" };
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "<div class=\"answer-row {class}\"><div><strong>{}. [{}]</strong> {}</div><div>Your answer: {} | Correct: <strong>{}</strong></div><div>{}</div></div>",
            row.question_no,
            escape(&row.subject),
            escape(&row.prompt),
            escape(&row.your_answer),
            escape(&row.correct_answer),
            escape(&row.note),
        );
        out
    })
}

/// Inner markup of the feedback box
pub fn feedback(view: &FeedbackView) -> String {
    match (view.verdict, &view.correct_answer) {
        (Some(Verdict::Correct), _) => {
            format!("<strong>Correct.</strong> {}", escape(&view.detail))
        }
        (Some(verdict), Some(correct_answer)) => format!(
            "<strong>{}</strong> Correct answer: <strong>{}</strong>. {}",
            verdict.headline(),
            escape(correct_answer),
            escape(&view.detail),
        ),
        _ => escape(&view.message).into_owned(),
    }
}

/// Whole feedback box including its styling class
pub fn feedback_box(view: &FeedbackView) -> String {
    format!(
        "<div class=\"feedback {}\">{}</div>",
        class_of(view.kind),
        feedback(view)
    )
}

/// Subject checkboxes for the start form
pub fn subject_grid(options: &[SubjectOption]) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                "<label class=\"subject-item\"><input type=\"checkbox\" name=\"subject\" value=\"{}\"{} /><span>{}</span></label>",
                escape(&option.key),
                if option.checked { " checked" } else { "" },
                escape(&option.label),
            )
        })
        .join("")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn row(name: &str) -> ScoreboardRow {
        ScoreboardRow {
            rank: 1,
            name: name.to_owned(),
            age: 12,
            grade: "7".to_owned(),
            score: "8/10".to_owned(),
            average: "0:12".to_owned(),
            subjects: "maths, physics".to_owned(),
        }
    }

    #[test]
    fn test_empty_placeholders() {
        assert_eq!(scoreboard_table(&[]), "<p class='muted'>No scores yet.</p>");
        assert_eq!(answer_review(&[]), "<p class='muted'>No answers recorded.</p>");
    }

    #[test]
    fn test_scoreboard_escapes_names() {
        let html = scoreboard_table(&[row("<b>Bobby \"Tables\"</b> & co")]);

        assert!(html.contains("&lt;b&gt;Bobby &quot;Tables&quot;&lt;/b&gt; &amp; co"));
        assert!(html.contains("<td>8/10</td>"));
        assert!(!html.contains("<b>Bobby"));
    }

    #[test]
    fn test_feedback_markup() {
        let wrong = FeedbackView {
            kind: FeedbackKind::Bad,
            verdict: Some(Verdict::TimeUp),
            correct_answer: Some("<42>".to_owned()),
            detail: "Because.".to_owned(),
            message: String::new(),
        };
        assert_eq!(
            feedback(&wrong),
            "<strong>Time up.</strong> Correct answer: <strong>&lt;42&gt;</strong>. Because."
        );

        let error = FeedbackView {
            kind: FeedbackKind::Bad,
            verdict: None,
            correct_answer: None,
            detail: "a < b".to_owned(),
            message: "a < b".to_owned(),
        };
        assert_eq!(feedback_box(&error), "<div class=\"feedback bad\">a &lt; b</div>");
    }

    #[test]
    fn test_subject_grid_marks_checked() {
        let html = subject_grid(&[
            SubjectOption {
                key: "maths".to_owned(),
                label: "Maths".to_owned(),
                checked: true,
            },
            SubjectOption {
                key: "history".to_owned(),
                label: "History".to_owned(),
                checked: false,
            },
        ]);

        assert!(html.contains("value=\"maths\" checked"));
        assert!(html.contains("value=\"history\" />"));
    }
}
