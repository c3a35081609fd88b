//! Start form validation
//!
//! The start screen hands over raw text. Everything that can be rejected
//! without asking the server is rejected here, in the order the form shows
//! its fields, so the user sees one message at a time.

use garde::Validate;
use itertools::Itertools;

use crate::{
    error::FormError,
    model::{StartSessionRequest, SubjectInfo},
};

/// Raw values entered on the start screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerForm {
    /// Name as typed
    pub name: String,
    /// Age as typed
    pub age: String,
    /// Keys of the ticked subjects
    pub subjects: Vec<String>,
}

impl PlayerForm {
    /// Creates a form from raw input
    pub fn new(
        name: impl Into<String>,
        age: impl Into<String>,
        subjects: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
            subjects: subjects.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates the form and builds the request body
    ///
    /// When `catalogue` is non-empty every selected key must appear in it.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found.
    pub fn to_request(&self, catalogue: &[SubjectInfo]) -> Result<StartSessionRequest, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let age = leading_integer(&self.age).ok_or(FormError::InvalidAge)?;

        let subjects = self
            .subjects
            .iter()
            .map(|key| key.trim())
            .filter(|key| !key.is_empty())
            .unique()
            .map(str::to_owned)
            .collect_vec();
        if subjects.is_empty() {
            return Err(FormError::NoSubjects);
        }
        if !catalogue.is_empty() {
            if let Some(unknown) = subjects
                .iter()
                .find(|key| !catalogue.iter().any(|subject| &subject.key == *key))
            {
                return Err(FormError::UnknownSubject(unknown.clone()));
            }
        }

        let request = StartSessionRequest {
            name: name.to_owned(),
            age,
            subjects,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Reads the whole number at the start of `text`
///
/// Leading whitespace and one sign are accepted and everything after the
/// digits is ignored, so `"12.5"` and `"12 years"` both read as 12.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let value = rest[..digits].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}
