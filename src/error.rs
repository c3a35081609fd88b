//! Error types for the quiz client
//!
//! Every error here is recoverable: the controller turns it into user-facing
//! text and returns to a well-defined prior state.

use thiserror::Error;

/// Errors raised while talking to the remote scoring API
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The server answered with a non-success status
    ///
    /// The `detail` is shown to the user verbatim.
    #[error("{detail}")]
    Status {
        /// HTTP status of the response
        status: reqwest::StatusCode,
        /// Human readable detail extracted from the response body
        detail: String,
    },
    /// The request could not be sent or the response could not be read
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The response body was not the expected JSON
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Returns the HTTP status when the server produced one
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(error) => error.status(),
            Self::Decode(_) => None,
        }
    }
}

/// Client-side validation errors for the start form
///
/// These are caught before any network call and reported inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FormError {
    /// The trimmed name is empty
    #[error("Please enter a name.")]
    MissingName,
    /// The age is not a finite whole number
    #[error("Please enter a valid age.")]
    InvalidAge,
    /// No subject was selected
    #[error("Please select at least one subject.")]
    NoSubjects,
    /// A selected subject is not part of the loaded catalogue
    #[error("Unknown subject: {0}.")]
    UnknownSubject(String),
    /// Structural validation of the request failed
    #[error("{0}")]
    Invalid(String),
}

impl From<garde::Report> for FormError {
    fn from(report: garde::Report) -> Self {
        Self::Invalid(report.to_string())
    }
}

/// Errors raised by [`crate::controller::Controller::start_session`]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartError {
    /// The form was rejected before contacting the server
    #[error(transparent)]
    Form(#[from] FormError),
    /// The server refused to create the session
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors raised while building a [`crate::config::ClientConfig`]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration failed validation
    #[error("invalid client configuration: {0}")]
    Invalid(#[from] garde::Report),
    /// An environment variable held a value that could not be parsed
    #[error("environment variable {name} has an invalid value {value:?}")]
    Environment {
        /// Name of the variable
        name: &'static str,
        /// The raw value found
        value: String,
    },
}
