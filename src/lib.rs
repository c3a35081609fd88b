//! # Quizclock
//!
//! This library is the client side of a timed quiz game. It mirrors a
//! server-held quiz session, runs the per-question countdown, guards answer
//! submission and describes what each screen should show. Question
//! generation, grading and the leaderboard live on the server and are
//! reached through the [`api::QuizApi`] seam.
//!
//! Hosts drive a [`controller::Controller`]: they forward player input to its
//! operations, schedule the [`AlarmMessage`]s it asks for and deliver them
//! back when they fire, then paint [`view::render`]'s output.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

use serde::{Deserialize, Serialize};

pub mod api;
pub mod clock;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod form;
pub mod html;
pub mod model;
pub mod timer;
pub mod view;

pub use api::{HttpApi, QuizApi};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClientConfig;
pub use controller::{Controller, Phase, State, SubmitOutcome};
pub use error::{ApiError, ConfigError, FormError, StartError};
pub use form::PlayerForm;
pub use view::{Screen, render};

/// Alarm messages for timed events
///
/// The controller hands these to the host's scheduler together with a delay;
/// the host passes them back to
/// [`Controller::receive_alarm`](controller::Controller::receive_alarm) once
/// the delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Question timer alarms
    Timer(timer::AlarmMessage),
}

impl AlarmMessage {
    /// Converts the alarm to a JSON string, for hosts that schedule through JS
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }

    /// Parses an alarm previously produced by [`AlarmMessage::to_message`]
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `message` is not a serialized alarm.
    pub fn from_message(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }
}
