//! Client configuration
//!
//! A [`ClientConfig`] tells the controller where the scoring API lives and how
//! the per-question timer behaves. It can be deserialized from any serde
//! format the host prefers, or read from the environment.

use std::{env, time::Duration};

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        api::DEFAULT_BASE_URL,
        scoreboard::MAX_LIMIT,
        timer::{
            MAX_CEILING_SECONDS, MAX_SECONDS_PER_QUESTION, MAX_TICK_INTERVAL_SECONDS,
            MIN_CEILING_SECONDS, MIN_TICK_INTERVAL_SECONDS, TICK_INTERVAL_SECONDS,
        },
    },
    error::ConfigError,
};

/// Environment variable overriding [`ClientConfig::base_url`]
pub const BASE_URL_VAR: &str = "QUIZ_API_BASE_URL";
/// Environment variable overriding [`ClientConfig::question_ceiling`], in seconds
pub const CEILING_VAR: &str = "QUIZ_MAX_SECONDS_PER_QUESTION";
/// Environment variable overriding [`ClientConfig::scoreboard_limit`]
pub const SCOREBOARD_LIMIT_VAR: &str = "QUIZ_SCOREBOARD_LIMIT";

type ValidationResult = garde::Result;

/// Validates that a duration falls within `[MIN_SECONDS, MAX_SECONDS]`
///
/// # Errors
///
/// Returns a `garde::Error` if the duration is outside the bounds.
pub fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> ValidationResult {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

fn validate_base_url(val: &str, _ctx: &()) -> ValidationResult {
    if val.starts_with("http://") || val.starts_with("https://") {
        Ok(())
    } else {
        Err(garde::Error::new("must be an absolute http(s) URL"))
    }
}

/// Settings for the session controller and its HTTP client
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the scoring API, without a trailing slash
    #[garde(custom(validate_base_url))]
    pub base_url: String,
    /// Time allowed per question before the automatic submission
    #[garde(custom(validate_duration::<MIN_CEILING_SECONDS, MAX_CEILING_SECONDS>))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub question_ceiling: Duration,
    /// Interval between two timer ticks
    #[garde(custom(validate_duration::<MIN_TICK_INTERVAL_SECONDS, MAX_TICK_INTERVAL_SECONDS>))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub tick_interval: Duration,
    /// Number of leaderboard rows requested for the start screen
    #[garde(range(min = 1, max = MAX_LIMIT))]
    pub scoreboard_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            question_ceiling: Duration::from_secs(MAX_SECONDS_PER_QUESTION),
            tick_interval: Duration::from_secs(TICK_INTERVAL_SECONDS),
            scoreboard_limit: MAX_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Returns the default configuration pointed at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads overrides through `lookup`, falling back to the defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value cannot be parsed or the
    /// resulting configuration is invalid.
    pub fn from_lookup<F: Fn(&'static str) -> Option<String>>(
        lookup: F,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|value| !value.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_owned();
        }
        if let Some(value) = lookup(CEILING_VAR) {
            let seconds = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Environment {
                    name: CEILING_VAR,
                    value,
                })?;
            config.question_ceiling = Duration::from_secs(seconds);
        }
        if let Some(value) = lookup(SCOREBOARD_LIMIT_VAR) {
            config.scoreboard_limit =
                value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::Environment {
                        name: SCOREBOARD_LIMIT_VAR,
                        value,
                    })?;
        }

        config.validated()
    }

    /// Validates the configuration, returning it unchanged on success
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] with the validation report.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Ceiling in whole seconds
    pub fn ceiling_seconds(&self) -> u64 {
        self.question_ceiling.as_secs()
    }
}
