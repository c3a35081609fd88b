//! Configuration constants for the quiz client
//!
//! This module contains the limits and defaults shared by the controller,
//! the configuration layer and the player form. The server enforces its own
//! copies of most of these; the client uses them to avoid pointless requests
//! and to keep the countdown consistent with the server's timeout rule.

/// Per-question timer constants
pub mod timer {
    /// Ceiling in seconds before a question is submitted automatically
    pub const MAX_SECONDS_PER_QUESTION: u64 = 180;
    /// Smallest ceiling a configuration may request
    pub const MIN_CEILING_SECONDS: u64 = 1;
    /// Largest ceiling a configuration may request
    pub const MAX_CEILING_SECONDS: u64 = 600;
    /// Interval in seconds between two timer ticks
    pub const TICK_INTERVAL_SECONDS: u64 = 1;
    /// Smallest allowed tick interval in seconds
    pub const MIN_TICK_INTERVAL_SECONDS: u64 = 1;
    /// Largest allowed tick interval in seconds
    pub const MAX_TICK_INTERVAL_SECONDS: u64 = 5;
}

/// Player form constants
pub mod player {
    /// Maximum length of a player name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
    /// Maximum length of a subject key in characters
    pub const MAX_SUBJECT_KEY_LENGTH: usize = 32;
    /// Subject preselected on the start screen when the catalogue offers it
    pub const DEFAULT_SUBJECT: &str = "maths";
}

/// Scoreboard constants
pub mod scoreboard {
    /// Largest number of rows the server will return
    pub const MAX_LIMIT: usize = 30;
}

/// Remote API constants
pub mod api {
    /// Base URL used when nothing else is configured
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
    /// Message used when an error response carries no usable detail
    pub const DEFAULT_ERROR_DETAIL: &str = "Request failed.";
}
