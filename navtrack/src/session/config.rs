//! Session configuration.

use std::time::Duration;

use crate::instruction::Language;
use crate::voice::SpeechOptions;

/// Default upper bound on a single route fetch.
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for a [`NavigationSession`](super::NavigationSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Language for instructions and the directions request.
    pub language: Language,
    /// Voice parameters.
    pub speech: SpeechOptions,
    /// Upper bound on a single route fetch.
    pub route_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            speech: SpeechOptions::default(),
            route_timeout: DEFAULT_ROUTE_TIMEOUT,
        }
    }
}

impl SessionConfig {
    /// Set the language. Also switches the speech language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self.speech.language = language.tag().to_string();
        self
    }

    /// Set voice parameters.
    pub fn with_speech(mut self, speech: SpeechOptions) -> Self {
        self.speech = speech;
        self
    }

    /// Set the route fetch timeout.
    pub fn with_route_timeout(mut self, timeout: Duration) -> Self {
        self.route_timeout = timeout;
        self
    }
}
