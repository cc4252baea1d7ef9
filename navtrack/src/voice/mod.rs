//! Spoken instructions.
//!
//! The [`VoiceAnnouncer`] sits between the session and a [`SpeechEngine`].
//! It speaks an instruction only when voice guidance is enabled and the text
//! differs from the last instruction it spoke. Speech failures are logged
//! and swallowed; they never reach the session.

use std::sync::Arc;

use thiserror::Error;

use crate::instruction::Language;
use crate::settings::NavigationSettings;
use crate::BoxFuture;

/// Default speech pitch multiplier.
pub const DEFAULT_PITCH: f32 = 1.0;

/// Default speech rate multiplier (slightly slower than normal).
pub const DEFAULT_RATE: f32 = 0.8;

/// Errors reported by a speech engine.
#[derive(Debug, Clone, Error)]
pub enum SpeechError {
    /// The platform has no usable speech output.
    #[error("Speech output unavailable")]
    Unavailable,

    /// The engine rejected or failed the utterance.
    #[error("Speech engine error: {0}")]
    Engine(String),
}

/// Voice parameters passed with every utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    /// BCP-47 language tag, e.g. `zh-CN`.
    pub language: String,
    /// Pitch multiplier (1.0 = normal).
    pub pitch: f32,
    /// Rate multiplier (1.0 = normal).
    pub rate: f32,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self::for_language(Language::default())
    }
}

impl SpeechOptions {
    /// Default pitch and rate for `language`.
    pub fn for_language(language: Language) -> Self {
        Self {
            language: language.tag().to_string(),
            pitch: DEFAULT_PITCH,
            rate: DEFAULT_RATE,
        }
    }

    /// Set the pitch multiplier.
    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// Set the rate multiplier.
    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }
}

/// Text-to-speech output.
pub trait SpeechEngine: Send + Sync {
    /// Speaks `text`. Resolves once the utterance has been accepted.
    fn speak<'a>(
        &'a self,
        text: &'a str,
        options: &'a SpeechOptions,
    ) -> BoxFuture<'a, Result<(), SpeechError>>;

    /// Halts any in-progress output.
    fn stop(&self) -> Result<(), SpeechError>;
}

/// Speech engine that writes utterances to the log.
///
/// Used when no audio output exists (CLI replay, headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSpeechEngine;

impl SpeechEngine for LogSpeechEngine {
    fn speak<'a>(
        &'a self,
        text: &'a str,
        options: &'a SpeechOptions,
    ) -> BoxFuture<'a, Result<(), SpeechError>> {
        Box::pin(async move {
            tracing::info!(language = %options.language, "Speaking: {}", text);
            Ok(())
        })
    }

    fn stop(&self) -> Result<(), SpeechError> {
        tracing::debug!("Speech stopped");
        Ok(())
    }
}

/// Decides whether `instruction` should be spoken.
///
/// True only when voice is enabled and the text differs from the last
/// spoken instruction.
pub fn should_announce(settings: &NavigationSettings, instruction: &str, last_spoken: &str) -> bool {
    settings.voice_enabled && instruction != last_spoken
}

/// Deduplicating front end for a [`SpeechEngine`].
pub struct VoiceAnnouncer {
    engine: Arc<dyn SpeechEngine>,
    options: SpeechOptions,
    last_spoken: String,
}

impl std::fmt::Debug for VoiceAnnouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceAnnouncer")
            .field("options", &self.options)
            .field("last_spoken", &self.last_spoken)
            .finish_non_exhaustive()
    }
}

impl VoiceAnnouncer {
    /// Creates an announcer over `engine`.
    pub fn new(engine: Arc<dyn SpeechEngine>, options: SpeechOptions) -> Self {
        Self {
            engine,
            options,
            last_spoken: String::new(),
        }
    }

    /// The last instruction successfully spoken.
    pub fn last_spoken(&self) -> &str {
        &self.last_spoken
    }

    /// Speaks `instruction` if allowed by settings and not a repeat.
    ///
    /// Returns true if the engine accepted the utterance. Engine failures
    /// are logged and reported as `false`; `last_spoken` is left unchanged
    /// so the same text may be tried again later.
    pub async fn announce(&mut self, settings: &NavigationSettings, instruction: &str) -> bool {
        if !should_announce(settings, instruction, &self.last_spoken) {
            return false;
        }

        match self.engine.speak(instruction, &self.options).await {
            Ok(()) => {
                tracing::debug!(instruction, "Announced instruction");
                self.last_spoken = instruction.to_string();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, instruction, "Voice announcement failed");
                false
            }
        }
    }

    /// Halts in-progress speech. Failures are logged only.
    pub fn stop(&self) {
        if let Err(e) = self.engine.stop() {
            tracing::warn!(error = %e, "Failed to stop speech");
        }
    }
}
