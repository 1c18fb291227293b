//! Speech synthesis engines.
//!
//! This module contains implementations of text-to-speech engines and the
//! parameter types the converter hands them.
//!
//! # Available Engines
//!
//! - `espeak` - offline espeak-ng renderer (always built, `espeak-ng` required at runtime)
//! - `gtts` - Google Translate TTS over HTTPS (Cargo feature `gtts`, enabled by default)

pub mod espeak;
#[cfg(feature = "gtts")]
pub mod gtts;

use std::path::Path;

use crate::request::Speed;
use crate::{EngineError, SynthesisEngine};

/// Parameters for the offline engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalParams {
    /// Speaking rate in words per minute.
    pub rate: u16,
    /// Position in the engine's enumerated voice list.
    pub voice_index: usize,
}

impl Default for LocalParams {
    fn default() -> Self {
        Self {
            rate: Speed::DEFAULT,
            voice_index: 0,
        }
    }
}

/// Parameters for the cloud engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudParams {
    /// Language code understood by the service (e.g. `"ar"`).
    pub lang: String,
    /// Ask the service for slowed-down speech.
    pub slow: bool,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            slow: false,
        }
    }
}

/// A loaded engine. Unloads the engine when dropped.
pub struct EngineSession<'a, E: SynthesisEngine> {
    engine: &'a mut E,
}

impl<'a, E: SynthesisEngine> EngineSession<'a, E> {
    pub fn open(engine: &'a mut E) -> Result<Self, EngineError> {
        engine.load()?;
        log::debug!("Engine '{}' loaded", engine.name());
        Ok(Self { engine })
    }

    pub fn synthesize_to_file(
        &mut self,
        text: &str,
        out_path: &Path,
        params: E::SynthesisParams,
    ) -> Result<(), EngineError> {
        self.engine.synthesize_to_file(text, out_path, Some(params))
    }
}

impl<E: SynthesisEngine> Drop for EngineSession<'_, E> {
    fn drop(&mut self) {
        self.engine.unload();
        log::debug!("Engine '{}' unloaded", self.engine.name());
    }
}
