use std::path::Path;

use crate::engines::LocalParams;
use crate::{EngineError, SynthesisEngine};

use super::encode::wav_to_mp3;
use super::process::{render_args, run_espeak, EspeakConfig, EspeakError};
use super::voices::{VoiceInfo, VoiceList};

/// Offline text-to-speech engine backed by the `espeak-ng` binary.
///
/// Loading the engine enumerates the installed voices for its language;
/// [`LocalParams::voice_index`] selects from that list.
///
/// ```rust,no_run
/// use tts_converter::{SynthesisEngine, engines::{LocalParams, espeak::EspeakEngine}};
/// use std::path::PathBuf;
///
/// let mut engine = EspeakEngine::new();
/// engine.load()?;
/// let params = LocalParams { rate: 175, voice_index: 0 };
/// engine.synthesize_to_file("Hello world", &PathBuf::from("hello.mp3"), Some(params))?;
/// engine.unload();
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
pub struct EspeakEngine {
    config: EspeakConfig,
    voice_language: String,
    voices: Option<VoiceList>,
}

impl Default for EspeakEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EspeakEngine {
    /// Create an engine that uses `espeak-ng` from PATH with English voices.
    pub fn new() -> Self {
        Self::with_config(EspeakConfig::default(), "en")
    }

    pub fn with_config(config: EspeakConfig, voice_language: impl Into<String>) -> Self {
        Self {
            config,
            voice_language: voice_language.into(),
            voices: None,
        }
    }

    /// Installed voices (empty until the engine is loaded).
    pub fn list_voices(&self) -> &[VoiceInfo] {
        self.voices.as_ref().map(|v| v.voices()).unwrap_or_default()
    }

    fn render(
        &self,
        text: &str,
        out_path: &Path,
        params: LocalParams,
    ) -> Result<(), EspeakError> {
        let voices = self.voices.as_ref().ok_or(EspeakError::NotLoaded)?;
        let voice = voices.get(params.voice_index)?;
        log::info!(
            "Rendering {} chars with espeak-ng voice '{}' at {} wpm",
            text.chars().count(),
            voice.identifier,
            params.rate
        );

        // espeak-ng only writes WAV. Render next to the output, then transcode.
        let scratch_dir = out_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let scratch = tempfile::Builder::new()
            .prefix("espeak-")
            .suffix(".wav")
            .tempfile_in(scratch_dir)?;

        run_espeak(
            &self.config,
            render_args(&voice.identifier, params.rate, scratch.path()),
            Some(text),
        )?;

        // The process has exited, so the scratch file is complete.
        if hound::WavReader::open(scratch.path())?.duration() == 0 {
            return Err(EspeakError::EmptyOutput(scratch.path().to_path_buf()));
        }
        let secs = wav_to_mp3(scratch.path(), out_path)?;
        log::debug!(
            "Encoded {:.2}s of espeak-ng audio to {}",
            secs,
            out_path.display()
        );
        Ok(())
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        self.unload();
    }
}

impl SynthesisEngine for EspeakEngine {
    type SynthesisParams = LocalParams;

    fn name(&self) -> &'static str {
        "espeak-ng"
    }

    fn load(&mut self) -> Result<(), EngineError> {
        self.voices = Some(VoiceList::load(&self.config, &self.voice_language)?);
        Ok(())
    }

    fn unload(&mut self) {
        self.voices = None;
    }

    fn synthesize_to_file(
        &mut self,
        text: &str,
        out_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), EngineError> {
        Ok(self.render(text, out_path, params.unwrap_or_default())?)
    }
}
