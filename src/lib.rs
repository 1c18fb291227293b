//! # tts-converter
//!
//! A Rust library that converts English or Arabic text into a downloadable
//! speech file.
//!
//! ## Features
//!
//! - **Offline English synthesis**: drives `espeak-ng` with a words-per-minute rate and an indexed voice
//! - **Cloud Arabic synthesis**: Google Translate TTS (feature `gtts`, enabled by default)
//! - **Self-cleaning artifacts**: every generated file lives in its own temporary directory and is
//!   deleted once it has been packaged into a base64 download handle
//! - **Helpers**: language detection and Arabic reshaping for right-to-left display
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tts-converter = { version = "2026.2", features = ["gtts"] }
//! ```
//!
//! ```ignore
//! use tts_converter::{ConversionRequestBuilder, Converter, ConverterConfig, Language, Voice};
//!
//! let mut converter = Converter::new(ConverterConfig::default());
//! let request = ConversionRequestBuilder::default()
//!     .text("Hello world")
//!     .language(Language::En)
//!     .voice(Voice::Male)
//!     .speed(175u16)
//!     .build()?;
//!
//! let packaged = converter.convert(&request)?;
//! println!("{} ({} bytes)", packaged.download().file_name(), packaged.audio().bytes().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod artifact;
pub mod config;
pub mod converter;
pub mod engines;
pub mod error;
pub mod language;
pub mod request;
pub mod shaper;

use std::path::Path;

pub use artifact::{package, ArtifactFile, AudioArtifact, DownloadHandle, PackagedAudio, MIME_TYPE};
pub use config::{load_config, CloudConfig, ConverterConfig};
pub use converter::Converter;
pub use error::ConversionError;
pub use request::{ConversionRequest, ConversionRequestBuilder, Language, Speed, Voice};

/// Error type returned by engines through [`SynthesisEngine`].
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// Common interface for text-to-speech synthesis engines.
///
/// An engine is loaded before use and unloaded afterwards. Callers normally do
/// not invoke `load`/`unload` directly but go through
/// [`engines::EngineSession`], which pairs them on every exit path.
pub trait SynthesisEngine {
    /// Parameters for configuring a single synthesis call (voice, speed, etc.)
    type SynthesisParams: Default;

    /// Short engine name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Acquire whatever the engine needs (voice list, HTTP client, ...).
    fn load(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Release resources acquired by [`load`](Self::load).
    fn unload(&mut self) {}

    /// Synthesize `text` and write the encoded audio to `out_path`.
    ///
    /// Must not return before the file is complete.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        out_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), EngineError>;
}
