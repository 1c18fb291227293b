//! Offline synthesis through the espeak-ng command-line tool.
//!
//! # System Requirements
//!
//! **espeak-ng** must be installed on your system, or its location given in
//! [`EspeakConfig`]:
//! - **Linux**: `sudo apt-get install espeak-ng`
//! - **macOS**: `brew install espeak-ng`
//! - **Windows**: Download installer from <https://espeak-ng.org/download>
//!
//! # Operation
//!
//! | Step | espeak-ng invocation |
//! |---|---|
//! | enumerate voices | `espeak-ng --voices=en` |
//! | set rate (words per minute) | `-s <rate>` |
//! | select voice | `-v <file identifier>` |
//! | render to scratch WAV | `-w <dir>/espeak-XXXX.wav --stdin` |
//!
//! The call blocks until the child process exits. espeak-ng only writes
//! RIFF/WAVE, so the scratch file is then decoded with `hound`, encoded to MP3
//! at the requested path and removed. The output file is complete when
//! `synthesize_to_file` returns.

mod encode;
pub mod engine;
pub mod process;
#[cfg(all(test, unix))]
pub(crate) mod test_support;
pub mod voices;

#[cfg(test)]
pub(crate) use encode::looks_like_mp3;

pub use engine::EspeakEngine;
pub use process::{EspeakConfig, EspeakError};
pub use voices::{VoiceGender, VoiceInfo};
