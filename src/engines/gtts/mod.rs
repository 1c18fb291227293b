//! Google Translate text-to-speech over HTTPS.
//!
//! Speech is requested through the Translate web client's `batchexecute`
//! endpoint. Each request carries at most 100 characters, so input is split
//! at punctuation and whitespace first. The service answers with base64 MP3
//! data embedded in a JSON line, which is decoded and appended chunk by chunk.
//!
//! Requires network access at synthesis time; nothing is cached.

pub mod chunker;
pub mod engine;
pub mod rpc;

pub use engine::{GttsEngine, GttsError};
