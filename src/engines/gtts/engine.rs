use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::REFERER;

use crate::config::CloudConfig;
use crate::engines::CloudParams;
use crate::{EngineError, SynthesisEngine};

use super::chunker::{split_for_request, MAX_CHARS};
use super::rpc::{batchexecute_url, extract_audio, package_rpc};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.106 Safari/537.36";

#[derive(thiserror::Error, Debug)]
pub enum GttsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Translate TTS returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("No audio stream in Translate TTS response")]
    NoAudio,
    #[error("Invalid base64 audio payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Failed to encode request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Engine not loaded. Call load() first.")]
    NotLoaded,
    #[error("Text contains nothing to speak")]
    NoSpeakableText,
}

/// Cloud text-to-speech engine using Google Translate's speech endpoint.
///
/// Produces MP3 audio. Long text is sent in chunks of at most
/// [`MAX_CHARS`] characters and the returned audio is concatenated.
///
/// ```rust,no_run
/// use tts_converter::{CloudConfig, SynthesisEngine, engines::{CloudParams, gtts::GttsEngine}};
/// use std::path::PathBuf;
///
/// let mut engine = GttsEngine::new(CloudConfig::default());
/// engine.load()?;
/// let params = CloudParams { lang: "ar".to_string(), slow: false };
/// engine.synthesize_to_file("مرحبا", &PathBuf::from("marhaba.mp3"), Some(params))?;
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
pub struct GttsEngine {
    config: CloudConfig,
    client: Option<Client>,
}

impl Default for GttsEngine {
    fn default() -> Self {
        Self::new(CloudConfig::default())
    }
}

impl GttsEngine {
    pub fn new(config: CloudConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    fn fetch(&self, text: &str, out_path: &Path, params: &CloudParams) -> Result<(), GttsError> {
        let client = self.client.as_ref().ok_or(GttsError::NotLoaded)?;
        let chunks = split_for_request(text, MAX_CHARS);
        if chunks.is_empty() {
            return Err(GttsError::NoSpeakableText);
        }

        let url = batchexecute_url(&self.config.tld);
        log::info!(
            "Requesting '{}' speech for {} chunk(s) from {url} (slow={})",
            params.lang,
            chunks.len(),
            params.slow
        );

        let mut audio = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let rpc = package_rpc(chunk, &params.lang, params.slow)?;
            let response = client
                .post(&url)
                .header(REFERER, "http://translate.google.com/")
                .form(&[("f.req", rpc.as_str())])
                .send()?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(GttsError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let part = extract_audio(&response.text()?)?;
            log::debug!("Chunk {}/{}: {} bytes", i + 1, chunks.len(), part.len());
            audio.extend_from_slice(&part);
        }

        // Only a complete response set reaches the disk.
        std::fs::write(out_path, &audio)?;
        Ok(())
    }
}

impl Drop for GttsEngine {
    fn drop(&mut self) {
        self.unload();
    }
}

impl SynthesisEngine for GttsEngine {
    type SynthesisParams = CloudParams;

    fn name(&self) -> &'static str {
        "gtts"
    }

    fn load(&mut self) -> Result<(), EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(GttsError::Http)?;
        self.client = Some(client);
        Ok(())
    }

    fn unload(&mut self) {
        self.client = None;
    }

    fn synthesize_to_file(
        &mut self,
        text: &str,
        out_path: &Path,
        params: Option<Self::SynthesisParams>,
    ) -> Result<(), EngineError> {
        Ok(self.fetch(text, out_path, &params.unwrap_or_default())?)
    }
}
