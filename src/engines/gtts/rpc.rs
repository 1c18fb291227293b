use std::sync::LazyLock;

use base64::Engine as _;
use regex::Regex;
use serde_json::{json, Value};

use super::engine::GttsError;

/// RPC id of the Translate "speak" call.
pub const RPC_ID: &str = "jQ1olc";

static AUDIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"jQ1olc","\[\\"(.*)\\"]"#).expect("valid regex"));

pub fn batchexecute_url(tld: &str) -> String {
    format!("https://translate.google.{tld}/_/TranslateWebserverUi/data/batchexecute")
}

/// Build the `f.req` form value for one chunk of text.
///
/// The inner parameter list is itself JSON-encoded into a string. Normal
/// speed is sent as the literal string `"null"`, slow speed as `true`.
pub fn package_rpc(text: &str, lang: &str, slow: bool) -> Result<String, serde_json::Error> {
    let speed = if slow {
        Value::Bool(true)
    } else {
        Value::String("null".to_string())
    };
    let parameter = serde_json::to_string(&json!([text, lang, speed, "null"]))?;
    serde_json::to_string(&json!([[[RPC_ID, parameter, null, "generic"]]]))
}

/// Pull the base64 audio out of a `batchexecute` response body and decode it.
pub fn extract_audio(body: &str) -> Result<Vec<u8>, GttsError> {
    let mut audio = Vec::new();
    for line in body.lines().filter(|line| line.contains(RPC_ID)) {
        if let Some(caps) = AUDIO_RE.captures(line) {
            audio.extend(base64::engine::general_purpose::STANDARD.decode(&caps[1])?);
        }
    }

    if audio.is_empty() {
        return Err(GttsError::NoAudio);
    }
    Ok(audio)
}
