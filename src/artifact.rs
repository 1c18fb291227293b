//! Generated audio files and their download handles.
//!
//! An [`ArtifactFile`] owns exactly one file on disk for the duration of one
//! request. [`package`] consumes it, so the file is read once and then deleted
//! whether packaging succeeds or not.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use base64::Engine as _;
use chrono::NaiveDateTime;
use tempfile::TempDir;

use crate::error::ConversionError;

/// MIME type reported for every artifact.
pub const MIME_TYPE: &str = "audio/mpeg";

const FILE_PREFIX: &str = "speech_output_";
const FILE_EXTENSION: &str = "mp3";

/// Artifact file name for the given local time: `speech_output_YYYYMMDD_HHMMSS.mp3`.
pub fn artifact_file_name(at: NaiveDateTime) -> String {
    format!(
        "{FILE_PREFIX}{}.{FILE_EXTENSION}",
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Whether `name` follows the artifact naming pattern.
pub fn is_artifact_file_name(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(".mp3"))
    else {
        return false;
    };
    NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S").is_ok()
}

/// A generated audio file owned by the current request.
///
/// Dropping the value deletes the file, and the per-request directory when
/// the file was created by [`ArtifactFile::create_in`].
#[derive(Debug)]
pub struct ArtifactFile {
    path: PathBuf,
    file_name: String,
    dir: Option<TempDir>,
}

impl ArtifactFile {
    /// Reserve a fresh artifact path inside a new unique directory under `work_dir`.
    ///
    /// The directory isolates requests issued within the same second, which
    /// would otherwise share a file name.
    pub fn create_in(work_dir: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("tts-request-")
            .tempdir_in(work_dir)?;
        let file_name = artifact_file_name(chrono::Local::now().naive_local());
        let path = dir.path().join(&file_name);
        log::debug!("Reserved artifact path {}", path.display());
        Ok(Self {
            path,
            file_name,
            dir: Some(dir),
        })
    }

    /// Take ownership of an existing file. It is deleted when this value drops.
    pub fn adopt(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            dir: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn read_all(&self) -> Result<Vec<u8>, ConversionError> {
        let mut file = File::open(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConversionError::ArtifactMissing(self.path.clone()),
            _ => ConversionError::Io(e),
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl Drop for ArtifactFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed artifact {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Failed to remove artifact {}: {e}", self.path.display()),
        }
        if let Some(dir) = self.dir.take() {
            let dir_path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                log::warn!("Failed to remove {}: {e}", dir_path.display());
            }
        }
    }
}

/// Audio content ready for inline playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    file_name: String,
    bytes: Vec<u8>,
}

impl AudioArtifact {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }
}

/// Base64-encoded, named and typed reference to an artifact for client-side download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHandle {
    payload: String,
    file_name: String,
}

impl DownloadHandle {
    /// Standard base64 of the audio bytes.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Suggested file name, identical to the generated artifact's name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &'static str {
        MIME_TYPE
    }

    pub fn data_uri(&self) -> String {
        format!("data:{MIME_TYPE};base64,{}", self.payload)
    }

    /// HTML anchor that downloads the audio when clicked.
    pub fn html_link(&self, label: &str) -> String {
        format!(
            r#"<a href="{}" download="{}">{}</a>"#,
            self.data_uri(),
            escape_html(&self.file_name),
            escape_html(label)
        )
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.payload)
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Playback bytes plus download handle for one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedAudio {
    audio: AudioArtifact,
    download: DownloadHandle,
}

impl PackagedAudio {
    pub fn audio(&self) -> &AudioArtifact {
        &self.audio
    }

    pub fn download(&self) -> &DownloadHandle {
        &self.download
    }

    pub fn into_parts(self) -> (AudioArtifact, DownloadHandle) {
        (self.audio, self.download)
    }
}

/// Read the artifact, encode it for download and delete it.
///
/// Deletion happens when `artifact` drops at the end of this call, on every
/// path. A file that no longer exists is reported as
/// [`ConversionError::ArtifactMissing`].
pub fn package(artifact: ArtifactFile) -> Result<PackagedAudio, ConversionError> {
    let bytes = artifact.read_all()?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    log::debug!(
        "Packaged {} ({} bytes, {} base64 chars)",
        artifact.file_name(),
        bytes.len(),
        payload.len()
    );

    let file_name = artifact.file_name().to_string();
    Ok(PackagedAudio {
        audio: AudioArtifact {
            file_name: file_name.clone(),
            bytes,
        },
        download: DownloadHandle { payload, file_name },
    })
}
