use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum EspeakError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(
        "espeak-ng not found at '{}'. Install: Linux: `sudo apt-get install espeak-ng`, \
         macOS: `brew install espeak-ng`, Windows: https://espeak-ng.org/download",
        .0.display()
    )]
    NotFound(PathBuf),
    #[error("espeak-ng failed: {0}")]
    Failed(String),
    #[error("Engine not loaded. Call load() first.")]
    NotLoaded,
    #[error("No espeak-ng voices available for language '{0}'")]
    NoVoices(String),
    #[error("Voice index {index} not available ({available} voices installed)")]
    VoiceIndexOutOfRange { index: usize, available: usize },
    #[error("Rendered audio is not readable: {0}")]
    InvalidOutput(#[from] hound::Error),
    #[error("espeak-ng produced no audio in {}", .0.display())]
    EmptyOutput(PathBuf),
    #[error("MP3 encoding failed: {0}")]
    Encode(String),
}

/// Location of the espeak-ng binary and its data directory.
///
/// Either path can be `None` to fall back to the system default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EspeakConfig {
    pub bin_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
}

impl EspeakConfig {
    fn program(&self) -> &Path {
        self.bin_path
            .as_deref()
            .unwrap_or_else(|| Path::new("espeak-ng"))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        if let Some(data) = &self.data_path {
            let mut arg = OsString::from("--path=");
            arg.push(data.as_os_str());
            cmd.arg(arg);
        }
        cmd
    }
}

/// Arguments that render stdin text to a WAV file with the given voice and rate.
pub(crate) fn render_args(voice_id: &str, rate: u16, out_path: &Path) -> Vec<OsString> {
    vec![
        "-v".into(),
        voice_id.into(),
        "-s".into(),
        rate.to_string().into(),
        "-w".into(),
        out_path.as_os_str().to_os_string(),
        "--stdin".into(),
    ]
}

/// Run espeak-ng to completion and return its stdout.
///
/// When `input` is given it is written to stdin, which is then closed so the
/// process can finish.
pub(crate) fn run_espeak<I, S>(
    config: &EspeakConfig,
    args: I,
    input: Option<&str>,
) -> Result<String, EspeakError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut child = config
        .command()
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EspeakError::NotFound(config.program().to_path_buf())
            } else {
                EspeakError::Io(e)
            }
        })?;

    // espeak-ng reads stdin line by line; the last line needs its terminator.
    // The child is always reaped; a write error (broken pipe after an early
    // exit) only surfaces if espeak-ng itself reported success.
    let write_result = match (child.stdin.take(), input) {
        (Some(mut stdin), Some(text)) => {
            stdin.write_all(canonicalize_stdin_payload(text).as_bytes())
        }
        _ => Ok(()),
    };

    let output = child.wait_with_output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EspeakError::Failed(format!(
            "exited with code {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }
    write_result?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn canonicalize_stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_trailing_newline_for_stdin() {
        assert_eq!(canonicalize_stdin_payload("Hello world"), "Hello world\n");
        assert_eq!(canonicalize_stdin_payload("Hello world\n"), "Hello world\n");
    }

    #[test]
    fn builds_render_arguments() {
        let args = render_args("gmw/en-US", 175, Path::new("/tmp/out.mp3"));
        assert_eq!(
            args,
            ["-v", "gmw/en-US", "-s", "175", "-w", "/tmp/out.mp3", "--stdin"]
                .iter()
                .map(|s| OsString::from(*s))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn data_path_becomes_path_option() {
        let config = EspeakConfig {
            bin_path: Some(PathBuf::from("/opt/espeak/bin/espeak-ng")),
            data_path: Some(PathBuf::from("/opt/espeak/data")),
        };
        let cmd = config.command();
        assert_eq!(cmd.get_program(), "/opt/espeak/bin/espeak-ng");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![OsStr::new("--path=/opt/espeak/data")]);
    }

    #[test]
    fn missing_binary_is_reported_as_not_found() {
        let config = EspeakConfig {
            bin_path: Some(PathBuf::from("/nonexistent/espeak-ng")),
            data_path: None,
        };
        match run_espeak(&config, ["--version"], None) {
            Err(EspeakError::NotFound(path)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/espeak-ng"))
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn early_exit_reports_exit_status_over_broken_pipe() {
        let dir = tempfile::tempdir().unwrap();
        // Exits without reading stdin, so a large payload hits a closed pipe.
        let bin = crate::engines::espeak::test_support::write_script(
            dir.path(),
            "espeak-ng",
            "echo 'unknown voice gmw/xx' >&2\nexit 2\n",
        );
        let config = EspeakConfig {
            bin_path: Some(bin),
            data_path: None,
        };
        let text = "word ".repeat(200_000);

        match run_espeak(&config, ["--stdin"], Some(&text)) {
            Err(EspeakError::Failed(msg)) => {
                assert!(msg.contains("Some(2)"), "{msg}");
                assert!(msg.contains("unknown voice gmw/xx"), "{msg}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
