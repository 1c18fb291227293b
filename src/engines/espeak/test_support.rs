//! A stand-in `espeak-ng` executable, so pipeline tests run without the
//! system install.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use super::encode::write_test_wav;
use super::EspeakConfig;

/// Write an executable shell script to `dir/name`.
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake espeak-ng in `dir` that lists two English voices and answers
/// `-w <path>` by copying a short 16-bit WAV there.
pub(crate) fn fake_espeak(dir: &Path) -> EspeakConfig {
    let wav = dir.join("fixture.wav");
    write_test_wav(&wav, 1, 0.5);

    let body = format!(
        r#"case "$1" in
  --voices=*)
    echo 'Pty Language       Age/Gender VoiceName          File                 Other Languages'
    echo ' 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)'
    echo ' 5  en-gb           --/F      English_(Britain)  gmw/en               (en 2)'
    exit 0;;
esac
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-w" ]; then out="$2"; shift; fi
  shift
done
cat > /dev/null
cp '{}' "$out"
"#,
        wav.display()
    );

    EspeakConfig {
        bin_path: Some(write_script(dir, "espeak-ng", &body)),
        data_path: None,
    }
}
