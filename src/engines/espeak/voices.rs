use super::process::{run_espeak, EspeakConfig, EspeakError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Male,
    Female,
    Unknown,
}

/// One entry of `espeak-ng --voices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    /// Language tag, e.g. `en-us`.
    pub language: String,
    pub gender: VoiceGender,
    /// Display name, e.g. `English_(America)`.
    pub name: String,
    /// Voice file identifier accepted by `-v`, e.g. `gmw/en-US`.
    pub identifier: String,
}

/// Voices installed for one language, in the order espeak-ng lists them.
///
/// The order is what [`crate::Voice::index`] refers to.
#[derive(Debug, Clone)]
pub struct VoiceList {
    voices: Vec<VoiceInfo>,
}

impl VoiceList {
    /// Enumerate installed voices for `language` (e.g. `"en"`).
    pub fn load(config: &EspeakConfig, language: &str) -> Result<Self, EspeakError> {
        let output = run_espeak(config, [format!("--voices={language}")], None)?;
        let voices = parse_voice_list(&output);
        if voices.is_empty() {
            return Err(EspeakError::NoVoices(language.to_string()));
        }
        log::info!("Found {} espeak-ng voices for '{language}'", voices.len());
        Ok(Self { voices })
    }

    pub fn get(&self, index: usize) -> Result<&VoiceInfo, EspeakError> {
        self.voices
            .get(index)
            .ok_or(EspeakError::VoiceIndexOutOfRange {
                index,
                available: self.voices.len(),
            })
    }

    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }
}

/// Parse the table printed by `espeak-ng --voices`.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
/// ```
fn parse_voice_list(output: &str) -> Vec<VoiceInfo> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Pty"))
        .filter_map(parse_voice_line)
        .collect()
}

fn parse_voice_line(line: &str) -> Option<VoiceInfo> {
    let mut cols = line.split_whitespace();
    let _priority = cols.next()?;
    let language = cols.next()?;
    let age_gender = cols.next()?;
    let name = cols.next()?;
    let identifier = cols.next()?;

    let gender = match age_gender.rsplit('/').next() {
        Some("M") => VoiceGender::Male,
        Some("F") => VoiceGender::Female,
        _ => VoiceGender::Unknown,
    };

    Some(VoiceInfo {
        language: language.to_string(),
        gender,
        name: name.to_string(),
        identifier: identifier.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  en              --/M      English            gmw/en               (en-gb 2)(en 2)
 2  en-029          --/M      English_(Caribbean) gmw/en-029           (en 10)
 5  en-us           --/F      English_(America)  gmw/en-US            (en 3)
";

    #[test]
    fn parses_voice_table_in_order() {
        let voices = parse_voice_list(SAMPLE);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].identifier, "gmw/en");
        assert_eq!(voices[0].gender, VoiceGender::Male);
        assert_eq!(voices[1].name, "English_(Caribbean)");
        assert_eq!(voices[2].language, "en-us");
        assert_eq!(voices[2].gender, VoiceGender::Female);
    }

    #[test]
    fn skips_blank_and_truncated_lines() {
        let voices = parse_voice_list("Pty Language\n\n 5 en --/M\n");
        assert!(voices.is_empty());
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let list = VoiceList {
            voices: parse_voice_list(SAMPLE),
        };
        assert_eq!(list.get(1).unwrap().identifier, "gmw/en-029");
        match list.get(3) {
            Err(EspeakError::VoiceIndexOutOfRange { index, available }) => {
                assert_eq!((index, available), (3, 3));
            }
            other => panic!("expected VoiceIndexOutOfRange, got {other:?}"),
        }
    }
}
