//! Best-effort language detection.
//!
//! Detection is advisory. The converter never uses it to override the
//! language chosen for a request.

use whatlang::Lang;

use crate::request::Language;

/// Code returned when detection fails.
pub const FALLBACK_CODE: &str = "en";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DetectionError {
    #[error("no text to detect a language from")]
    Empty,
    #[error("language could not be determined")]
    Undetermined,
}

/// Guess the language of `text`, as an ISO 639-1 code where one is known
/// (ISO 639-3 otherwise). Falls back to `"en"` on any failure.
pub fn detect(text: &str) -> String {
    match try_detect(text) {
        Ok(lang) => iso_639_1(lang)
            .map(str::to_string)
            .unwrap_or_else(|| lang.code().to_string()),
        Err(e) => {
            log::warn!("Language detection failed ({e}), falling back to '{FALLBACK_CODE}'");
            FALLBACK_CODE.to_string()
        }
    }
}

/// Map detected text onto a supported [`Language`]. Anything not Arabic is English.
pub fn detect_language(text: &str) -> Language {
    match detect(text).as_str() {
        "ar" => Language::Ar,
        _ => Language::En,
    }
}

fn try_detect(text: &str) -> Result<Lang, DetectionError> {
    if text.trim().is_empty() {
        return Err(DetectionError::Empty);
    }
    let info = whatlang::detect(text).ok_or(DetectionError::Undetermined)?;
    log::debug!(
        "Detected {:?} (confidence {:.2}, script {:?})",
        info.lang(),
        info.confidence(),
        info.script()
    );
    Ok(info.lang())
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Ara => "ar",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Spa => "es",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Tur => "tr",
        Lang::Pes => "fa",
        Lang::Urd => "ur",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        _ => return None,
    };
    Some(code)
}
