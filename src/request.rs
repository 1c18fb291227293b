use std::fmt;
use std::str::FromStr;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Shown when a request carries no text to speak.
pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to convert";

/// Language the text is spoken in. Selects the synthesis path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English, rendered by the offline engine.
    #[default]
    En,
    /// Arabic, rendered by the cloud engine with a fixed female voice.
    Ar,
}

impl Language {
    /// ISO 639-1 code passed to the engines.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            other => Err(format!("unsupported language '{other}' (expected en or ar)")),
        }
    }
}

/// Voice selection for the offline engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Male,
    Female,
}

impl Voice {
    /// Position in the offline engine's enumerated voice list.
    pub fn index(self) -> usize {
        match self {
            Voice::Male => 0,
            Voice::Female => 1,
        }
    }
}

/// Speaking rate in words per minute, always within [`Speed::MIN`]..=[`Speed::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct Speed(u16);

impl Speed {
    pub const MIN: u16 = 80;
    pub const MAX: u16 = 300;
    pub const DEFAULT: u16 = 175;

    /// Build a speed, clamping out-of-range values into the supported range.
    pub fn new(wpm: u16) -> Self {
        let clamped = wpm.clamp(Self::MIN, Self::MAX);
        if clamped != wpm {
            log::warn!(
                "Speed {wpm} outside {}..={}, clamped to {clamped}",
                Self::MIN,
                Self::MAX
            );
        }
        Self(clamped)
    }

    pub fn wpm(self) -> u16 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<u16> for Speed {
    fn from(wpm: u16) -> Self {
        Self::new(wpm)
    }
}

impl From<Speed> for u16 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// A single text-to-speech conversion.
///
/// Only constructible through [`ConversionRequestBuilder`], which rejects
/// empty or whitespace-only text.
///
/// ```rust
/// use tts_converter::{ConversionRequestBuilder, Language, Voice};
///
/// let request = ConversionRequestBuilder::default()
///     .text("مرحبا")
///     .language(Language::Ar)
///     .voice(Voice::Male)
///     .build()
///     .unwrap();
///
/// // Arabic always uses the female rendering and ignores speed.
/// assert_eq!(request.voice(), Voice::Female);
/// assert_eq!(request.speed(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ConversionRequest {
    text: String,
    #[builder(default)]
    language: Language,
    #[builder(default)]
    voice: Voice,
    #[builder(default)]
    speed: Speed,
}

impl ConversionRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        match &self.text {
            Some(text) if text.trim().is_empty() => Err(EMPTY_TEXT_MESSAGE.to_string()),
            _ => Ok(()),
        }
    }
}

impl ConversionRequest {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Voice used for synthesis. Arabic is always rendered with a female voice.
    pub fn voice(&self) -> Voice {
        match self.language {
            Language::En => self.voice,
            Language::Ar => Voice::Female,
        }
    }

    /// Rate for the offline engine, or `None` when the cloud path ignores it.
    pub fn speed(&self) -> Option<Speed> {
        match self.language {
            Language::En => Some(self.speed),
            Language::Ar => None,
        }
    }
}
