use std::path::PathBuf;

use crate::request::ConversionRequestBuilderError;
use crate::EngineError;

#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    #[error("{0}")]
    Validation(String),
    #[error("Speech synthesis failed in {engine}: {source}")]
    Synthesis {
        engine: &'static str,
        #[source]
        source: EngineError,
    },
    #[error("Generated audio file is missing: {}", .0.display())]
    ArtifactMissing(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<ConversionRequestBuilderError> for ConversionError {
    fn from(err: ConversionRequestBuilderError) -> Self {
        match err {
            ConversionRequestBuilderError::UninitializedField(field) => {
                ConversionError::Validation(format!("Missing required field `{field}`"))
            }
            ConversionRequestBuilderError::ValidationError(msg) => ConversionError::Validation(msg),
        }
    }
}

impl ConversionError {
    /// Message suitable for showing to the user as a single warning line.
    pub fn user_message(&self) -> String {
        match self {
            ConversionError::Validation(msg) => msg.clone(),
            ConversionError::Synthesis { .. } | ConversionError::ArtifactMissing(_) => {
                format!("Conversion failed: {self}")
            }
            ConversionError::Io(_) | ConversionError::Config(_) => self.to_string(),
        }
    }
}
