use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),
    #[error("OCR engine error: {0}")]
    OcrEngineError(String),
    #[error("Recognition exhausted: {0}")]
    RecognitionExhaustedError(String),
    #[error("Parse strategy error: {0}")]
    ParseStrategyError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for MenuError {
    fn from(e: std::io::Error) -> Self {
        MenuError::IoError(e.to_string())
    }
}
