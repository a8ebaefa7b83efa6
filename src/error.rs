use crate::emotion::Emotion;
use thiserror::Error;

/// Errors produced by the emotion recognition library.
#[derive(Debug, Error)]
pub enum EmotionError {
    #[error("no face detected in the image")]
    NoFaceDetected,

    #[error("unknown emotion label: {0}")]
    UnknownEmotion(String),

    #[error("emotion label given more than once: {0}")]
    DuplicateEmotion(Emotion),

    #[error("emotion scores are all zero")]
    EmptyScores,

    #[error("invalid score for {emotion}: {value}")]
    InvalidScore { emotion: Emotion, value: f64 },

    #[error("no predictions provided")]
    NoPredictions,

    #[error("label sequences are empty")]
    EmptyLabels,

    #[error("label sequences differ in length: {truth} true vs {predicted} predicted")]
    LengthMismatch { truth: usize, predicted: usize },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read image: {0}")]
    ImageRead(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("analysis service error: {0}")]
    Service(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for emotion recognition operations.
pub type Result<T> = std::result::Result<T, EmotionError>;
