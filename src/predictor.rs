use crate::analyzer::{AnalysisOptions, AnalysisRequest, FaceAnalyzer};
use crate::emotion::{Emotion, EmotionScores, Sentiment};
use crate::error::EmotionError;
use crate::io::{self, FaceImage};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{collections::BTreeMap, path::Path, time::Instant};

/// Outcome of a single emotion prediction.
///
/// Either `success` is set and `emotions`/`dominant_emotion` are populated,
/// or `success` is unset, `error` carries the reason, `emotions` is empty and
/// `confidence` is 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(
        default,
        serialize_with = "serialize_scores",
        deserialize_with = "deserialize_scores"
    )]
    pub emotions: Option<EmotionScores>,
    pub dominant_emotion: Option<Emotion>,
    pub confidence: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResult {
    pub fn success(emotions: EmotionScores) -> Self {
        let (dominant, confidence) = emotions.dominant();
        Self {
            emotions: Some(emotions),
            dominant_emotion: Some(dominant),
            confidence,
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            emotions: None,
            dominant_emotion: None,
            confidence: 0.0,
            success: false,
            error: Some(error.into()),
        }
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.dominant_emotion.map(Sentiment::of)
    }
}

fn serialize_scores<S: Serializer>(
    scores: &Option<EmotionScores>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match scores {
        Some(scores) => scores.serialize(serializer),
        None => serializer.collect_map(std::iter::empty::<(&str, f64)>()),
    }
}

fn deserialize_scores<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EmotionScores>, D::Error> {
    let raw = Option::<BTreeMap<String, f64>>::deserialize(deserializer)?.unwrap_or_default();
    if raw.is_empty() {
        return Ok(None);
    }
    EmotionScores::from_labels(raw.iter().map(|(k, v)| (k.as_str(), *v)))
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Runs emotion predictions against a facial-analysis capability.
///
/// Every failure, whether from decoding, the capability itself or an empty
/// face list, is folded into a failed [`PredictionResult`]; nothing is
/// returned as an error.
pub struct EmotionPredictor<A: FaceAnalyzer> {
    analyzer: A,
    options: AnalysisOptions,
    id_counter: u64,
}

impl<A: FaceAnalyzer> EmotionPredictor<A> {
    /// Creates a predictor with non-strict detection and the emotion action.
    pub fn new(analyzer: A) -> Self {
        Self::with_options(analyzer, AnalysisOptions::default())
    }

    pub fn with_options(analyzer: A, options: AnalysisOptions) -> Self {
        Self {
            analyzer,
            options,
            id_counter: 0,
        }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Predicts the emotions of the first face in `image`.
    ///
    /// A capability reply whose scores are all zero carries no emotion and
    /// becomes a failure.
    pub fn predict(&mut self, image: &FaceImage) -> PredictionResult {
        let id = self.id_counter;
        self.id_counter = self.id_counter.wrapping_add(1);

        let start_time = Instant::now();
        let outcome = self.analyzer.analyze(AnalysisRequest {
            image,
            options: &self.options,
        });

        let result = match outcome {
            Ok(faces) => match faces.into_iter().next() {
                Some(face) if face.emotion.total() <= 0.0 => {
                    PredictionResult::failure(EmotionError::EmptyScores.to_string())
                }
                Some(face) => PredictionResult::success(face.emotion),
                None => PredictionResult::failure(EmotionError::NoFaceDetected.to_string()),
            },
            Err(e) => PredictionResult::failure(e.to_string()),
        };

        match &result.error {
            None => log::debug!(
                "Prediction {} on {} completed in {:?}",
                id,
                self.analyzer.name(),
                start_time.elapsed()
            ),
            Some(error) => log::warn!(
                "Prediction {} on {} failed after {:?}: {}",
                id,
                self.analyzer.name(),
                start_time.elapsed(),
                error
            ),
        }

        result
    }

    /// Predicts each image in order, one result per image.
    pub fn batch_predict(&mut self, images: &[FaceImage]) -> Vec<PredictionResult> {
        images.iter().map(|image| self.predict(image)).collect()
    }

    /// Reads the file and predicts on it; unreadable files become failures.
    pub fn predict_file(&mut self, path: impl AsRef<Path>) -> PredictionResult {
        match io::read_image(path) {
            Ok(image) => self.predict(&image),
            Err(e) => PredictionResult::failure(e.to_string()),
        }
    }

    /// Decodes an uploaded file and predicts on it; undecodable input becomes
    /// a failure.
    pub fn predict_bytes(&mut self, bytes: &[u8]) -> PredictionResult {
        match io::decode_image(bytes) {
            Ok(image) => self.predict(&image),
            Err(e) => PredictionResult::failure(e.to_string()),
        }
    }
}
