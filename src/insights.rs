use crate::emotion::{Emotion, EmotionCounts};
use crate::error::{EmotionError, Result};
use crate::predictor::PredictionResult;
use serde::Serialize;

/// Aggregate view over a batch of predictions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InsightsSummary {
    pub total_predictions: usize,
    pub successful_predictions: usize,
    pub success_rate: f64,
    /// Dominant-emotion histogram over the successful predictions.
    pub emotion_distribution: EmotionCounts,
    /// Histogram maximum; the first label when nothing succeeded.
    pub most_common_emotion: Emotion,
    pub average_confidence: f64,
}

/// Summarizes a batch of predictions.
///
/// Only successful predictions contribute to the histogram and the average
/// confidence. An empty batch is [`EmotionError::NoPredictions`].
pub fn summarize(results: &[PredictionResult]) -> Result<InsightsSummary> {
    if results.is_empty() {
        return Err(EmotionError::NoPredictions);
    }

    let mut distribution = EmotionCounts::default();
    let mut total_confidence = 0.0;
    let mut successful = 0usize;

    for result in results {
        if let (true, Some(emotion)) = (result.success, result.dominant_emotion) {
            distribution.increment(emotion);
            total_confidence += result.confidence;
            successful += 1;
        }
    }

    let average_confidence = if successful > 0 {
        total_confidence / successful as f64
    } else {
        0.0
    };

    Ok(InsightsSummary {
        total_predictions: results.len(),
        successful_predictions: successful,
        success_rate: successful as f64 / results.len() as f64,
        emotion_distribution: distribution,
        most_common_emotion: distribution.most_common(),
        average_confidence,
    })
}
