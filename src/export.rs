use crate::collection::EmotionSample;
use crate::emotion::Emotion;
use crate::error::Result;
use crate::predictor::PredictionResult;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct PredictionRecord<'a> {
    success: bool,
    dominant_emotion: Option<Emotion>,
    confidence: f64,
    error: Option<&'a str>,
    happy: Option<f64>,
    sad: Option<f64>,
    angry: Option<f64>,
    surprise: Option<f64>,
    fear: Option<f64>,
    disgust: Option<f64>,
    neutral: Option<f64>,
}

impl<'a> From<&'a PredictionResult> for PredictionRecord<'a> {
    fn from(result: &'a PredictionResult) -> Self {
        let score = |emotion| result.emotions.map(|scores| scores.get(emotion));
        Self {
            success: result.success,
            dominant_emotion: result.dominant_emotion,
            confidence: result.confidence,
            error: result.error.as_deref(),
            happy: score(Emotion::Happy),
            sad: score(Emotion::Sad),
            angry: score(Emotion::Angry),
            surprise: score(Emotion::Surprise),
            fear: score(Emotion::Fear),
            disgust: score(Emotion::Disgust),
            neutral: score(Emotion::Neutral),
        }
    }
}

/// Writes one CSV row per prediction, with a header row. Failed predictions
/// leave the per-emotion columns empty.
pub fn save_prediction_results(results: &[PredictionResult], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(PredictionRecord::from(result))?;
    }
    writer.flush()?;
    log::info!("Saved {} prediction results to {}", results.len(), path.display());
    Ok(())
}

/// Writes collected samples as CSV, with a header row.
pub fn save_collected_samples(samples: &[EmotionSample], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    log::info!("Saved {} samples to {}", samples.len(), path.display());
    Ok(())
}
