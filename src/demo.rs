use crate::analyzer::{AnalysisRequest, FaceAnalysis, FaceAnalyzer};
use crate::emotion::{Emotion, EmotionScores};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{convert::Infallible, ops::RangeInclusive};

/// Range each raw demo draw is taken from, before rescaling to 100.
pub const DEMO_RANGES: [(Emotion, RangeInclusive<f64>); Emotion::COUNT] = [
    (Emotion::Happy, 20.0..=40.0),
    (Emotion::Sad, 5.0..=15.0),
    (Emotion::Angry, 5.0..=15.0),
    (Emotion::Surprise, 10.0..=25.0),
    (Emotion::Fear, 5.0..=15.0),
    (Emotion::Disgust, 5.0..=15.0),
    (Emotion::Neutral, 15.0..=35.0),
];

/// Draws one raw value per emotion from [`DEMO_RANGES`].
pub fn draw_raw_scores<R: Rng>(rng: &mut R) -> [f64; Emotion::COUNT] {
    DEMO_RANGES.map(|(_, range)| rng.random_range(range))
}

/// Fabricates a plausible score set summing to 100.
pub fn demo_scores<R: Rng>(rng: &mut R) -> EmotionScores {
    // every range has a positive lower bound, so the set is valid and non-zero
    let scores = EmotionScores::from_raw(draw_raw_scores(rng));
    scores.normalized().unwrap_or(scores)
}

/// Stand-in capability used when no real facial-analysis backend is
/// available. It always reports exactly one face and never fails.
pub struct DemoAnalyzer<R: Rng = StdRng> {
    rng: R,
}

impl DemoAnalyzer<StdRng> {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Fixed seed, for reproducible demo runs.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for DemoAnalyzer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DemoAnalyzer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> FaceAnalyzer for DemoAnalyzer<R> {
    type Error = Infallible;

    fn name(&self) -> &'static str {
        "demo"
    }

    fn analyze(&mut self, _request: AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>, Self::Error> {
        Ok(vec![FaceAnalysis {
            emotion: demo_scores(&mut self.rng),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisOptions;
    use crate::io::image_from_rgb8;

    #[test]
    fn raw_draws_stay_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let raw = draw_raw_scores(&mut rng);
            for ((_, range), value) in DEMO_RANGES.iter().zip(raw) {
                assert!(range.contains(&value), "{value} outside {range:?}");
            }
        }
    }

    #[test]
    fn demo_scores_always_sum_to_one_hundred() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let scores = demo_scores(&mut rng);
            assert!((scores.total() - 100.0).abs() < 1e-9);
            assert!(scores.iter().all(|(_, v)| v >= 0.0));
        }
    }

    #[test]
    fn same_seed_same_scores() {
        let a = demo_scores(&mut StdRng::seed_from_u64(3));
        let b = demo_scores(&mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn demo_analyzer_reports_one_face() {
        let image = image_from_rgb8(1, 1, vec![0, 0, 0]).unwrap();
        let options = AnalysisOptions::default();
        let mut analyzer = DemoAnalyzer::seeded(1);

        let faces = analyzer
            .analyze(AnalysisRequest {
                image: &image,
                options: &options,
            })
            .unwrap();
        assert_eq!(faces.len(), 1);
        assert!((faces[0].emotion.total() - 100.0).abs() < 1e-9);
    }
}
