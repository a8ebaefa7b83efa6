use kornia_emotion::{
    AnalysisOptions, AnalysisRequest, Capability, DemoAnalyzer, Emotion, EmotionPredictor,
    EmotionScores, FaceAnalysis, FaceAnalyzer, FaceImage, PredictionResult, config::AnalyzerConfig,
    io::image_from_rgb8, summarize,
};
use std::collections::VecDeque;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct ScriptedError(String);

/// Replays canned capability replies and records what it was asked.
#[derive(Default)]
struct ScriptedAnalyzer {
    replies: VecDeque<Result<Vec<FaceAnalysis>, ScriptedError>>,
    seen_options: Vec<AnalysisOptions>,
}

impl ScriptedAnalyzer {
    fn reply(mut self, reply: Result<Vec<FaceAnalysis>, ScriptedError>) -> Self {
        self.replies.push_back(reply);
        self
    }

    fn faces(self, faces: Vec<EmotionScores>) -> Self {
        self.reply(Ok(faces
            .into_iter()
            .map(|emotion| FaceAnalysis { emotion })
            .collect()))
    }

    fn fails(self, message: &str) -> Self {
        self.reply(Err(ScriptedError(message.to_string())))
    }
}

impl FaceAnalyzer for ScriptedAnalyzer {
    type Error = ScriptedError;

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn analyze(&mut self, request: AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>, Self::Error> {
        self.seen_options.push(request.options.clone());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(ScriptedError("script exhausted".into())))
    }
}

fn frame() -> FaceImage {
    image_from_rgb8(2, 2, vec![128; 12]).unwrap()
}

fn reference_scores() -> EmotionScores {
    EmotionScores::from_labels([
        ("happy", 72.5),
        ("sad", 3.1),
        ("angry", 2.0),
        ("surprise", 10.0),
        ("fear", 4.0),
        ("disgust", 1.4),
        ("neutral", 7.0),
    ])
    .unwrap()
}

#[test]
fn dominant_emotion_from_capability_scores() {
    let analyzer = ScriptedAnalyzer::default().faces(vec![reference_scores()]);
    let mut predictor = EmotionPredictor::new(analyzer);
    let result = predictor.predict(&frame());

    assert!(result.success);
    assert_eq!(result.dominant_emotion, Some(Emotion::Happy));
    assert_eq!(result.confidence, 72.5);
    assert!(result.error.is_none());
    let emotions = result.emotions.unwrap();
    assert!((emotions.total() - 100.0).abs() < 1e-9);
}

#[test]
fn capability_error_becomes_failed_result() {
    let analyzer = ScriptedAnalyzer::default().fails("no face detected");
    let mut predictor = EmotionPredictor::new(analyzer);
    let result = predictor.predict(&frame());

    assert!(!result.success);
    assert!(result.emotions.is_none());
    assert_eq!(result.dominant_emotion, None);
    assert_eq!(result.confidence, 0.0);
    assert!(result.error.unwrap().contains("no face detected"));
}

#[test]
fn empty_face_list_is_a_failure() {
    let mut predictor = EmotionPredictor::new(ScriptedAnalyzer::default().faces(vec![]));
    let result = predictor.predict(&frame());
    assert!(!result.success);
    assert!(result.error.unwrap().contains("no face"));
}

#[test]
fn zero_scores_are_a_failure() {
    let empty = EmotionScores::from_labels(Vec::<(&str, f64)>::new()).unwrap();
    let zeros = EmotionScores::from_labels([("happy", 0.0), ("sad", 0.0)]).unwrap();
    let analyzer = ScriptedAnalyzer::default()
        .faces(vec![empty])
        .faces(vec![zeros]);
    let mut predictor = EmotionPredictor::new(analyzer);

    for result in predictor.batch_predict(&[frame(), frame()]) {
        assert!(!result.success);
        assert!(result.emotions.is_none());
        assert_eq!(result.dominant_emotion, None);
        assert_eq!(result.error.as_deref(), Some("emotion scores are all zero"));
    }
}

#[test]
fn first_face_wins() {
    let sad = EmotionScores::from_labels([("sad", 100.0)]).unwrap();
    let mut predictor =
        EmotionPredictor::new(ScriptedAnalyzer::default().faces(vec![sad, reference_scores()]));
    assert_eq!(predictor.predict(&frame()).dominant_emotion, Some(Emotion::Sad));
}

#[test]
fn requests_non_strict_emotion_analysis() {
    let analyzer = ScriptedAnalyzer::default().faces(vec![reference_scores()]);
    let mut predictor = EmotionPredictor::new(analyzer);
    predictor.predict(&frame());

    let seen = &predictor.analyzer().seen_options;
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], AnalysisOptions::default());
    assert!(!seen[0].enforce_detection);
}

#[test]
fn batch_predictions_keep_order_and_summarize() {
    let analyzer = ScriptedAnalyzer::default()
        .faces(vec![reference_scores()])
        .faces(vec![reference_scores()])
        .fails("Face could not be detected");
    let mut predictor = EmotionPredictor::new(analyzer);

    let results = predictor.batch_predict(&[frame(), frame(), frame()]);
    assert_eq!(results.len(), 3);
    assert!(results[0].success && results[1].success && !results[2].success);

    let summary = summarize(&results).unwrap();
    assert!((summary.success_rate - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(summary.emotion_distribution.get(Emotion::Happy), 2);
    assert_eq!(summary.emotion_distribution.total(), 2);
    assert_eq!(summary.most_common_emotion, Emotion::Happy);
    assert!((summary.average_confidence - 72.5).abs() < 1e-9);
}

#[test]
fn undecodable_upload_is_a_failure() {
    let mut predictor = EmotionPredictor::new(ScriptedAnalyzer::default());
    let result = predictor.predict_bytes(b"not an image");
    assert!(!result.success);
    assert!(predictor.analyzer().seen_options.is_empty());

    let missing = predictor.predict_file("does/not/exist.png");
    assert!(!missing.success);
    assert!(missing.error.is_some());
}

#[test]
fn demo_capability_always_succeeds() {
    let mut predictor = EmotionPredictor::new(DemoAnalyzer::seeded(11));
    for result in predictor.batch_predict(&[frame(), frame(), frame()]) {
        assert!(result.success);
        let emotions = result.emotions.unwrap();
        assert!((emotions.total() - 100.0).abs() < 1e-9);
        assert_eq!(Some(emotions.dominant().0), result.dominant_emotion);
    }
}

#[test]
fn seeded_demo_selection_is_reproducible() {
    let config = AnalyzerConfig {
        demo_seed: Some(5),
        ..AnalyzerConfig::default()
    };
    let run = || -> PredictionResult {
        let capability = Capability::from_config(&config);
        assert!(capability.is_demo());
        EmotionPredictor::new(capability).predict(&frame())
    };
    assert_eq!(run(), run());
}
