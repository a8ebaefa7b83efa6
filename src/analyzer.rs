use crate::emotion::EmotionScores;
use crate::io::FaceImage;

/// Analyses a facial-analysis capability can be asked to compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisAction {
    Emotion,
}

impl AnalysisAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisAction::Emotion => "emotion",
        }
    }
}

/// Options forwarded to the capability with every request.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisOptions {
    /// Fail when no face can be located instead of analysing the whole frame.
    pub enforce_detection: bool,
    pub actions: Vec<AnalysisAction>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            enforce_detection: false,
            actions: vec![AnalysisAction::Emotion],
        }
    }
}

/// A single request to a facial-analysis capability.
pub struct AnalysisRequest<'a> {
    pub image: &'a FaceImage,
    pub options: &'a AnalysisOptions,
}

/// Analysis of one detected face.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnalysis {
    pub emotion: EmotionScores,
}

/// Trait for facial-analysis capabilities that can back an
/// [`EmotionPredictor`](crate::EmotionPredictor).
///
/// Implementors return one entry per detected face, in the order the
/// capability reports them. An empty list means no face was found.
pub trait FaceAnalyzer {
    /// The error type that can be returned during analysis.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Runs the analysis on the given request.
    fn analyze(&mut self, request: AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>, Self::Error>;
}

impl<A: FaceAnalyzer + ?Sized> FaceAnalyzer for Box<A> {
    type Error = A::Error;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn analyze(&mut self, request: AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>, Self::Error> {
        (**self).analyze(request)
    }
}
