use kornia_emotion::{InsightsSummary, PredictionResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictRequest {
    pub image_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchRequest {
    pub image_paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub demo: bool,
    pub result: PredictionResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub demo: bool,
    pub results: Vec<PredictionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<InsightsSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
