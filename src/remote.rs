use crate::analyzer::{AnalysisRequest, FaceAnalysis, FaceAnalyzer};
use crate::emotion::EmotionScores;
use crate::error::{EmotionError, Result};
use crate::io::encode_png;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, time::Duration};

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    img: String,
    actions: Vec<&'a str>,
    enforce_detection: bool,
}

#[derive(Deserialize)]
struct AnalyzeReply {
    results: Vec<FaceReply>,
}

#[derive(Deserialize)]
struct FaceReply {
    emotion: HashMap<String, f64>,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: Option<String>,
    exception: Option<String>,
}

/// Client for a DeepFace-compatible analysis service exposing
/// `POST {base_url}/analyze`.
pub struct RemoteAnalyzer {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteAnalyzer {
    /// Builds a client for `base_url`. A trailing slash is ignored and the
    /// optional key is sent as a bearer token.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn analyze_image(&self, request: &AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>> {
        let png = encode_png(request.image)?;
        let body = AnalyzeBody {
            img: format!(
                "data:image/png;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(png)
            ),
            actions: request.options.actions.iter().map(|a| a.as_str()).collect(),
            enforce_detection: request.options.enforce_detection,
        };

        let mut http = self.client.post(format!("{}/analyze", self.base_url)).json(&body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http.send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &text));
        }
        parse_analysis(&text)
    }
}

/// Parses the `{"results": [{"emotion": {...}}, ...]}` reply of the service.
pub fn parse_analysis(body: &str) -> Result<Vec<FaceAnalysis>> {
    let reply: AnalyzeReply = serde_json::from_str(body)?;
    reply
        .results
        .into_iter()
        .map(|face| {
            let emotion =
                EmotionScores::from_labels(face.emotion.iter().map(|(k, v)| (k.as_str(), *v)))?;
            Ok(FaceAnalysis { emotion })
        })
        .collect()
}

fn service_error(status: u16, body: &str) -> EmotionError {
    let message = serde_json::from_str::<ErrorReply>(body)
        .ok()
        .and_then(|reply| reply.error.or(reply.exception))
        .unwrap_or_else(|| body.trim().to_string());
    EmotionError::Service(format!("status {status}: {message}"))
}

impl FaceAnalyzer for RemoteAnalyzer {
    type Error = EmotionError;

    fn name(&self) -> &'static str {
        "remote"
    }

    fn analyze(&mut self, request: AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>> {
        log::debug!("Posting analysis request to {}", self.base_url);
        self.analyze_image(&request)
    }
}
