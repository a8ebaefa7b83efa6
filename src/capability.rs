use crate::analyzer::{AnalysisRequest, FaceAnalysis, FaceAnalyzer};
use crate::config::{AnalyzerConfig, BackendKind};
use crate::demo::DemoAnalyzer;
use crate::error::{EmotionError, Result};
use crate::remote::RemoteAnalyzer;

/// The facial-analysis capability selected at process start.
pub enum Capability {
    Remote(RemoteAnalyzer),
    Demo(DemoAnalyzer),
}

impl Capability {
    /// Picks the capability described by `config`.
    ///
    /// A remote backend without a base URL, or whose client cannot be built,
    /// degrades to the demo capability.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        match (config.backend, config.base_url.as_deref()) {
            (BackendKind::Remote, Some(url)) => {
                match RemoteAnalyzer::new(url, config.api_key.clone(), config.timeout()) {
                    Ok(analyzer) => {
                        log::info!("Using remote analysis service at {}", analyzer.base_url());
                        return Capability::Remote(analyzer);
                    }
                    Err(e) => {
                        log::error!("Failed to set up remote analysis service: {}", e);
                    }
                }
            }
            (BackendKind::Remote, None) => {
                log::warn!("Remote backend requested without a base URL");
            }
            (BackendKind::Demo, _) => {}
        }

        log::warn!("Facial analysis runs in demo mode, scores are simulated");
        Capability::Demo(match config.demo_seed {
            Some(seed) => DemoAnalyzer::seeded(seed),
            None => DemoAnalyzer::new(),
        })
    }

    /// Whether results come from the demo capability and should be labelled
    /// as such.
    pub fn is_demo(&self) -> bool {
        matches!(self, Capability::Demo(_))
    }
}

impl FaceAnalyzer for Capability {
    type Error = EmotionError;

    fn name(&self) -> &'static str {
        match self {
            Capability::Remote(analyzer) => analyzer.name(),
            Capability::Demo(analyzer) => analyzer.name(),
        }
    }

    fn analyze(&mut self, request: AnalysisRequest<'_>) -> Result<Vec<FaceAnalysis>> {
        match self {
            Capability::Remote(analyzer) => analyzer.analyze(request),
            Capability::Demo(analyzer) => analyzer.analyze(request).map_err(|never| match never {}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_demo() {
        let capability = Capability::from_config(&AnalyzerConfig::default());
        assert!(capability.is_demo());
        assert_eq!(capability.name(), "demo");
    }

    #[test]
    fn remote_without_url_degrades_to_demo() {
        let config = AnalyzerConfig {
            backend: BackendKind::Remote,
            ..AnalyzerConfig::default()
        };
        assert!(Capability::from_config(&config).is_demo());
    }

    #[test]
    fn remote_with_url_is_selected() {
        let config = AnalyzerConfig {
            backend: BackendKind::Remote,
            base_url: Some("http://localhost:5005".into()),
            ..AnalyzerConfig::default()
        };
        let capability = Capability::from_config(&config);
        assert!(!capability.is_demo());
        assert_eq!(capability.name(), "remote");
    }
}
