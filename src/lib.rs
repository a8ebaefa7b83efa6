//! Facial emotion recognition on top of pluggable facial-analysis
//! capabilities.
//!
//! An [`EmotionPredictor`] drives any [`FaceAnalyzer`]: a remote
//! DeepFace-compatible service, or the demo capability that fabricates
//! normalized scores when no real backend is available. Batches of
//! [`PredictionResult`]s can be summarized with [`summarize`], evaluated
//! against ground truth with [`calculate_metrics`] and exported as CSV.

pub mod analyzer;
pub mod capability;
pub mod collection;
pub mod config;
pub mod demo;
pub mod emotion;
pub mod error;
pub mod export;
pub mod insights;
pub mod io;
pub mod metrics;
pub mod predictor;
pub mod remote;

pub use analyzer::{AnalysisAction, AnalysisOptions, AnalysisRequest, FaceAnalysis, FaceAnalyzer};
pub use capability::Capability;
pub use config::{AppConfig, BackendKind, load_config};
pub use demo::{DemoAnalyzer, demo_scores};
pub use emotion::{Emotion, EmotionCounts, EmotionScores, Sentiment};
pub use error::{EmotionError, Result};
pub use export::{save_collected_samples, save_prediction_results};
pub use insights::{InsightsSummary, summarize};
pub use io::{FaceImage, decode_image, preprocess_image, read_image};
pub use metrics::{calculate_metrics, classification_report, confusion_matrix, evaluation_pairs};
pub use predictor::{EmotionPredictor, PredictionResult};
pub use remote::RemoteAnalyzer;
