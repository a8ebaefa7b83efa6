use argh::FromArgs;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use kornia_emotion::{
    AnalysisOptions, AppConfig, Capability, EmotionPredictor, PredictionResult, summarize,
};
use serde_json::json;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

mod messages;

// defaults for the server
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(FromArgs)]
/// Serves emotion predictions for images on the local filesystem.
struct ServerArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// path to a JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    predictor: Arc<Mutex<EmotionPredictor<Capability>>>,
    demo: bool,
}

impl AppState {
    // predictions block, so they run on the blocking pool
    async fn run<T, F>(&self, job: F) -> Result<T, tokio::task::JoinError>
    where
        T: Send + 'static,
        F: FnOnce(&mut EmotionPredictor<Capability>) -> T + Send + 'static,
    {
        let predictor = self.predictor.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = predictor.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            job(&mut guard)
        })
        .await
    }
}

async fn post_predict(
    State(state): State<AppState>,
    Json(payload): Json<messages::PredictRequest>,
) -> impl IntoResponse {
    let image_path = payload.image_path;
    match state
        .run(move |predictor| predictor.predict_file(&image_path))
        .await
    {
        Ok(result) => {
            log::info!("Prediction finished, success: {}", result.success);
            (
                StatusCode::OK,
                Json(json!(messages::PredictResponse {
                    demo: state.demo,
                    result,
                })),
            )
        }
        Err(e) => {
            log::error!("Prediction task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

async fn post_batch(
    State(state): State<AppState>,
    Json(payload): Json<messages::BatchRequest>,
) -> impl IntoResponse {
    let paths = payload.image_paths;
    let results: Vec<PredictionResult> = match state
        .run(move |predictor| paths.iter().map(|p| predictor.predict_file(p)).collect::<Vec<_>>())
        .await
    {
        Ok(results) => results,
        Err(e) => {
            log::error!("Batch task failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            );
        }
    };

    let (summary, error) = match summarize(&results) {
        Ok(summary) => (Some(summary), None),
        Err(e) => (None, Some(e.to_string())),
    };

    (
        StatusCode::OK,
        Json(json!(messages::BatchResponse {
            demo: state.demo,
            results,
            summary,
            error,
        })),
    )
}

async fn serve(addr: String, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/", get(|| async { "Welcome to the emotion service!" }))
        .route("/predict", post(post_predict))
        .route("/batch", post(post_batch))
        .with_state(state);

    log::info!("Starting the server");
    log::info!("Listening on: {}", addr);
    log::info!("Press Ctrl+C to stop the server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: ServerArgs = argh::from_env();

    let config = args
        .config
        .as_ref()
        .map(|path| AppConfig::load(path))
        .unwrap_or_default()
        .with_env_overrides();

    // the capability owns a blocking HTTP client, so it is built and dropped
    // outside of the async runtime
    let capability = Capability::from_config(&config.analyzer);
    let demo = capability.is_demo();
    let options = AnalysisOptions {
        enforce_detection: config.analyzer.enforce_detection,
        ..AnalysisOptions::default()
    };
    let state = AppState {
        predictor: Arc::new(Mutex::new(EmotionPredictor::with_options(capability, options))),
        demo,
    };

    let addr = format!("{}:{}", args.host, args.port);
    let runtime = tokio::runtime::Runtime::new()?;
    let served = runtime.block_on(serve(addr, state.clone()));
    drop(runtime);
    drop(state);
    served
}
