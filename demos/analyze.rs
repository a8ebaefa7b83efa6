use argh::FromArgs;
use kornia_emotion::{
    AnalysisOptions, AppConfig, Capability, Emotion, EmotionPredictor, PredictionResult,
    calculate_metrics, classification_report, evaluation_pairs,
    collection::{EmotionDataCollector, validate_data_quality},
    save_collected_samples, save_prediction_results, summarize,
};
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};

#[derive(FromArgs)]
/// Offline emotion analysis tool
struct AnalyzeArgs {
    /// path to a JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: AnalyzeCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum AnalyzeCommands {
    Predict(PredictCommand),
    Collect(CollectCommand),
}

#[derive(FromArgs)]
/// Predict emotions for images and summarize the batch
#[argh(subcommand, name = "predict")]
struct PredictCommand {
    /// write the predictions to this CSV file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// true label of each image, in order, to evaluate the predictions
    #[argh(option, short = 't')]
    truth: Vec<Emotion>,

    /// the images to analyze
    #[argh(positional)]
    images: Vec<PathBuf>,
}

#[derive(FromArgs)]
/// Simulate sample collection and report its quality
#[argh(subcommand, name = "collect")]
struct CollectCommand {
    /// number of samples to collect
    #[argh(option, short = 'n', default = "50")]
    samples: usize,

    /// random seed for the simulated samples
    #[argh(option, default = "0")]
    seed: u64,

    /// write the samples to this CSV file
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn print_result(path: &Path, result: &PredictionResult) {
    match (&result.emotions, result.dominant_emotion) {
        (Some(emotions), Some(dominant)) => {
            println!("{}:", path.display());
            for (emotion, score) in emotions.iter() {
                println!("  {:<9} {:6.2}%", emotion, score);
            }
            println!(
                "  dominant: {} ({:.2}%), {} sentiment",
                dominant,
                result.confidence,
                dominant.sentiment().as_str()
            );
        }
        _ => println!(
            "{}: failed: {}",
            path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn predict(config: &AppConfig, command: PredictCommand) -> Result<(), Box<dyn std::error::Error>> {
    let capability = Capability::from_config(&config.analyzer);
    if capability.is_demo() {
        println!("Running in demo mode: results are simulated");
    }
    let options = AnalysisOptions {
        enforce_detection: config.analyzer.enforce_detection,
        ..AnalysisOptions::default()
    };
    let mut predictor = EmotionPredictor::with_options(capability, options);

    let results: Vec<PredictionResult> = command
        .images
        .iter()
        .map(|path| predictor.predict_file(path))
        .collect();
    for (path, result) in command.images.iter().zip(&results) {
        print_result(path, result);
    }

    match summarize(&results) {
        Ok(summary) => println!("Summary: {}", serde_json::to_string_pretty(&summary)?),
        Err(e) => println!("Summary: {}", e),
    }

    if let Some(output) = &command.output {
        save_prediction_results(&results, output)?;
    }

    if !command.truth.is_empty() {
        match evaluation_pairs(&command.truth, &results) {
            Ok((truth, predicted)) => {
                let metrics = calculate_metrics(&truth, &predicted)?;
                println!("Metrics: {}", serde_json::to_string_pretty(&metrics)?);
                println!("{}", classification_report(&truth, &predicted)?);
            }
            Err(e) => println!("Metrics: skipped: {}", e),
        }
    }
    Ok(())
}

fn collect(config: &AppConfig, command: CollectCommand) -> Result<(), Box<dyn std::error::Error>> {
    let collector = EmotionDataCollector::from_config(&config.collector)?;
    let mut rng = StdRng::seed_from_u64(command.seed);
    let samples = collector.collect_emotion_samples(command.samples, &mut rng);

    let quality = validate_data_quality(&samples);
    println!("Data quality: {}", serde_json::to_string_pretty(&quality)?);

    if let Some(output) = command.output {
        save_collected_samples(&samples, output)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: AnalyzeArgs = argh::from_env();

    let config = args
        .config
        .as_ref()
        .map(|path| AppConfig::load(path))
        .unwrap_or_default()
        .with_env_overrides();

    match args.command {
        AnalyzeCommands::Predict(command) => predict(&config, command),
        AnalyzeCommands::Collect(command) => collect(&config, command),
    }
}
