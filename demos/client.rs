use argh::FromArgs;
use std::path::PathBuf;

mod messages;

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3000;

#[derive(FromArgs)]
/// Client for the emotion prediction server
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// command to execute: "predict" or "batch"
    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Predict(PredictCommand),
    Batch(BatchCommand),
}

#[derive(FromArgs)]
/// Predict the emotions of a single image
#[argh(subcommand, name = "predict")]
struct PredictCommand {
    /// the path to the image, as seen by the server
    #[argh(option, short = 'i')]
    image_path: PathBuf,
}

#[derive(FromArgs)]
/// Predict a batch of images and summarize them
#[argh(subcommand, name = "batch")]
struct BatchCommand {
    /// the paths to the images, as seen by the server
    #[argh(positional)]
    image_paths: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let response = match args.command {
        ClientCommands::Predict(command) => {
            client
                .post(format!("http://{}/predict", addr))
                .json(&messages::PredictRequest {
                    image_path: command.image_path,
                })
                .send()
                .await?
        }
        ClientCommands::Batch(command) => {
            client
                .post(format!("http://{}/batch", addr))
                .json(&messages::BatchRequest {
                    image_paths: command.image_paths,
                })
                .send()
                .await?
        }
    };

    let result = response.json::<serde_json::Value>().await?;
    println!("Result: {}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
