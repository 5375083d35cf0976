//! Titanic Survival Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, Settings};
use clap::{Parser, Subcommand};
use model_pipeline::ModelPipeline;
use passenger_data::{synthetic_manifest, write_csv};
use services::{ModelHandle, TrainingService};
use std::path::PathBuf;
use std::sync::Arc;
use storage::ArtifactStore;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "titanic-service", version, about = "Titanic survival model trainer and API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Train, evaluate and persist a model, then exit
    Train,
    /// Report held-out metrics of the persisted model
    Evaluate,
    /// Print the persisted model's pipeline, fitted status and coefficients
    Inspect,
    /// Write a synthetic manifest CSV for local experiments
    Sample {
        /// Output CSV path
        #[arg(short, long, default_value = "data/train.csv")]
        output: PathBuf,
        /// Number of passengers
        #[arg(short, long, default_value_t = 891)]
        rows: usize,
        /// Generator seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn startup() -> anyhow::Result<Settings> {
    let settings = Settings::load().context("failed to load settings")?;
    init_logging(&settings.log_level, settings.log_json)?;
    info!("=== Titanic Survival Service v{} ===", env!("CARGO_PKG_VERSION"));
    Ok(settings)
}

fn training_service(settings: &Settings) -> TrainingService {
    TrainingService::new(
        settings.training(),
        Arc::new(ModelHandle::new(&settings.model_path)),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let settings = startup()?;
            run_server(&settings).await?;
        }
        Command::Train => {
            let service = training_service(&startup()?);
            let result = tokio::task::spawn_blocking(move || service.run()).await?;
            match (result.model(), result.report()) {
                (Some(model), Some(report)) => {
                    println!("Pipeline built successfully {model}");
                    println!("{report}");
                }
                _ => anyhow::bail!(
                    "Error building pipeline {}",
                    result.error().unwrap_or("unknown error")
                ),
            }
        }
        Command::Evaluate => {
            let service = training_service(&startup()?);
            let report = tokio::task::spawn_blocking(move || service.evaluate()).await??;
            println!("{report}");
        }
        Command::Inspect => {
            let settings = startup()?;
            let store = ArtifactStore::new(&settings.model_path);
            let info = store.info()?;
            let pipeline = ModelPipeline::load(&settings.model_path)?;

            println!(
                "artifact: {} ({} v{}, created {}, {} bytes)",
                store.path().display(),
                info.kind,
                info.format_version,
                info.created_at,
                info.payload_bytes
            );
            println!("{pipeline}");
            println!("{}", serde_json::to_string_pretty(&pipeline.status())?);
            if let Some(coefficients) = pipeline.coefficients() {
                println!("intercept: {:.4}", coefficients.intercept);
                for c in coefficients.weights {
                    println!("{:>14}: {:+.4}", c.feature, c.weight);
                }
            }
        }
        Command::Sample { output, rows, seed } => {
            init_logging("info", false)?;
            write_csv(&output, &synthetic_manifest(rows, seed))?;
            info!(path = %output.display(), rows, "Wrote synthetic manifest");
        }
    }

    Ok(())
}
