use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use facescan_client::{Backend, Config, HttpGateway, WorkflowEngine};
use facescan_core::{classify, CapturedImage, EmotionOutcome};

#[derive(Parser)]
#[command(name = "facescan", about = "Face recognition backend client")]
struct Cli {
    /// Backend base URL (overrides FACESCAN_BASE_URL)
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize the person in a captured image
    Recognize {
        /// Path to the captured image
        image: PathBuf,
    },
    /// Enroll a captured image under a person's name
    Enroll {
        /// Path to the captured image
        image: PathBuf,
        /// Display name to enroll the face under
        #[arg(short, long)]
        name: String,
    },
    /// Report emotion and attributes for a captured image
    Analyze {
        /// Path to the captured image
        image: PathBuf,
    },
    /// Check that the backend is up
    Health,
    /// List the faces the backend knows
    Database,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match cli.server {
        Some(server) => Config::with_base_url(server),
        None => Config::from_env(),
    };
    let gateway = HttpGateway::new(&config);

    match cli.command {
        Commands::Recognize { image } => {
            let mut engine = WorkflowEngine::new(gateway);
            engine.capture(CapturedImage::new(image))?;
            let outcome = engine.recognize().await?;
            println!("{outcome}");
        }
        Commands::Enroll { image, name } => {
            let mut engine = WorkflowEngine::new(gateway);
            engine.capture(CapturedImage::new(image))?;
            let outcome = engine.enroll(&name).await?;
            println!("{outcome}");
        }
        Commands::Analyze { image } => {
            let mut engine = WorkflowEngine::new(gateway);
            engine.capture(CapturedImage::new(image))?;
            let outcome = engine.analyze_emotion().await?;
            println!("{outcome}");
            if let EmotionOutcome::Success {
                emotion_scores,
                detector_used,
                ..
            } = &outcome
            {
                for (emotion, score) in emotion_scores {
                    println!("  {emotion}: {score:.1}%");
                }
                println!("  detector: {detector_used}");
            }
        }
        Commands::Health => {
            let report = classify::health(&gateway.health().await?);
            println!("backend status: {}", report.status);
        }
        Commands::Database => {
            let summary = classify::database(&gateway.database().await?);
            println!("{} enrolled face(s)", summary.total);
            for name in &summary.names {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
