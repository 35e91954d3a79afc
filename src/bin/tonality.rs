//! tonality — CLI client for tonalityd
//!
//! Uploads documents for analysis and prints the results.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tonality::client::{AnalyzeClient, DEFAULT_SERVER};
use tonality::{AnalyzeResponse, BatchStats, DocumentOutcome};

/// Tonality CLI client
#[derive(Parser)]
#[command(name = "tonality")]
#[command(version = tonality::PKG_VERSION)]
#[command(about = "Tonality sentiment analysis client")]
struct Args {
    /// Server address
    #[arg(
        short,
        long,
        env = "TONALITY_SERVER",
        default_value = DEFAULT_SERVER
    )]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check service health
    Health,

    /// Analyze one or more text files
    Analyze {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Minimum confidence for a POSITIVE/NEGATIVE verdict
        #[arg(short, long, default_value_t = 0.6)]
        threshold: f32,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let client = AnalyzeClient::new(&args.server)?;

    match args.command {
        Command::Health => {
            let health = client.health().await?;
            println!("tonalityd {}", health.version);
            println!("status: {}", health.status);
            println!(
                "summarizer: {}",
                if health.summarizer_configured {
                    "configured"
                } else {
                    "pass-through (no API key)"
                }
            );
            println!(
                "classifier: {}",
                health.classifier.as_deref().unwrap_or("not loaded")
            );
        }

        Command::Analyze {
            files,
            threshold,
            json,
        } => {
            let response = client.analyze_paths(&files, threshold).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_report(&response);
            }
        }
    }

    Ok(())
}

/// Display outcomes as a numbered table followed by batch statistics.
fn print_report(response: &AnalyzeResponse) {
    println!("{}\n", response.message);

    let name_width = response
        .results
        .iter()
        .map(|o| o.filename().chars().count())
        .max()
        .unwrap_or(0)
        .max("Filename".len());

    println!(
        "{:>3}  {:<name_width$}  {:<9}  {:>10}  Status",
        "#", "Filename", "Sentiment", "Confidence"
    );
    for (i, outcome) in response.results.iter().enumerate() {
        let (sentiment, confidence, status) = match outcome {
            DocumentOutcome::Success {
                sentiment_label,
                confidence,
                ..
            } => (
                sentiment_label.to_string(),
                format!("{:.1}%", confidence * 100.0),
                "ok".to_string(),
            ),
            DocumentOutcome::Failure { error, .. } => {
                ("-".to_string(), "-".to_string(), format!("error: {error}"))
            }
        };
        println!(
            "{:>3}  {:<name_width$}  {:<9}  {:>10}  {status}",
            i + 1,
            outcome.filename(),
            sentiment,
            confidence
        );
    }

    let stats = BatchStats::from_outcomes(&response.results);
    println!();
    println!("files:          {} ({} ok, {} failed)", stats.total, stats.succeeded, stats.failed);
    println!(
        "labels:         {} positive, {} negative, {} neutral",
        stats.positive, stats.negative, stats.neutral
    );
    println!("positive:       {:.1}%", stats.positive_percent);
    if let Some(avg) = stats.average_confidence {
        println!("avg confidence: {:.1}%", avg * 100.0);
    }
    if let Some(max) = stats.highest_confidence {
        println!("max confidence: {:.1}%", max * 100.0);
    }
}
