//! Wandr CLI
//!
//! Runs the pipeline locally and prints one NDJSON progress frame per line.
//!
//! Usage:
//!   cargo run --features cli --bin wandr_cli -- \
//!     --destination Tokyo --dates "May 15-17" --budget '$60/day' \
//!     --constraints "wheelchair, vegan"
//!
//!   # Request from a JSON file, narrative only
//!   cargo run --features cli --bin wandr_cli -- --request trip.json --narrative

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wandr::config::PlannerConfig;
use wandr::model::TripRequest;
use wandr::pipeline::Pipeline;

/// Build an itinerary from a trip request
#[derive(Parser, Debug)]
#[command(name = "wandr_cli")]
#[command(about = "Constraint-driven itinerary synthesis")]
struct Args {
    /// JSON file holding a TripRequest; flags below override its fields
    #[arg(long, short = 'r')]
    request: Option<PathBuf>,

    #[arg(long, short = 'd')]
    destination: Option<String>,

    /// e.g. "May 15-20", "next weekend", "5 days"
    #[arg(long)]
    dates: Option<String>,

    /// e.g. "$60/day", "€1200 total"
    #[arg(long, short = 'b')]
    budget: Option<String>,

    #[arg(long)]
    travelers: Option<String>,

    /// e.g. "wheelchair, vegan, relaxed pace"
    #[arg(long, short = 'c')]
    constraints: Option<String>,

    #[arg(long, short = 'i')]
    interests: Option<String>,

    #[arg(long)]
    special_requests: Option<String>,

    /// YAML config file (defaults to WANDR_CONFIG, then built-ins)
    #[arg(long, env = "WANDR_CONFIG")]
    config: Option<PathBuf>,

    /// Print only the final narrative instead of NDJSON frames
    #[arg(long)]
    narrative: bool,
}

impl Args {
    fn trip_request(&self) -> anyhow::Result<TripRequest> {
        let mut request = match &self.request {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid trip request in {}", path.display()))?
            }
            None => TripRequest::default(),
        };
        let overrides = [
            (&self.destination, &mut request.destination),
            (&self.dates, &mut request.dates),
            (&self.budget, &mut request.budget),
            (&self.travelers, &mut request.travelers),
            (&self.constraints, &mut request.constraints),
            (&self.interests, &mut request.interests),
            (&self.special_requests, &mut request.special_requests),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        Ok(request)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Frames go to stdout; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wandr=warn")),
        )
        .init();

    let args = Args::parse();
    let request = args.trip_request()?;
    let config = match &args.config {
        Some(path) => {
            let mut config = PlannerConfig::load_from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok())?;
            config
        }
        None => PlannerConfig::from_env()?,
    };

    let pipeline = Arc::new(Pipeline::builder().config(config).env_providers().build());
    let mut frames = pipeline.stream(request);

    let mut succeeded = false;
    while let Some(frame) = frames.recv().await {
        if args.narrative {
            if let Some(result) = frame.result() {
                println!("{}", result.narrative.text);
            } else if frame.is_terminal() {
                eprintln!("{}", frame.message.as_deref().unwrap_or("Pipeline failed"));
            }
        } else {
            print!("{}", frame.to_ndjson()?);
        }
        if frame.is_terminal() {
            succeeded = frame.result().is_some();
        }
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
