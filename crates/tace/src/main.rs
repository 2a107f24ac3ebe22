use anyhow::{Context, Result};
use clap::Parser;
use tace_models::TaceConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tace", about = "Trading Agent Contest Engine")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/tace.toml")]
    config: String,

    /// Trigger time keying this cycle (defaults to now, "%Y-%m-%d %H:%M:%S")
    #[arg(short, long)]
    trigger_time: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_str = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config: {}", cli.config))?;
    let config: TaceConfig =
        toml::from_str(&config_str).with_context(|| "Failed to parse config")?;

    let trigger_time = cli
        .trigger_time
        .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string());

    let engine = tace::build_engine(&config).context("Failed to build contest engine")?;

    let report = tace::run_cycle(&engine, &trigger_time)
        .await
        .map_err(|e| anyhow::anyhow!("Contest cycle failed: {e}"))?;

    if let Some(error) = &report.persist_error {
        warn!(error = %error, "Result document was not persisted");
    }

    // Output the contest result as JSON to stdout
    let output = if cli.pretty {
        serde_json::to_string_pretty(&report.result)?
    } else {
        serde_json::to_string(&report.result)?
    };
    println!("{output}");

    Ok(())
}
