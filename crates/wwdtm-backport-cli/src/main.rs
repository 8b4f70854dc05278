//! wwdtm-backport CLI - copy the current Stats Database into the 3.0 schema.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;
use wwdtm_backport::{BackportError, Config, Orchestrator};

#[derive(Parser)]
#[command(name = "wwdtm-backport")]
#[command(about = "Backport the Wait Wait... Don't Tell Me! Stats Database into the 3.0 schema")]
#[command(version)]
struct Cli {
    /// Path to JSON (or YAML) configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), BackportError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(BackportError::Config)?;

    // A missing or unusable configuration is not an error: there is simply
    // nothing to do.
    let Some(config) = Config::load_optional(&cli.config) else {
        info!("No usable configuration at {:?}, nothing to backport", cli.config);
        return Ok(());
    };
    info!("Loaded configuration from {:?}", cli.config);

    let orchestrator = Orchestrator::connect(&config).await?;
    let result = orchestrator.run().await;
    orchestrator.close().await;
    let result = result?;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        println!("\nBackport completed!");
        println!("  Run ID: {}", result.run_id);
        println!("  Duration: {:.2}s", result.duration_seconds);
        for table in &result.tables {
            println!("  {}: {} rows", table.table, table.rows_inserted);
        }
        println!("  Rows: {}", result.rows_transferred);
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // RUST_LOG takes precedence over --verbosity
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    // Logs go to stderr so --output-json leaves stdout parseable
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if format == "json" {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    installed.map_err(|e| format!("failed to initialise logging: {e}"))
}
