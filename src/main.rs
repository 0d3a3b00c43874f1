//! Memories Fetcher CLI application
//!
//! Command-line interface for downloading exported media memories. Features
//! concurrent downloads, progress tracking, and original-timestamp
//! restoration.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use memories_fetcher::cli::{handle_download, handle_manifest, Cli, Commands};
use memories_fetcher::config::FetchConfig;
use memories_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Main application logic, returning the process exit code
async fn run() -> Result<i32> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("Memories Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Download(args) => {
            info!("Executing download command");
            let config = FetchConfig::load(cli.global.config.as_deref())?;
            let summary = handle_download(args, config).await?;
            // A run that finished with failed tasks is reported as a failure
            // even though every other record was still processed.
            Ok(if summary.is_success() { 0 } else { 1 })
        }
        Commands::Manifest(args) => {
            info!("Executing manifest command");
            handle_manifest(args)?;
            Ok(0)
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env().add_directive(
        format!("memories_fetcher={}", log_level)
            .parse()
            .unwrap_or_default(),
    );

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
