//! Command-line argument parsing
//!
//! Defines the CLI structure with clap derive macros. CLI values override the
//! configuration file, which overrides built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::FetchConfig;

/// Memories Fetcher - download exported media memories
#[derive(Parser, Debug)]
#[command(
    name = "memories_fetcher",
    version,
    about = "Download exported media memories concurrently, preserving original timestamps",
    long_about = "Downloads the images and videos listed in a memories export manifest.
Each opaque link is resolved to its direct URL, the asset is streamed to a
type-specific directory under a collision-safe name, and the file's
modification time is restored from the export metadata."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download all media listed in the export manifest
    Download(DownloadArgs),

    /// Inspect the export manifest
    Manifest(ManifestArgs),
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Path to the exported manifest JSON (default: json/memories_history.json)
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Number of concurrent download workers
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Root directory to place the media subdirectories under
    #[arg(short, long, value_name = "DIR")]
    pub root_dir: Option<PathBuf>,

    /// Maximum number of records to process (for testing)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Show what would be downloaded without downloading
    #[arg(long)]
    pub dry_run: bool,
}

impl DownloadArgs {
    /// Fold CLI overrides into a loaded configuration
    pub fn apply_to(&self, mut config: FetchConfig) -> FetchConfig {
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if let Some(ref root_dir) = self.root_dir {
            config.root_dir = root_dir.clone();
        }
        config
    }
}

/// Arguments for manifest inspection
#[derive(Args, Debug)]
pub struct ManifestArgs {
    #[command(subcommand)]
    pub action: ManifestAction,
}

/// Manifest inspection actions
#[derive(Subcommand, Debug)]
pub enum ManifestAction {
    /// Show record counts by media type
    Info {
        /// Path to the manifest file
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level derived from the global verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download_args() -> DownloadArgs {
        DownloadArgs {
            manifest: None,
            workers: None,
            root_dir: None,
            limit: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let args = DownloadArgs {
            workers: Some(2),
            root_dir: Some(PathBuf::from("/mnt/backup")),
            ..download_args()
        };

        let config = args.apply_to(FetchConfig::default());
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.root_dir, PathBuf::from("/mnt/backup"));
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let base = FetchConfig::default();
        let config = download_args().apply_to(base.clone());
        assert_eq!(config.worker_count, base.worker_count);
        assert_eq!(config.root_dir, base.root_dir);
    }

    #[test]
    fn test_log_level() {
        let cli_quiet = Cli {
            global: GlobalArgs {
                verbose: false,
                very_verbose: false,
                quiet: true,
                config: None,
            },
            command: Commands::Download(download_args()),
        };
        assert_eq!(cli_quiet.log_level(), tracing::Level::ERROR);

        let cli_verbose = Cli {
            global: GlobalArgs {
                verbose: true,
                very_verbose: false,
                quiet: false,
                config: None,
            },
            command: Commands::Download(download_args()),
        };
        assert_eq!(cli_verbose.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_parse_download_command() {
        let cli = Cli::parse_from([
            "memories_fetcher",
            "download",
            "-w",
            "8",
            "--manifest",
            "export.json",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.workers, Some(8));
                assert_eq!(args.manifest, Some(PathBuf::from("export.json")));
                assert!(args.dry_run);
            }
            other => panic!("expected download command, got {:?}", other),
        }
    }
}
