//! Command-line interface
//!
//! Argument parsing, startup initialization, and the command handlers that
//! drive the download pipeline.

pub mod args;
pub mod commands;
pub mod startup;

pub use args::{Cli, Commands, DownloadArgs, ManifestArgs};
pub use commands::{handle_download, handle_manifest};
pub use startup::{initialize, RunContext};
