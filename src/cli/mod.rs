//! CLI module for the n8n log exporter
//!
//! Provides subcommands for the two entry points:
//! - `export`: run one export and print the result as JSON
//! - `serve`: run the HTTP trigger server

pub mod export;
pub mod serve;

use clap::{Parser, Subcommand};

/// n8n Log Exporter - snapshot execution logs to object storage
#[derive(Parser)]
#[command(name = "n8n-log-exporter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export one day's execution logs to the content store
    Export(export::ExportArgs),

    /// Run the HTTP trigger server
    Serve,
}
