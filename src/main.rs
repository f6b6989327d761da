use clap::Parser;
use n8n_log_exporter::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Export(args) => cli::export::run(args).await,
        Command::Serve => cli::serve::run().await,
    }
}
