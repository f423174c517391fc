//! Bloom CLI - predict wildflower bloom seasons from NDVI history.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bloom-cli",
    version,
    about = "Wildflower bloom season prediction toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: bloom_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    bloom_cmd::run(cli.command)
}
