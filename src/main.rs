mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    buildflag::output::print_banner();

    let cli = Cli::parse();
    info!("Starting buildflag - Jenkins failure flagging");
    cli.execute().await?;

    Ok(())
}
