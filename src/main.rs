use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eksirss::app::AppContext;
use eksirss::cli::{commands, Cli, Commands};
use eksirss::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Serve { bind } => {
            commands::serve(&ctx, bind).await?;
        }
        Commands::Feed { term } => {
            commands::print_feed(&ctx, &term).await?;
        }
        Commands::Inspect { term } => {
            commands::inspect(&ctx, &term).await?;
        }
    }

    Ok(())
}
