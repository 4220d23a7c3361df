use anyhow::Context;
use clap::Parser;
use flora_config::FloraConfig;

mod cli;
mod commands;
mod context;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("flora error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    let config = FloraConfig::load_with_dotenv().context("failed to load flora configuration")?;
    init_tracing(flags.quiet, flags.verbose, &config.general.log_level)?;

    let ctx = context::AppContext::init(config, flags.db.as_deref())
        .await
        .context("failed to initialize flora application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool, configured: &str) -> anyhow::Result<()> {
    let level = tracing_level(quiet, verbose, configured);

    let filter = tracing_subscriber::EnvFilter::try_from_env("FLORA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// `--quiet` and `--verbose` win over `general.log_level`.
fn tracing_level(quiet: bool, verbose: bool, configured: &str) -> &str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured
    }
}
