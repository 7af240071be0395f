use anyhow::Context;
use clap::Parser;
use reroute_proxy::config::Config;
use reroute_proxy::proxy::ProxyServer;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reroute-proxy")]
#[command(
    author,
    version,
    about = "Response-code-triggered path rewrite and re-proxy middleware"
)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "REROUTE_LOG_LEVEL")]
    log_level: String,

    /// Validate configuration and exit.
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config file: {}", args.config.display()))?;

    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    ProxyServer::new(config)?.run().await
}
